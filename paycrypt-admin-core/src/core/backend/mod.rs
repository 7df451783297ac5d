//! Backend order API client
//!
//! JSON over HTTP with the admin bearer token. The backend owns orders and
//! their statistics; this client only shapes requests and parses envelopes.

use crate::core::session::AdminSession;
use crate::domain::entities::{Order, OrdersPage, Pagination, VolumeStats};
use crate::shared::constants::{
    ADMIN_LOGIN_PATH, DEFAULT_PAGE_SIZE, HTTP_TIMEOUT_SECS, MAX_PAGES_PER_FETCH, MAX_PAGE_SIZE,
    ORDERS_PATH, ORDER_STATS_PATH,
};
use crate::shared::error::AdminError;
use crate::shared::types::{SortOrder, TimeRange};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Query parameters for `GET /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery {
    page: u32,
    limit: u32,
    pub range: TimeRange,
    pub chain_id: Option<u64>,
    pub sort: String,
    pub order: SortOrder,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            range: TimeRange::default(),
            chain_id: None,
            sort: "createdAt".to_string(),
            order: SortOrder::default(),
        }
    }
}

impl OrderQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn range(mut self, range: TimeRange) -> Self {
        self.range = range;
        self
    }

    pub fn chain(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        let field = field.into();
        if !field.trim().is_empty() {
            self.sort = field.trim().to_string();
        }
        self.order = order;
        self
    }

    pub fn page_number(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.limit
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("range", self.range.as_query().to_string()),
        ];
        if let Some(chain_id) = self.chain_id {
            pairs.push(("chainId", chain_id.to_string()));
        }
        pairs.push(("sort", self.sort.clone()));
        pairs.push(("order", self.order.as_query().to_string()));
        pairs
    }
}

/// `{success?, data, pagination?, message?}` response envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    pub data: Option<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    fn into_data(self, what: &str) -> Result<T, AdminError> {
        if self.success == Some(false) {
            let message = self
                .message
                .or(self.error)
                .unwrap_or_else(|| format!("Backend refused {} request", what));
            return Err(AdminError::api(StatusCode::OK.as_u16(), message));
        }
        self.data
            .ok_or_else(|| AdminError::decode(format!("Backend response has no {} data", what)))
    }
}

/// Some backends nest the list and its pagination inside `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OrdersData {
    List(Vec<Order>),
    Nested {
        orders: Vec<Order>,
        #[serde(default)]
        pagination: Option<Pagination>,
    },
}

/// Token from `{token}` or `{data:{token}}`.
pub fn extract_token(body: &Value) -> Option<String> {
    body.get("token")
        .or_else(|| body.get("data").and_then(|d| d.get("token")))
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|t| !t.is_empty())
}

/// Human message from an error body, falling back to the status text.
pub fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    session: AdminSession,
}

impl BackendClient {
    pub fn new(base_url: &str, session: AdminSession) -> Result<Self, AdminError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AdminError::config(format!("Invalid backend URL '{}'", base_url)));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| AdminError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, base_url, session })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &AdminSession {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AdminError> {
        let request = match self.session.bearer() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status, &body);
            if status == StatusCode::UNAUTHORIZED {
                log::warn!("Backend rejected admin session: {}", message);
                self.session.clear();
            }
            return Err(AdminError::api(status.as_u16(), message));
        }

        Ok(response.json::<T>().await?)
    }

    /// Log in and store the returned token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AdminError> {
        if email.trim().is_empty() {
            return Err(AdminError::validation("Email is required"));
        }
        if password.is_empty() {
            return Err(AdminError::validation("Password is required"));
        }

        let request = self
            .client
            .post(self.url(ADMIN_LOGIN_PATH))
            .json(&json!({ "email": email.trim(), "password": password }));
        let body: Value = self.send(request).await?;
        let token = extract_token(&body)
            .ok_or_else(|| AdminError::decode("Login response did not contain a token"))?;

        self.session.set_token(&token)?;
        log::info!("Admin session established for {}", email.trim());
        Ok(token)
    }

    pub fn logout(&self) {
        self.session.clear();
        log::info!("Admin session cleared");
    }

    pub async fn orders(&self, query: &OrderQuery) -> Result<OrdersPage, AdminError> {
        let request = self.client.get(self.url(ORDERS_PATH)).query(&query.to_pairs());
        let mut envelope: Envelope<OrdersData> = self.send(request).await?;
        let outer_pagination = envelope.pagination.take();

        let (orders, inner_pagination) = match envelope.into_data("orders")? {
            OrdersData::List(orders) => (orders, None),
            OrdersData::Nested { orders, pagination } => (orders, pagination),
        };
        let pagination = outer_pagination.or(inner_pagination).unwrap_or_else(|| {
            Pagination::inferred(query.page_number(), query.page_size(), orders.len())
        });

        Ok(OrdersPage { orders, pagination })
    }

    pub async fn order(&self, id: &str) -> Result<Order, AdminError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(AdminError::validation("Order id is required"));
        }
        let mut url = Url::parse(&self.url(ORDERS_PATH))
            .map_err(|e| AdminError::config(format!("Invalid backend URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AdminError::config("Backend URL cannot take path segments"))?
            .push(id);
        let request = self.client.get(url);
        let envelope: Envelope<Order> = self.send(request).await?;
        envelope
            .into_data("order")
            .map_err(|_| AdminError::not_found(format!("Order {} not found", id)))
    }

    pub async fn volume_stats(&self, range: TimeRange, chain_id: Option<u64>) -> Result<VolumeStats, AdminError> {
        let mut pairs = vec![("range", range.as_query().to_string())];
        if let Some(chain_id) = chain_id {
            pairs.push(("chainId", chain_id.to_string()));
        }
        let request = self.client.get(self.url(ORDER_STATS_PATH)).query(&pairs);
        let envelope: Envelope<VolumeStats> = self.send(request).await?;
        envelope.into_data("stats")
    }

    /// Every order matching `query`, walking pages of the maximum size.
    /// Without backend pagination, a full page means another one follows.
    pub async fn all_orders(&self, query: &OrderQuery) -> Result<Vec<Order>, AdminError> {
        let mut orders = Vec::new();
        let mut page = 1;

        loop {
            let current = self
                .orders(&query.clone().page(page).limit(MAX_PAGE_SIZE))
                .await?;
            let fetched = current.orders.len();
            orders.extend(current.orders);

            if fetched == 0 || page >= current.pagination.pages {
                break;
            }
            if page >= MAX_PAGES_PER_FETCH {
                log::warn!(
                    "Stopped after {} pages ({} of {} orders)",
                    MAX_PAGES_PER_FETCH,
                    orders.len(),
                    current.pagination.total
                );
                break;
            }
            page += 1;
        }

        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::KeyValueStore;
    use crate::infrastructure::MemoryStore;
    use crate::shared::constants::ADMIN_TOKEN_STORAGE_KEY;
    use crate::shared::test_http::{serve, serve_with};
    use std::sync::Arc;

    fn order_json(id: &str) -> Value {
        json!({
            "_id": id,
            "amount": "12.5",
            "status": "successful",
            "tokenSymbol": "USDC",
            "createdAt": "2026-01-02T03:04:05Z"
        })
    }

    fn client(url: &str) -> (BackendClient, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let session = AdminSession::new(store.clone());
        (BackendClient::new(url, session).unwrap(), store)
    }

    #[test]
    fn test_query_clamps_and_serializes() {
        let query = OrderQuery::new()
            .page(0)
            .limit(1000)
            .range(TimeRange::Month)
            .chain(8453)
            .sort("amount", SortOrder::Asc);
        assert_eq!(query.page_number(), 1);
        assert_eq!(query.page_size(), MAX_PAGE_SIZE);
        assert_eq!(
            query.to_pairs(),
            vec![
                ("page", "1".to_string()),
                ("limit", "100".to_string()),
                ("range", "30d".to_string()),
                ("chainId", "8453".to_string()),
                ("sort", "amount".to_string()),
                ("order", "asc".to_string()),
            ]
        );
        assert_eq!(OrderQuery::new().limit(0).page_size(), 1);
    }

    #[test]
    fn test_token_extraction() {
        assert_eq!(extract_token(&json!({"token": "abc"})).as_deref(), Some("abc"));
        assert_eq!(extract_token(&json!({"data": {"token": "xyz"}})).as_deref(), Some("xyz"));
        assert_eq!(extract_token(&json!({"data": {}})), None);
        assert_eq!(extract_token(&json!({"token": ""})), None);
    }

    #[test]
    fn test_error_message_prefers_body() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"message":"Invalid range"}"#),
            "Invalid range"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "<html>"), "Bad Gateway");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let session = AdminSession::new(Arc::new(MemoryStore::new()));
        assert!(matches!(
            BackendClient::new("localhost:5000", session),
            Err(AdminError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_orders_parses_envelope() {
        let body = json!({
            "success": true,
            "data": [order_json("1"), order_json("2")],
            "pagination": {"page": 1, "limit": 10, "total": 2, "pages": 1}
        });
        let url = serve(vec![(200, body.to_string())]).await;
        let (client, _) = client(&url);

        let page = client.orders(&OrderQuery::new()).await.unwrap();
        assert_eq!(page.orders.len(), 2);
        assert_eq!(page.orders[0].amount, 12.5);
        assert_eq!(page.pagination.total, 2);
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session() {
        let url = serve(vec![(401, json!({"message": "jwt expired"}).to_string())]).await;
        let (client, store) = client(&url);
        store.set(ADMIN_TOKEN_STORAGE_KEY, "header.e30.sig").unwrap();

        let err = client.orders(&OrderQuery::new()).await.unwrap_err();
        assert!(matches!(err, AdminError::Api { status: 401, ref message } if message == "jwt expired"));
        assert!(client.session().token().is_none());
    }

    #[tokio::test]
    async fn test_all_orders_walks_pages() {
        let page = |n: u32, ids: &[&str]| {
            json!({
                "data": ids.iter().map(|id| order_json(id)).collect::<Vec<_>>(),
                "pagination": {"page": n, "limit": 100, "total": 3, "pages": 2}
            })
            .to_string()
        };
        let url = serve(vec![(200, page(1, &["a", "b"])), (200, page(2, &["c"]))]).await;
        let (client, _) = client(&url);

        let orders = client.all_orders(&OrderQuery::new()).await.unwrap();
        let ids: Vec<_> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_all_orders_without_pagination_follows_full_pages() {
        let list = |prefix: &str, count: usize| {
            let orders: Vec<_> = (0..count).map(|i| order_json(&format!("{}{}", prefix, i))).collect();
            json!({ "success": true, "data": orders }).to_string()
        };
        let url = serve(vec![
            (200, list("a", MAX_PAGE_SIZE as usize)),
            (200, list("b", MAX_PAGE_SIZE as usize)),
            (200, list("c", 30)),
        ])
        .await;
        let (client, _) = client(&url);

        let orders = client.all_orders(&OrderQuery::new()).await.unwrap();
        assert_eq!(orders.len(), 2 * MAX_PAGE_SIZE as usize + 30);
        assert_eq!(orders.last().unwrap().id, "c29");
    }

    #[tokio::test]
    async fn test_all_orders_without_pagination_stops_on_empty_page() {
        let full: Vec<_> = (0..MAX_PAGE_SIZE).map(|i| order_json(&i.to_string())).collect();
        let url = serve(vec![
            (200, json!({ "data": full }).to_string()),
            (200, json!({ "data": [] }).to_string()),
        ])
        .await;
        let (client, _) = client(&url);

        let orders = client.all_orders(&OrderQuery::new()).await.unwrap();
        assert_eq!(orders.len(), MAX_PAGE_SIZE as usize);
    }

    #[tokio::test]
    async fn test_order_id_is_a_single_path_segment() {
        let url = serve_with(|request| {
            let body = json!({ "success": true, "data": order_json(request.path()) });
            (200, body.to_string())
        })
        .await;
        let (client, _) = client(&url);

        let order = client.order("a/b?c#d").await.unwrap();
        assert_eq!(order.id, "/api/orders/a%2Fb%3Fc%23d");
        assert!(matches!(client.order("  ").await, Err(AdminError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_stores_nested_token() {
        let url = serve(vec![(200, json!({"data": {"token": "header.e30.sig"}}).to_string())]).await;
        let (client, _) = client(&url);

        assert!(matches!(client.login(" ", "pw").await, Err(AdminError::Validation(_))));
        let token = client.login("ops@paycrypt.io", "secret").await.unwrap();
        assert_eq!(token, "header.e30.sig");
        assert_eq!(client.session().bearer().as_deref(), Some("header.e30.sig"));
    }
}
