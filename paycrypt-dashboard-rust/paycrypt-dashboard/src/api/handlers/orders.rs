use actix_web::web::{Data, Path, Query};
use actix_web::{get, HttpResponse};
use paycrypt_admin_core::core::contract::{correlate, parse_tx_hash};
use paycrypt_admin_core::shared::types::SortOrder;
use paycrypt_admin_core::{OrderQuery, TimeRange};
use serde::Deserialize;
use serde_json::json;

use crate::app::state::AppState;
use crate::domain::error::DashboardResult;

#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub range: Option<TimeRange>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

impl OrdersQuery {
    /// Backend query scoped to `chain_id`.
    pub fn to_order_query(&self, chain_id: u64) -> OrderQuery {
        let mut query = OrderQuery::new().chain(chain_id);
        if let Some(page) = self.page {
            query = query.page(page);
        }
        if let Some(limit) = self.limit {
            query = query.limit(limit);
        }
        if let Some(range) = self.range {
            query = query.range(range);
        }
        if let Some(sort) = self.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.sort(sort, self.order.unwrap_or_default());
        }
        query
    }
}

/// Order history of the selected chain.
#[get("/orders")]
pub async fn get_orders(state: Data<AppState>, query: Query<OrdersQuery>) -> DashboardResult<HttpResponse> {
    let clients = state.current_clients()?;
    let page = state.admin.backend.orders(&query.to_order_query(clients.chain_id)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "chain": clients.key,
        "orders": page.orders,
        "pagination": page.pagination,
        "summary": page.pagination.summary(),
    })))
}

/// Decode a transaction on the selected chain and find its backend order.
#[get("/orders/lookup/{tx_hash}")]
pub async fn lookup_transaction(state: Data<AppState>, tx_hash: Path<String>) -> DashboardResult<HttpResponse> {
    let hash = parse_tx_hash(&tx_hash)?;
    let clients = state.current_clients()?;
    let insight = clients.contract.inspector().inspect(hash).await?;

    let query = OrderQuery::new().chain(clients.chain_id).range(TimeRange::All);
    let (order, correlation_error) = match state.admin.backend.all_orders(&query).await {
        Ok(orders) => {
            let found = correlate(&insight, &orders).map(|c| {
                json!({
                    "order": c.order,
                    "matchedBy": c.matched_by,
                })
            });
            (found, None)
        }
        Err(e) => {
            log::warn!("Order history unavailable for correlation: {}", e);
            (None, Some(e.to_string()))
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "chain": clients.key,
        "transaction": insight,
        "explorerUrl": clients.tx_url(&format!("{:?}", insight.tx_hash)),
        "match": order,
        "correlationError": correlation_error,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api;
    use crate::app::state::tests::test_state;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[::core::prelude::v1::test]
    fn test_orders_query_maps_to_backend_query() {
        let query = OrdersQuery {
            page: Some(0),
            limit: Some(500),
            range: Some(TimeRange::Month),
            sort: Some("amount".to_string()),
            order: Some(SortOrder::Asc),
        };
        let backend = query.to_order_query(1135);
        assert_eq!(backend.page_number(), 1);
        assert_eq!(backend.page_size(), 100);

        let pairs = backend.to_pairs();
        assert!(pairs.contains(&("chainId", "1135".to_string())));
        assert!(pairs.contains(&("range", "30d".to_string())));
        assert!(pairs.contains(&("sort", "amount".to_string())));
        assert!(pairs.contains(&("order", "asc".to_string())));
    }

    #[actix_web::test]
    async fn test_lookup_rejects_malformed_hash() {
        let app = test::init_service(App::new().app_data(test_state()).configure(api::configure)).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/orders/lookup/0x1234").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
