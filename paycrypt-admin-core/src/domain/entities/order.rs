//! Order projections returned by the backend API

use crate::shared::utils::{deserialize_amount, deserialize_optional_amount};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    #[serde(alias = "success", alias = "completed")]
    Successful,
    #[serde(alias = "failure")]
    Failed,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Successful => "successful",
            OrderStatus::Failed => "failed",
            OrderStatus::Unknown => "unknown",
        }
    }
}

/// One order as indexed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: String,
    /// On-chain order id (bytes32 hex).
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default, alias = "userAddress")]
    pub user: Option<String>,
    #[serde(default, alias = "tokenAddress")]
    pub token: Option<String>,
    #[serde(default)]
    pub token_symbol: Option<String>,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub amount_usd: Option<f64>,
    pub status: OrderStatus,
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default, alias = "transactionHash")]
    pub tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Paging metadata `{page, limit, total, pages}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
}

impl Pagination {
    /// Bookkeeping for a locally sliced list.
    pub fn for_total(page: u32, limit: u32, total: u64) -> Self {
        let limit = limit.max(1);
        let pages = total.div_ceil(limit as u64) as u32;
        Self { page: page.max(1), limit, total, pages }
    }

    /// Bookkeeping for a page the backend returned without pagination.
    /// `total` is a lower bound; a full page implies a next one.
    pub fn inferred(page: u32, limit: u32, fetched: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total = (page as u64 - 1) * limit as u64 + fetched as u64;
        let pages = if fetched as u64 >= limit as u64 { page + 1 } else { page };
        Self { page, limit, total, pages }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then_some(self.page + 1)
    }

    /// 1-based inclusive item range shown on the current page.
    pub fn item_range(&self) -> Option<(u64, u64)> {
        if self.total == 0 {
            return None;
        }
        let first = (self.page.saturating_sub(1) as u64) * self.limit as u64 + 1;
        if first > self.total {
            return None;
        }
        let last = (first + self.limit as u64 - 1).min(self.total);
        Some((first, last))
    }

    pub fn summary(&self) -> String {
        match self.item_range() {
            Some((first, last)) => format!("Showing {}-{} of {}", first, last, self.total),
            None => "No results".to_string(),
        }
    }
}

/// A page of orders plus its paging metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersPage {
    pub orders: Vec<Order>,
    pub pagination: Pagination,
}

/// Aggregates served by the backend stats endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeStats {
    #[serde(deserialize_with = "deserialize_amount")]
    pub total_volume: f64,
    pub total_orders: u64,
    pub successful_orders: u64,
    pub failed_orders: u64,
    pub pending_orders: u64,
}
