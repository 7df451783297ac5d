//! Cross-chain order analytics
//!
//! Pulls every chain's orders from the backend and reshapes them into the
//! dashboard's volume figures.

use crate::core::backend::{BackendClient, OrderQuery};
use crate::core::registry::ChainRegistry;
use crate::domain::entities::{ChainDescriptor, Order, OrderStatus};
use crate::shared::constants::STABLECOIN_SYMBOLS;
use crate::shared::error::AdminError;
use crate::shared::types::{ChainKey, TimeRange};
use chrono::{DateTime, NaiveDate, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// USD rates keyed by upper-case token symbol.
#[derive(Debug, Clone)]
pub struct CurrencyConverter {
    rates: HashMap<String, f64>,
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        let rates = STABLECOIN_SYMBOLS
            .iter()
            .map(|symbol| (symbol.to_string(), 1.0))
            .collect();
        Self { rates }
    }
}

impl CurrencyConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, symbol: &str, usd: f64) -> Self {
        self.set_rate(symbol, usd);
        self
    }

    pub fn set_rate(&mut self, symbol: &str, usd: f64) {
        if usd.is_finite() && usd >= 0.0 {
            self.rates.insert(symbol.trim().to_ascii_uppercase(), usd);
        }
    }

    pub fn rate(&self, symbol: &str) -> Option<f64> {
        self.rates.get(&symbol.trim().to_ascii_uppercase()).copied()
    }

    pub fn to_usd(&self, amount: f64, symbol: &str) -> Option<f64> {
        self.rate(symbol).map(|rate| amount * rate)
    }

    /// Backend-supplied USD value, else a converted one.
    pub fn order_usd(&self, order: &Order) -> Option<f64> {
        order.amount_usd.or_else(|| {
            order
                .token_symbol
                .as_deref()
                .and_then(|symbol| self.to_usd(order.amount, symbol))
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenVolume {
    pub symbol: String,
    pub orders: u64,
    /// Successful volume in token units.
    pub volume: f64,
    pub volume_usd: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyVolume {
    pub date: NaiveDate,
    pub orders: u64,
    pub volume_usd: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChainVolume {
    pub chain: ChainKey,
    pub chain_id: u64,
    pub display_name: String,
    pub total_orders: u64,
    pub successful_orders: u64,
    pub failed_orders: u64,
    pub pending_orders: u64,
    /// USD volume of successful orders that could be priced.
    pub volume_usd: f64,
    /// Successful orders left out of `volume_usd` for lack of a rate.
    pub unpriced_orders: u64,
    pub tokens: Vec<TokenVolume>,
    pub daily: Vec<DailyVolume>,
}

/// Fold one chain's orders into volume figures.
pub fn aggregate(chain: &ChainDescriptor, orders: &[Order], converter: &CurrencyConverter) -> ChainVolume {
    let mut volume = ChainVolume {
        chain: chain.key,
        chain_id: chain.numeric_id,
        display_name: chain.display_name.clone(),
        total_orders: orders.len() as u64,
        successful_orders: 0,
        failed_orders: 0,
        pending_orders: 0,
        volume_usd: 0.0,
        unpriced_orders: 0,
        tokens: Vec::new(),
        daily: Vec::new(),
    };
    let mut tokens: BTreeMap<String, TokenVolume> = BTreeMap::new();
    let mut daily: BTreeMap<NaiveDate, DailyVolume> = BTreeMap::new();

    for order in orders {
        match order.status {
            OrderStatus::Successful => volume.successful_orders += 1,
            OrderStatus::Failed => volume.failed_orders += 1,
            OrderStatus::Pending => volume.pending_orders += 1,
            OrderStatus::Unknown => {}
        }

        let symbol = order
            .token_symbol
            .clone()
            .unwrap_or_else(|| "UNKNOWN".to_string());
        let token = tokens.entry(symbol.clone()).or_insert_with(|| TokenVolume {
            symbol,
            orders: 0,
            volume: 0.0,
            volume_usd: None,
        });
        token.orders += 1;

        if order.status != OrderStatus::Successful {
            continue;
        }
        token.volume += order.amount;

        let day = daily
            .entry(order.created_at.date_naive())
            .or_insert_with(|| DailyVolume {
                date: order.created_at.date_naive(),
                orders: 0,
                volume_usd: 0.0,
            });
        day.orders += 1;

        match converter.order_usd(order) {
            Some(usd) => {
                volume.volume_usd += usd;
                token.volume_usd = Some(token.volume_usd.unwrap_or(0.0) + usd);
                day.volume_usd += usd;
            }
            None => volume.unpriced_orders += 1,
        }
    }

    volume.tokens = tokens.into_values().collect();
    volume.daily = daily.into_values().collect();
    volume
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChainError {
    pub chain: ChainKey,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub range: TimeRange,
    pub generated_at: DateTime<Utc>,
    pub total_orders: u64,
    pub successful_orders: u64,
    pub failed_orders: u64,
    pub pending_orders: u64,
    pub total_volume_usd: f64,
    /// Percentage of orders that succeeded, 0 when there are none.
    pub success_rate: f64,
    pub unpriced_orders: u64,
    pub chains: Vec<ChainVolume>,
    /// Per-day successful volume across chains, ascending.
    pub daily: Vec<DailyVolume>,
    pub errors: Vec<ChainError>,
}

impl AnalyticsSummary {
    pub fn from_chains(range: TimeRange, chains: Vec<ChainVolume>, errors: Vec<ChainError>) -> Self {
        let mut daily: BTreeMap<NaiveDate, DailyVolume> = BTreeMap::new();
        for day in chains.iter().flat_map(|c| c.daily.iter()) {
            let entry = daily.entry(day.date).or_insert_with(|| DailyVolume {
                date: day.date,
                orders: 0,
                volume_usd: 0.0,
            });
            entry.orders += day.orders;
            entry.volume_usd += day.volume_usd;
        }

        let total_orders = chains.iter().map(|c| c.total_orders).sum();
        let successful_orders = chains.iter().map(|c| c.successful_orders).sum();
        let success_rate = if total_orders == 0 {
            0.0
        } else {
            successful_orders as f64 / total_orders as f64 * 100.0
        };

        Self {
            range,
            generated_at: Utc::now(),
            total_orders,
            successful_orders,
            failed_orders: chains.iter().map(|c| c.failed_orders).sum(),
            pending_orders: chains.iter().map(|c| c.pending_orders).sum(),
            total_volume_usd: chains.iter().map(|c| c.volume_usd).sum(),
            success_rate,
            unpriced_orders: chains.iter().map(|c| c.unpriced_orders).sum(),
            chains,
            daily: daily.into_values().collect(),
            errors,
        }
    }
}

/// One chain's fetched orders.
#[derive(Debug, Clone)]
pub struct ChainOrders {
    pub chain: ChainKey,
    pub orders: Vec<Order>,
}

/// Orders of every chain that could be fetched for a range.
#[derive(Debug, Clone)]
pub struct CrossChainSnapshot {
    pub range: TimeRange,
    pub chains: Vec<ChainOrders>,
    pub errors: Vec<ChainError>,
}

#[derive(Clone)]
pub struct AnalyticsService {
    backend: BackendClient,
    registry: Arc<ChainRegistry>,
    converter: CurrencyConverter,
}

impl AnalyticsService {
    pub fn new(backend: BackendClient, registry: Arc<ChainRegistry>, converter: CurrencyConverter) -> Self {
        Self { backend, registry, converter }
    }

    pub fn converter(&self) -> &CurrencyConverter {
        &self.converter
    }

    /// Fetch all chains concurrently. Individual chain failures are
    /// recorded; only a failure on every chain is an error.
    pub async fn snapshot(&self, range: TimeRange) -> Result<CrossChainSnapshot, AdminError> {
        let fetches = self.registry.iter().map(|chain| {
            let query = OrderQuery::new().range(range).chain(chain.numeric_id);
            async move { (chain.key, self.backend.all_orders(&query).await) }
        });

        let mut chains = Vec::new();
        let mut errors = Vec::new();
        let mut first_error = None;
        for (chain, result) in join_all(fetches).await {
            match result {
                Ok(orders) => chains.push(ChainOrders { chain, orders }),
                Err(e) => {
                    log::warn!("Analytics fetch failed for {}: {}", chain, e);
                    errors.push(ChainError { chain, message: e.to_string() });
                    first_error.get_or_insert(e);
                }
            }
        }

        if chains.is_empty() {
            if let Some(e) = first_error {
                return Err(e);
            }
        }
        Ok(CrossChainSnapshot { range, chains, errors })
    }

    pub fn summarize(&self, snapshot: &CrossChainSnapshot) -> AnalyticsSummary {
        let volumes = snapshot
            .chains
            .iter()
            .map(|c| aggregate(self.registry.get(c.chain), &c.orders, &self.converter))
            .collect();
        AnalyticsSummary::from_chains(snapshot.range, volumes, snapshot.errors.clone())
    }

    pub async fn summary(&self, range: TimeRange) -> Result<AnalyticsSummary, AdminError> {
        let snapshot = self.snapshot(range).await?;
        Ok(self.summarize(&snapshot))
    }
}
