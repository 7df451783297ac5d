//! Supported token entity

use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

/// Per-token settings held by the payment contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetails {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    pub is_supported: bool,
    pub is_enabled: bool,
    pub order_limit: U256,
    pub total_volume: U256,
}

/// Token details plus display strings for the tokens page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    #[serde(flatten)]
    pub details: TokenDetails,
    pub order_limit_display: String,
    pub total_volume_display: String,
    pub explorer_url: String,
}
