//! Chain descriptor entity

use crate::shared::constants::ChainDefaults;
use crate::shared::error::AdminError;
use crate::shared::types::ChainKey;
use crate::shared::utils::{env_non_empty, parse_address, validate_ethereum_address};
use ethers::types::Address;
use serde::{Deserialize, Serialize};

/// Immutable metadata for one supported chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    pub key: ChainKey,
    pub numeric_id: u64,
    pub display_name: String,
    pub rpc_endpoint: String,
    pub explorer_base_url: String,
    pub contract_address: String,
}

impl ChainDescriptor {
    pub fn from_defaults(key: ChainKey, defaults: &ChainDefaults) -> Self {
        Self {
            key,
            numeric_id: defaults.chain_id,
            display_name: defaults.name.to_string(),
            rpc_endpoint: defaults.rpc_url.to_string(),
            explorer_base_url: defaults.block_explorer.to_string(),
            contract_address: defaults.contract_address.to_string(),
        }
    }

    /// Apply `PAYCRYPT_<KEY>_RPC_URL`, `_EXPLORER_URL` and `_CONTRACT_ADDRESS` overrides.
    pub fn with_env_overrides(mut self) -> Self {
        let prefix = self.key.env_prefix();
        if let Some(rpc) = env_non_empty(&format!("{}_RPC_URL", prefix)) {
            self.rpc_endpoint = rpc;
        }
        if let Some(explorer) = env_non_empty(&format!("{}_EXPLORER_URL", prefix)) {
            self.explorer_base_url = explorer;
        }
        if let Some(address) = env_non_empty(&format!("{}_CONTRACT_ADDRESS", prefix)) {
            self.contract_address = address;
        }
        self
    }

    /// Every field must be non-empty and the contract address well formed.
    pub fn validate(&self) -> Result<(), AdminError> {
        let fields = [
            ("display name", &self.display_name),
            ("RPC endpoint", &self.rpc_endpoint),
            ("explorer URL", &self.explorer_base_url),
            ("contract address", &self.contract_address),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(AdminError::config(format!("Chain '{}' has an empty {}", self.key, field)));
            }
        }
        if self.numeric_id == 0 {
            return Err(AdminError::config(format!("Chain '{}' has no numeric id", self.key)));
        }
        validate_ethereum_address(&self.contract_address).map_err(|e| {
            AdminError::config(format!("Chain '{}' contract address '{}': {}", self.key, self.contract_address, e))
        })
    }

    pub fn contract(&self) -> Result<Address, AdminError> {
        parse_address(&self.contract_address)
    }

    fn explorer_base(&self) -> &str {
        self.explorer_base_url.trim_end_matches('/')
    }

    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_base(), tx_hash)
    }

    pub fn address_url(&self, address: &str) -> String {
        format!("{}/address/{}", self.explorer_base(), address)
    }

    pub fn token_url(&self, token: &str) -> String {
        format!("{}/token/{}", self.explorer_base(), token)
    }
}
