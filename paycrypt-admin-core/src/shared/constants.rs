//! Constants for the admin core
//!
//! Built-in chain defaults, persisted state keys and paging limits.

// Persisted state keys
pub const SELECTED_CHAIN_STORAGE_KEY: &str = "paycrypt_selected_chain";
pub const ADMIN_TOKEN_STORAGE_KEY: &str = "paycrypt_admin_token";
pub const STATE_FILE_NAME: &str = "state.json";
pub const STATE_DIR_NAME: &str = "paycrypt-admin";

// Chain selection
pub const DEFAULT_CHAIN_KEY: &str = "base";

// Backend API
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const ADMIN_LOGIN_PATH: &str = "/api/admin/login";
pub const ORDERS_PATH: &str = "/api/orders";
pub const ORDER_STATS_PATH: &str = "/api/orders/stats";
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// Paging
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const MAX_PAGES_PER_FETCH: u32 = 50;

// Notifications
pub const NOTICE_HISTORY_SIZE: usize = 50;

// Wallet observer
pub const DEFAULT_WALLET_POLL_INTERVAL_MS: u64 = 4000;

// Validation
pub const ADDRESS_LENGTH: usize = 42; // 0x + 40 hex chars
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

// Symbols treated as USD-pegged when no explicit rate is configured
pub const STABLECOIN_SYMBOLS: &[&str] = &["USDC", "USDT", "CUSD", "DAI", "USDBC"];

// Built-in chain defaults
#[derive(Debug, Clone)]
pub struct ChainDefaults {
    pub key: &'static str,
    pub chain_id: u64,
    pub name: &'static str,
    pub rpc_url: &'static str,
    pub block_explorer: &'static str,
    pub contract_address: &'static str,
}

pub static BASE_CHAIN: ChainDefaults = ChainDefaults {
    key: "base",
    chain_id: 8453,
    name: "Base",
    rpc_url: "https://mainnet.base.org",
    block_explorer: "https://basescan.org",
    contract_address: "0x0554aD10D3e4cB7bA4b6F1b0B1b4B0d8c8A2f6E1",
};

pub static LISK_CHAIN: ChainDefaults = ChainDefaults {
    key: "lisk",
    chain_id: 1135,
    name: "Lisk",
    rpc_url: "https://rpc.api.lisk.com",
    block_explorer: "https://blockscout.lisk.com",
    contract_address: "0x7Ca0a469164655AF07d27cf4bdA5e77F36Ab820A",
};

pub static CELO_CHAIN: ChainDefaults = ChainDefaults {
    key: "celo",
    chain_id: 42220,
    name: "Celo",
    rpc_url: "https://forno.celo.org",
    block_explorer: "https://celoscan.io",
    contract_address: "0xBC955DC38a13c2Cd8736DA1bC791514504202F9D",
};

pub static CHAIN_DEFAULTS: [&ChainDefaults; 3] = [&BASE_CHAIN, &LISK_CHAIN, &CELO_CHAIN];

// Build information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_defaults() {
        assert_eq!(BASE_CHAIN.chain_id, 8453);
        assert_eq!(LISK_CHAIN.chain_id, 1135);
        assert_eq!(CELO_CHAIN.chain_id, 42220);
        assert_eq!(CHAIN_DEFAULTS.len(), 3);
    }

    #[test]
    fn test_default_contract_addresses_are_well_formed() {
        for chain in CHAIN_DEFAULTS.iter() {
            assert_eq!(chain.contract_address.len(), ADDRESS_LENGTH, "{}", chain.key);
            assert!(chain.contract_address.starts_with("0x"));
        }
    }

    #[test]
    fn test_storage_keys() {
        assert_eq!(SELECTED_CHAIN_STORAGE_KEY, "paycrypt_selected_chain");
        assert_ne!(SELECTED_CHAIN_STORAGE_KEY, ADMIN_TOKEN_STORAGE_KEY);
    }

    #[test]
    fn test_paging_limits() {
        assert!(DEFAULT_PAGE_SIZE <= MAX_PAGE_SIZE);
        assert!(MAX_PAGES_PER_FETCH > 0);
    }
}
