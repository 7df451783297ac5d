//! Paycrypt Admin Core
//!
//! Multi-chain administration core for the Paycrypt payment platform.
//! Everything the admin dashboard needs that is not HTTP plumbing lives here.
//!
//! ## Architecture
//!
//! - **Core**: chain registry, chain selection (coordinator + wallet observer),
//!   derived per-chain clients, contract reads/writes/decoding, backend API
//!   client, analytics and report export
//! - **Domain**: entities (chains, orders, tokens) and the traits for the
//!   collaborators the core consumes (storage, wallet, notifications)
//! - **Infrastructure**: file/memory storage and wallet providers
//! - **Shared**: common types, constants, errors and utilities
//!
//! ## Chain selection
//!
//! The selected chain has a single owner, [`ChainSelectionCoordinator`]. It
//! changes only through `select` (operator choice, asks the wallet to follow)
//! or `reconcile_from_wallet` (follows the wallet, never calls it back).
//!
//! ## Usage
//!
//! ```no_run
//! use paycrypt_admin_core::init_admin_core;
//!
//! # async fn run() -> Result<(), paycrypt_admin_core::AdminError> {
//! let admin = init_admin_core().await?;
//! let _observer = admin.start_wallet_observer();
//!
//! admin.coordinator.select("celo").await;
//! let clients = admin.clients.current(&admin.coordinator)?;
//! let paused = clients.contract.is_paused().await?;
//! # Ok(())
//! # }
//! ```

use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub mod core;
pub mod domain;
pub mod shared;
pub mod infrastructure;

// Re-export specific components
pub use crate::core::analytics::{AnalyticsService, AnalyticsSummary, CurrencyConverter};
pub use crate::core::backend::{BackendClient, OrderQuery};
pub use crate::core::clients::{ChainClients, DerivedClients};
pub use crate::core::contract::{AdminCall, AdminCallParams, PaycryptContract, TransactionInspector};
pub use crate::core::notifications::NoticeBoard;
pub use crate::core::registry::ChainRegistry;
pub use crate::core::reports::ReportBuilder;
pub use crate::core::selection::{
    ChainSelectionCoordinator, ReconcileOutcome, SelectOutcome, SelectionState, SelectionStore,
    WalletNetworkObserver, WalletSwitch,
};
pub use crate::core::session::AdminSession;

// Re-export domain entities and collaborators
pub use crate::domain::{ChainDescriptor, KeyValueStore, Notifier, Order, WalletProvider};
pub use crate::infrastructure::{FileStore, MemoryStore, NoWallet, RpcWallet};

// Re-export shared types
pub use shared::error::AdminError;
pub use shared::types::{ChainKey, Notice, NoticeLevel, TimeRange, WalletStatus};

use crate::shared::constants::{DEFAULT_BACKEND_URL, DEFAULT_CHAIN_KEY, DEFAULT_WALLET_POLL_INTERVAL_MS};
use crate::shared::utils::env_non_empty;

/// Install `env_logger` (`RUST_LOG`, default `info`). Safe to call twice.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Environment-driven settings of the admin core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreSettings {
    pub default_chain: ChainKey,
    pub backend_url: String,
    pub state_dir: PathBuf,
    pub wallet_rpc_url: Option<String>,
    pub wallet_poll_interval: Duration,
}

impl CoreSettings {
    /// Read settings from the process environment (after `.env`).
    pub fn from_env() -> Result<Self, AdminError> {
        Self::from_lookup(env_non_empty)
    }

    /// Read settings through `lookup`; unset and empty values take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AdminError> {
        let default_chain = lookup("PAYCRYPT_DEFAULT_CHAIN").unwrap_or_else(|| DEFAULT_CHAIN_KEY.to_string());
        let default_chain = ChainKey::parse(&default_chain).ok_or_else(|| {
            AdminError::config(format!("PAYCRYPT_DEFAULT_CHAIN '{}' is not a supported chain", default_chain))
        })?;

        let wallet_poll_interval = match lookup("WALLET_POLL_INTERVAL_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| AdminError::config(format!("Invalid WALLET_POLL_INTERVAL_MS '{}'", raw)))?,
            None => DEFAULT_WALLET_POLL_INTERVAL_MS,
        };

        Ok(Self {
            default_chain,
            backend_url: lookup("PAYCRYPT_BACKEND_URL").unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            state_dir: lookup("PAYCRYPT_STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(FileStore::default_dir),
            wallet_rpc_url: lookup("WALLET_RPC_URL"),
            wallet_poll_interval: Duration::from_millis(wallet_poll_interval),
        })
    }
}

/// Handles of the wallet polling and reconciliation tasks.
pub struct WalletObserverHandles {
    pub poller: JoinHandle<()>,
    pub observer: JoinHandle<()>,
}

impl WalletObserverHandles {
    pub fn abort(&self) {
        self.poller.abort();
        self.observer.abort();
    }
}

/// Assembled admin core: one coordinator and everything derived from it.
pub struct AdminCore {
    pub settings: CoreSettings,
    pub registry: Arc<ChainRegistry>,
    pub notices: Arc<NoticeBoard>,
    pub wallet: Arc<dyn WalletProvider>,
    pub coordinator: Arc<ChainSelectionCoordinator>,
    pub clients: Arc<DerivedClients>,
    pub backend: BackendClient,
    pub analytics: AnalyticsService,
}

impl AdminCore {
    /// Wire the core together and restore the persisted chain selection.
    pub fn assemble(
        settings: CoreSettings,
        registry: ChainRegistry,
        store: Arc<dyn KeyValueStore>,
        wallet: Arc<dyn WalletProvider>,
    ) -> Result<Self, AdminError> {
        let registry = Arc::new(registry);
        let notices = Arc::new(NoticeBoard::new());

        let coordinator = Arc::new(ChainSelectionCoordinator::start(
            registry.clone(),
            SelectionStore::new(store.clone()),
            settings.default_chain,
            wallet.clone(),
            notices.clone(),
        ));
        let clients = Arc::new(DerivedClients::new(registry.clone()));
        let backend = BackendClient::new(&settings.backend_url, AdminSession::new(store))?;
        let analytics = AnalyticsService::new(backend.clone(), registry.clone(), CurrencyConverter::new());

        Ok(Self {
            settings,
            registry,
            notices,
            wallet,
            coordinator,
            clients,
            backend,
            analytics,
        })
    }

    /// Poll the wallet and reconcile the selection with its network.
    /// Must be called from within a tokio runtime.
    pub fn start_wallet_observer(&self) -> WalletObserverHandles {
        let (status, poller) = crate::core::selection::watch_wallet(self.wallet.clone(), self.settings.wallet_poll_interval);
        let observer = WalletNetworkObserver::spawn(self.coordinator.clone(), status);
        WalletObserverHandles { poller, observer }
    }
}

/// Initialize the admin core with configuration from .env or defaults.
pub async fn init_admin_core() -> Result<AdminCore, AdminError> {
    dotenv().ok(); // Load .env if present

    let settings = CoreSettings::from_env()?;
    let registry = ChainRegistry::from_env()?;
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&settings.state_dir)?);

    let wallet: Arc<dyn WalletProvider> = match &settings.wallet_rpc_url {
        Some(url) => {
            log::info!("Using wallet bridge at {}", url);
            Arc::new(RpcWallet::connect(url)?)
        }
        None => {
            log::info!("WALLET_RPC_URL not set, running without a wallet");
            Arc::new(NoWallet::new())
        }
    };

    AdminCore::assemble(settings, registry, store, wallet)
}
