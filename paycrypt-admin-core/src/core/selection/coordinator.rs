//! Chain selection coordinator
//!
//! Single owner of the selected chain. There are exactly two ways to change
//! it: [`ChainSelectionCoordinator::select`] for operator choices (which also
//! asks the wallet to follow) and
//! [`ChainSelectionCoordinator::reconcile_from_wallet`] for following the
//! wallet (which never calls back into it).

use crate::core::registry::ChainRegistry;
use crate::core::selection::store::SelectionStore;
use crate::domain::entities::ChainDescriptor;
use crate::domain::repositories::{Notifier, WalletProvider};
use crate::shared::types::{ChainKey, Notice, WalletStatus};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub current_key: ChainKey,
    pub is_initializing: bool,
}

/// What happened to the wallet side of a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "camelCase")]
pub enum WalletSwitch {
    NotConnected,
    Switched,
    Rejected,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Unrecognized key; nothing changed.
    Ignored,
    Selected { key: ChainKey, wallet: WalletSwitch },
}

impl SelectOutcome {
    pub fn selected_key(&self) -> Option<ChainKey> {
        match self {
            SelectOutcome::Ignored => None,
            SelectOutcome::Selected { key, .. } => Some(*key),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Disconnected,
    UnknownNetwork,
    UnsupportedNetwork(u64),
    InSync,
    Reconciled { from: ChainKey, to: ChainKey },
}

pub struct ChainSelectionCoordinator {
    registry: Arc<ChainRegistry>,
    store: SelectionStore,
    default_key: ChainKey,
    state: watch::Sender<SelectionState>,
    wallet: Arc<dyn WalletProvider>,
    notifier: Arc<dyn Notifier>,
}

impl ChainSelectionCoordinator {
    /// Create a coordinator in the initializing state.
    pub fn new(
        registry: Arc<ChainRegistry>,
        store: SelectionStore,
        default_key: ChainKey,
        wallet: Arc<dyn WalletProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(SelectionState {
            current_key: default_key,
            is_initializing: true,
        });
        Self {
            registry,
            store,
            default_key,
            state,
            wallet,
            notifier,
        }
    }

    /// `new` followed by `initialize`.
    pub fn start(
        registry: Arc<ChainRegistry>,
        store: SelectionStore,
        default_key: ChainKey,
        wallet: Arc<dyn WalletProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let coordinator = Self::new(registry, store, default_key, wallet, notifier);
        coordinator.initialize();
        coordinator
    }

    /// Restore the persisted selection, falling back to the default.
    pub fn initialize(&self) -> ChainKey {
        let key = match self.store.load() {
            Some(key) => {
                log::info!("Restored chain selection '{}'", key);
                key
            }
            None => {
                log::info!("No stored chain selection, using default '{}'", self.default_key);
                self.default_key
            }
        };

        self.state.send_modify(|state| {
            state.current_key = key;
            state.is_initializing = false;
        });
        key
    }

    pub fn state(&self) -> SelectionState {
        *self.state.borrow()
    }

    pub fn current_key(&self) -> ChainKey {
        self.state.borrow().current_key
    }

    pub fn is_initializing(&self) -> bool {
        self.state.borrow().is_initializing
    }

    /// Descriptor of the current selection; `None` only while initializing.
    pub fn chain_config(&self) -> Option<&ChainDescriptor> {
        let state = self.state();
        if state.is_initializing {
            return None;
        }
        Some(self.registry.get(state.current_key))
    }

    pub fn subscribe(&self) -> watch::Receiver<SelectionState> {
        self.state.subscribe()
    }

    pub fn registry(&self) -> &Arc<ChainRegistry> {
        &self.registry
    }

    pub fn wallet(&self) -> &Arc<dyn WalletProvider> {
        &self.wallet
    }

    pub fn default_key(&self) -> ChainKey {
        self.default_key
    }

    /// Operator selection. The state change and persistence complete before
    /// the wallet is contacted; wallet failures never revert the selection.
    pub async fn select(&self, key: &str) -> SelectOutcome {
        let Some(key) = ChainKey::parse(key) else {
            log::warn!("Ignoring selection of unsupported chain '{}'", key);
            return SelectOutcome::Ignored;
        };

        let previous = self.current_key();
        self.state.send_modify(|state| state.current_key = key);
        self.store.save(key);
        log::info!("Chain selection changed: {} -> {}", previous, key);

        let descriptor = self.registry.get(key);
        let wallet = self.request_wallet_switch(descriptor).await;
        SelectOutcome::Selected { key, wallet }
    }

    async fn request_wallet_switch(&self, descriptor: &ChainDescriptor) -> WalletSwitch {
        let status = match self.wallet.status().await {
            Ok(status) => status,
            Err(e) => {
                let message = format!("Could not reach wallet: {}", e);
                self.notifier.notify(Notice::error(message.clone()));
                return WalletSwitch::Failed(message);
            }
        };
        if !status.connected {
            return WalletSwitch::NotConnected;
        }

        match self.wallet.switch_chain(descriptor.numeric_id).await {
            Ok(()) => {
                self.notifier.notify(Notice::success(format!(
                    "Switched to {}",
                    descriptor.display_name
                )));
                WalletSwitch::Switched
            }
            Err(e) if e.is_user_rejection() => {
                self.notifier.notify(Notice::info(format!(
                    "Network switch to {} was declined in the wallet",
                    descriptor.display_name
                )));
                WalletSwitch::Rejected
            }
            Err(e) => {
                let message = format!(
                    "Failed to switch wallet to {}: {}",
                    descriptor.display_name, e
                );
                self.notifier.notify(Notice::error(message.clone()));
                WalletSwitch::Failed(message)
            }
        }
    }

    /// Follow the wallet's reported network without asking it to switch.
    pub fn reconcile_from_wallet(&self, status: &WalletStatus) -> ReconcileOutcome {
        if !status.connected {
            return ReconcileOutcome::Disconnected;
        }
        let Some(chain_id) = status.chain_id else {
            return ReconcileOutcome::UnknownNetwork;
        };
        let Some(descriptor) = self.registry.find_by_numeric_id(chain_id) else {
            log::warn!("Wallet is on unsupported network {}", chain_id);
            return ReconcileOutcome::UnsupportedNetwork(chain_id);
        };

        let to = descriptor.key;
        let mut from = to;
        let changed = self.state.send_if_modified(|state| {
            from = state.current_key;
            if state.current_key == to {
                return false;
            }
            state.current_key = to;
            true
        });
        if !changed {
            return ReconcileOutcome::InSync;
        }

        self.store.save(to);
        log::info!("Chain selection reconciled from wallet: {} -> {}", from, to);
        self.notifier.notify(Notice::info(format!(
            "Wallet switched to {}",
            descriptor.display_name
        )));
        ReconcileOutcome::Reconciled { from, to }
    }
}
