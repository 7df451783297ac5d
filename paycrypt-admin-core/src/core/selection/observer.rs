//! Wallet network observer
//!
//! Background tasks that poll the wallet and feed its reported network into
//! [`ChainSelectionCoordinator::reconcile_from_wallet`].

use crate::core::selection::coordinator::{ChainSelectionCoordinator, ReconcileOutcome};
use crate::domain::repositories::WalletProvider;
use crate::shared::types::WalletStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

pub struct WalletNetworkObserver;

impl WalletNetworkObserver {
    /// Reconcile on the current status and on every change until the
    /// sending side is dropped.
    pub fn spawn(
        coordinator: Arc<ChainSelectionCoordinator>,
        mut status: watch::Receiver<WalletStatus>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let current = status.borrow_and_update().clone();
                match coordinator.reconcile_from_wallet(&current) {
                    ReconcileOutcome::Reconciled { .. } | ReconcileOutcome::InSync => {}
                    outcome => log::debug!("Wallet status not reconciled: {:?}", outcome),
                }

                if status.changed().await.is_err() {
                    break;
                }
            }
            log::debug!("Wallet status feed closed, observer stopped");
        })
    }
}

/// Poll `wallet` every `period`, publishing status changes. The task ends
/// once every receiver is dropped.
pub fn watch_wallet(
    wallet: Arc<dyn WalletProvider>,
    period: Duration,
) -> (watch::Receiver<WalletStatus>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(WalletStatus::disconnected());

    let handle = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut reachable = true;

        loop {
            ticker.tick().await;
            if tx.is_closed() {
                break;
            }

            match wallet.status().await {
                Ok(next) => {
                    if !reachable {
                        log::info!("Wallet reachable again");
                        reachable = true;
                    }
                    tx.send_if_modified(|current| {
                        if *current == next {
                            return false;
                        }
                        log::debug!("Wallet status changed: {:?}", next);
                        *current = next;
                        true
                    });
                }
                Err(e) => {
                    if reachable {
                        log::warn!("Wallet status unavailable: {}", e);
                        reachable = false;
                    }
                }
            }
        }
    });

    (rx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notifications::NoticeBoard;
    use crate::core::registry::ChainRegistry;
    use crate::core::selection::store::SelectionStore;
    use crate::domain::repositories::MockWalletProvider;
    use crate::infrastructure::{MemoryStore, NoWallet};
    use crate::shared::types::ChainKey;
    use tokio::time::timeout;

    fn coordinator() -> (Arc<ChainSelectionCoordinator>, SelectionStore) {
        let store = SelectionStore::new(Arc::new(MemoryStore::new()));
        let coordinator = ChainSelectionCoordinator::start(
            Arc::new(ChainRegistry::with_defaults().unwrap()),
            store.clone(),
            ChainKey::Base,
            Arc::new(NoWallet),
            Arc::new(NoticeBoard::new()),
        );
        (Arc::new(coordinator), store)
    }

    #[tokio::test]
    async fn test_observer_follows_wallet_network() {
        let (coordinator, store) = coordinator();
        let mut changes = coordinator.subscribe();
        let (tx, rx) = watch::channel(WalletStatus::disconnected());
        let handle = WalletNetworkObserver::spawn(coordinator.clone(), rx);

        tx.send(WalletStatus::connected(42220, None)).unwrap();
        timeout(Duration::from_secs(1), changes.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(coordinator.current_key(), ChainKey::Celo);
        assert_eq!(store.load(), Some(ChainKey::Celo));

        drop(tx);
        timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_observer_leaves_selection_on_unsupported_network() {
        let (coordinator, store) = coordinator();
        let (tx, rx) = watch::channel(WalletStatus::connected(137, None));
        let handle = WalletNetworkObserver::spawn(coordinator.clone(), rx);

        tx.send(WalletStatus::connected(56, None)).unwrap();
        drop(tx);
        timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();

        assert_eq!(coordinator.current_key(), ChainKey::Base);
        assert_eq!(store.load(), None);
    }

    #[tokio::test]
    async fn test_watch_wallet_publishes_status() {
        let mut wallet = MockWalletProvider::new();
        wallet
            .expect_status()
            .returning(|| Ok(WalletStatus::connected(1135, None)));

        let (mut rx, handle) = watch_wallet(Arc::new(wallet), Duration::from_millis(10));
        timeout(Duration::from_secs(1), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rx.borrow().chain_id, Some(1135));

        drop(rx);
        timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
    }
}
