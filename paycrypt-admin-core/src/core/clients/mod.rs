//! Per-chain derived clients
//!
//! Read-only RPC provider, payment contract handle and explorer links for a
//! chain. Descriptors never change, so clients are built once per key.

use crate::core::contract::PaycryptContract;
use crate::core::registry::ChainRegistry;
use crate::core::selection::ChainSelectionCoordinator;
use crate::domain::entities::ChainDescriptor;
use crate::shared::error::AdminError;
use crate::shared::types::ChainKey;
use ethers::providers::{Http, Provider};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct ChainClients {
    pub key: ChainKey,
    pub chain_id: u64,
    pub descriptor: ChainDescriptor,
    pub provider: Arc<Provider<Http>>,
    pub contract: PaycryptContract,
}

impl ChainClients {
    pub fn build(descriptor: &ChainDescriptor) -> Result<Self, AdminError> {
        let provider = Provider::<Http>::try_from(descriptor.rpc_endpoint.as_str()).map_err(|e| {
            AdminError::config(format!(
                "Invalid RPC endpoint for {}: {}",
                descriptor.display_name, e
            ))
        })?;
        let provider = Arc::new(provider);
        let contract = PaycryptContract::new(descriptor.contract()?, descriptor.numeric_id, provider.clone())?;

        Ok(Self {
            key: descriptor.key,
            chain_id: descriptor.numeric_id,
            descriptor: descriptor.clone(),
            provider,
            contract,
        })
    }

    pub fn explorer_base_url(&self) -> &str {
        &self.descriptor.explorer_base_url
    }

    pub fn tx_url(&self, tx_hash: &str) -> String {
        self.descriptor.tx_url(tx_hash)
    }

    pub fn address_url(&self, address: &str) -> String {
        self.descriptor.address_url(address)
    }

    pub fn token_url(&self, token: &str) -> String {
        self.descriptor.token_url(token)
    }
}

pub struct DerivedClients {
    registry: Arc<ChainRegistry>,
    cache: Mutex<HashMap<ChainKey, Arc<ChainClients>>>,
}

impl DerivedClients {
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self {
            registry,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn for_key(&self, key: ChainKey) -> Result<Arc<ChainClients>, AdminError> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| AdminError::internal("Client cache lock poisoned"))?;
        if let Some(clients) = cache.get(&key) {
            return Ok(clients.clone());
        }

        let clients = Arc::new(ChainClients::build(self.registry.get(key))?);
        log::debug!("Built clients for {} ({})", key, clients.descriptor.rpc_endpoint);
        cache.insert(key, clients.clone());
        Ok(clients)
    }

    /// Clients for the coordinator's current selection.
    pub fn current(&self, coordinator: &ChainSelectionCoordinator) -> Result<Arc<ChainClients>, AdminError> {
        let descriptor = coordinator
            .chain_config()
            .ok_or_else(|| AdminError::internal("Chain selection is still initializing"))?;
        self.for_key(descriptor.key)
    }

    /// Clients for every chain, in registry order.
    pub fn all(&self) -> Result<Vec<Arc<ChainClients>>, AdminError> {
        ChainKey::ALL.iter().map(|key| self.for_key(*key)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notifications::NoticeBoard;
    use crate::core::selection::SelectionStore;
    use crate::infrastructure::{MemoryStore, NoWallet};

    #[test]
    fn test_clients_are_memoized_per_key() {
        let registry = Arc::new(ChainRegistry::with_defaults().unwrap());
        let clients = DerivedClients::new(registry);

        let first = clients.for_key(ChainKey::Celo).unwrap();
        let second = clients.for_key(ChainKey::Celo).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.chain_id, 42220);
        assert!(first.tx_url("0xabc").starts_with("https://celoscan.io"));

        let base = clients.for_key(ChainKey::Base).unwrap();
        assert!(!Arc::ptr_eq(&first, &base));
        assert_eq!(clients.all().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_current_follows_selection() {
        let registry = Arc::new(ChainRegistry::with_defaults().unwrap());
        let coordinator = ChainSelectionCoordinator::new(
            registry.clone(),
            SelectionStore::new(Arc::new(MemoryStore::new())),
            ChainKey::Base,
            Arc::new(NoWallet),
            Arc::new(NoticeBoard::new()),
        );
        let clients = DerivedClients::new(registry);

        assert!(clients.current(&coordinator).is_err());

        coordinator.initialize();
        assert_eq!(clients.current(&coordinator).unwrap().key, ChainKey::Base);

        coordinator.select("lisk").await;
        let lisk = clients.current(&coordinator).unwrap();
        assert_eq!(lisk.key, ChainKey::Lisk);
        assert_eq!(lisk.contract.chain_id(), 1135);
    }
}
