//! Persisted selection store
//!
//! Best-effort persistence of the last selected chain. `load` and `save`
//! never fail: storage problems are logged and treated as "nothing stored".

use crate::domain::repositories::KeyValueStore;
use crate::shared::constants::SELECTED_CHAIN_STORAGE_KEY;
use crate::shared::types::ChainKey;
use std::sync::Arc;

#[derive(Clone)]
pub struct SelectionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SelectionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Last saved key, or `None` if absent, unreadable or unrecognized.
    pub fn load(&self) -> Option<ChainKey> {
        let raw = match self.backend.get(SELECTED_CHAIN_STORAGE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("Could not read persisted chain selection: {}", e);
                return None;
            }
        };

        let key = ChainKey::parse(&raw);
        if key.is_none() {
            log::warn!("Ignoring unrecognized persisted chain '{}'", raw);
        }
        key
    }

    pub fn save(&self, key: ChainKey) {
        if let Err(e) = self.backend.set(SELECTED_CHAIN_STORAGE_KEY, key.as_str()) {
            log::warn!("Could not persist chain selection '{}': {}", key, e);
        }
    }
}
