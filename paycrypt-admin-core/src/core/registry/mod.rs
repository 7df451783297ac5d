//! Chain registry
//!
//! Fixed table of chain descriptors built once at startup. A registry that
//! constructs successfully holds exactly one descriptor per `ChainKey`, with
//! pairwise-distinct numeric ids and no empty fields.

use crate::domain::entities::ChainDescriptor;
use crate::shared::constants::{BASE_CHAIN, CELO_CHAIN, LISK_CHAIN};
use crate::shared::error::AdminError;
use crate::shared::types::ChainKey;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ChainRegistry {
    // Indexed by `ChainKey::index()`.
    descriptors: Vec<ChainDescriptor>,
}

impl ChainRegistry {
    /// Validate and index a descriptor set. Any violation is a configuration
    /// error and should abort startup.
    pub fn new(descriptors: Vec<ChainDescriptor>) -> Result<Self, AdminError> {
        let mut slots: Vec<Option<ChainDescriptor>> = vec![None; ChainKey::COUNT];
        let mut seen_ids: HashMap<u64, ChainKey> = HashMap::new();

        for descriptor in descriptors {
            descriptor.validate()?;

            if let Some(other) = seen_ids.insert(descriptor.numeric_id, descriptor.key) {
                return Err(AdminError::config(format!(
                    "Chains '{}' and '{}' share numeric id {}",
                    other, descriptor.key, descriptor.numeric_id
                )));
            }

            let slot = &mut slots[descriptor.key.index()];
            if slot.is_some() {
                return Err(AdminError::config(format!(
                    "Chain '{}' is configured more than once",
                    descriptor.key
                )));
            }
            *slot = Some(descriptor);
        }

        let descriptors = slots
            .into_iter()
            .zip(ChainKey::ALL)
            .map(|(slot, key)| {
                slot.ok_or_else(|| AdminError::config(format!("Chain '{}' is not configured", key)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { descriptors })
    }

    /// Built-in mainnet table.
    pub fn with_defaults() -> Result<Self, AdminError> {
        Self::new(Self::default_descriptors())
    }

    /// Built-in table with `PAYCRYPT_<KEY>_*` environment overrides applied.
    pub fn from_env() -> Result<Self, AdminError> {
        Self::new(
            Self::default_descriptors()
                .into_iter()
                .map(ChainDescriptor::with_env_overrides)
                .collect(),
        )
    }

    pub fn default_descriptors() -> Vec<ChainDescriptor> {
        vec![
            ChainDescriptor::from_defaults(ChainKey::Base, &BASE_CHAIN),
            ChainDescriptor::from_defaults(ChainKey::Lisk, &LISK_CHAIN),
            ChainDescriptor::from_defaults(ChainKey::Celo, &CELO_CHAIN),
        ]
    }

    /// Infallible lookup for a recognized key.
    pub fn get(&self, key: ChainKey) -> &ChainDescriptor {
        &self.descriptors[key.index()]
    }

    /// Lookup by symbolic key string.
    pub fn describe(&self, key: &str) -> Result<&ChainDescriptor, AdminError> {
        ChainKey::parse(key)
            .map(|key| self.get(key))
            .ok_or_else(|| AdminError::not_found(format!("Unsupported chain key '{}'", key)))
    }

    pub fn find_by_numeric_id(&self, numeric_id: u64) -> Option<&ChainDescriptor> {
        self.descriptors.iter().find(|d| d.numeric_id == numeric_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_key_resolves_with_unique_numeric_id() {
        let registry = ChainRegistry::with_defaults().unwrap();
        let mut ids = HashSet::new();
        for key in ChainKey::ALL {
            let descriptor = registry.describe(key.as_str()).unwrap();
            assert_eq!(descriptor.key, key);
            assert!(ids.insert(descriptor.numeric_id), "duplicate id for {}", key);
        }
        assert_eq!(registry.len(), ChainKey::COUNT);
    }

    #[test]
    fn test_describe_unknown_key() {
        let registry = ChainRegistry::with_defaults().unwrap();
        assert!(matches!(registry.describe("dogecoin"), Err(AdminError::NotFound(_))));
    }

    #[test]
    fn test_find_by_numeric_id() {
        let registry = ChainRegistry::with_defaults().unwrap();
        assert_eq!(registry.find_by_numeric_id(42220).map(|d| d.key), Some(ChainKey::Celo));
        assert!(registry.find_by_numeric_id(1).is_none());
    }

    #[test]
    fn test_duplicate_numeric_id_is_fatal() {
        let mut descriptors = ChainRegistry::default_descriptors();
        descriptors[2].numeric_id = descriptors[0].numeric_id;
        let err = ChainRegistry::new(descriptors).unwrap_err();
        assert!(matches!(err, AdminError::Config(_)));
        assert!(err.to_string().contains("share numeric id"));
    }

    #[test]
    fn test_missing_and_repeated_keys_are_fatal() {
        let mut descriptors = ChainRegistry::default_descriptors();
        descriptors.pop();
        assert!(matches!(ChainRegistry::new(descriptors), Err(AdminError::Config(_))));

        let mut descriptors = ChainRegistry::default_descriptors();
        let mut extra = descriptors[0].clone();
        extra.numeric_id = 999_999;
        descriptors.push(extra);
        assert!(matches!(ChainRegistry::new(descriptors), Err(AdminError::Config(_))));
    }

    #[test]
    fn test_empty_field_is_fatal() {
        let mut descriptors = ChainRegistry::default_descriptors();
        descriptors[1].display_name.clear();
        assert!(matches!(ChainRegistry::new(descriptors), Err(AdminError::Config(_))));
    }
}
