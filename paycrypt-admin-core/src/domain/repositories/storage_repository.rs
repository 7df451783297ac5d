//! Storage repository for persisted client state
//!
//! The key-value contract the selection store and session sit on top of.

use crate::shared::error::AdminError;

/// Key-value persistence trait
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>, AdminError>;

    /// Write a value
    fn set(&self, key: &str, value: &str) -> Result<(), AdminError>;

    /// Delete a value; deleting an absent key is not an error
    fn remove(&self, key: &str) -> Result<(), AdminError>;
}
