//! Platform-specific storage implementations
//!
//! Persistence for the small amount of client state the dashboard keeps:
//! the selected chain and the admin bearer token.

use crate::domain::repositories::KeyValueStore;
use crate::shared::constants::{STATE_DIR_NAME, STATE_FILE_NAME};
use crate::shared::error::AdminError;
use crate::shared::utils::env_non_empty;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// In-process store; state dies with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AdminError> {
        let entries = self.entries.lock()
            .map_err(|_| AdminError::storage("Memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AdminError> {
        let mut entries = self.entries.lock()
            .map_err(|_| AdminError::storage("Memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AdminError> {
        let mut entries = self.entries.lock()
            .map_err(|_| AdminError::storage("Memory store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// JSON object file, rewritten on every mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open (or create) the store file inside `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, AdminError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .map_err(|e| AdminError::storage(format!("Failed to create state dir {}: {}", dir.display(), e)))?;
        let path = dir.join(STATE_FILE_NAME);

        let entries = if path.exists() {
            let data = fs::read_to_string(&path)?;
            match serde_json::from_str::<HashMap<String, String>>(&data) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("Ignoring unreadable state file {}: {}", path.display(), e);
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        log::debug!("State file: {}", path.display());
        Ok(Self { path, entries: Mutex::new(entries) })
    }

    /// `PAYCRYPT_STATE_DIR`, else the OS local data directory.
    pub fn default_dir() -> PathBuf {
        if let Some(dir) = env_non_empty("PAYCRYPT_STATE_DIR") {
            return PathBuf::from(dir);
        }
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("./data"))
            .join(STATE_DIR_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), AdminError> {
        let data = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        let mut file = File::create(&tmp)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(&data)?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AdminError> {
        let entries = self.entries.lock()
            .map_err(|_| AdminError::storage("State file lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AdminError> {
        let mut entries = self.entries.lock()
            .map_err(|_| AdminError::storage("State file lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), AdminError> {
        let mut entries = self.entries.lock()
            .map_err(|_| AdminError::storage("State file lock poisoned"))?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.set("paycrypt_selected_chain", "celo").unwrap();
        }
        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get("paycrypt_selected_chain").unwrap().as_deref(),
            Some("celo")
        );
    }

    #[test]
    fn test_file_store_tolerates_corrupt_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(STATE_FILE_NAME), "{not json").unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
        store.set("anything", "ok").unwrap();
        assert_eq!(store.get("anything").unwrap().as_deref(), Some("ok"));
    }
}
