//! Persistent key/value storage for client-side state
//!
//! Values are JSON documents under fixed keys. Reads are tolerant: a
//! missing key or malformed content yields the default value.

use crate::error::StorageResult;
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Cart snapshot
pub const CART_KEY: &str = "velvetbrew_cart_v1";
/// Free-text order notes
pub const NOTES_KEY: &str = "velvetbrew_order_notes_v1";
/// Fulfillment preference ("delivery" / "pickup")
pub const FULFILLMENT_KEY: &str = "velvetbrew_fulfillment_v1";
/// Last placed order, read by the receipt page
pub const LAST_ORDER_KEY: &str = "velvetbrew_last_order";
/// Admin JWT
pub const ADMIN_TOKEN_KEY: &str = "velvetbrew_admin_token";

/// String key/value store
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// Read and parse a JSON value; absent, unreadable or malformed -> `None`
pub fn read_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Failed to read stored value");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(key = %key, error = %e, "Discarding malformed stored value");
            None
        }
    }
}

pub fn write_json<T: Serialize + ?Sized>(storage: &dyn Storage, key: &str, value: &T) -> StorageResult<()> {
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw)
}

/// In-memory storage for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.data.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.data.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.data.lock().remove(key);
        Ok(())
    }
}

/// Single JSON document on disk holding every key.
///
/// Loaded once on open and rewritten on each change. Concurrent writers
/// from separate processes are not coordinated; the last write wins.
#[derive(Debug)]
pub struct FileStorage {
    file_path: PathBuf,
    data: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Open the store at `path`. A missing or corrupt file starts empty.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let file_path = path.as_ref().to_path_buf();
        let data = if file_path.exists() {
            let content = std::fs::read_to_string(&file_path)?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %file_path.display(), error = %e, "Storage file is corrupt, starting empty");
                HashMap::new()
            })
        } else {
            HashMap::new()
        };

        Ok(Self {
            file_path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn save(&self, data: &HashMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.file_path, content)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.data.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut data = self.data.lock();
        data.insert(key.to_string(), value.to_string());
        self.save(&data)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut data = self.data.lock();
        if data.remove(key).is_some() {
            self.save(&data)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_tolerates_garbage() {
        let storage = MemoryStorage::new();
        assert_eq!(read_json::<Vec<u32>>(&storage, "k"), None);

        storage.set("k", "{not json").unwrap();
        assert_eq!(read_json::<Vec<u32>>(&storage, "k"), None);

        storage.set("k", "\"a string\"").unwrap();
        assert_eq!(read_json::<Vec<u32>>(&storage, "k"), None);

        write_json(&storage, "k", &vec![1u32, 2]).unwrap();
        assert_eq!(read_json::<Vec<u32>>(&storage, "k"), Some(vec![1, 2]));
    }

    #[test]
    fn test_file_storage_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state/storage.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set(NOTES_KEY, "\"no sugar\"").unwrap();
        storage.set(FULFILLMENT_KEY, "\"delivery\"").unwrap();
        storage.remove(FULFILLMENT_KEY).unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(NOTES_KEY).unwrap().as_deref(), Some("\"no sugar\""));
        assert_eq!(reopened.get(FULFILLMENT_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_storage_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "garbage").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_arc_storage_shares_state() {
        let storage = Arc::new(MemoryStorage::new());
        let other = Arc::clone(&storage);
        storage.set("k", "v").unwrap();
        assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
    }
}
