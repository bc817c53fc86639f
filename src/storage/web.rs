//! Browser `localStorage` backend.

use super::KeyValueStorage;
use crate::error::StorageError;

/// `window.localStorage`, optionally namespaced by a key prefix.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    prefix: String,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every key, e.g. `"cryptofolio."` turns `token` into `cryptofolio.token`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window object".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))
    }
}

impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(&self.key(key))
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(&self.key(key), value)
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(&self.key(key))
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }
}
