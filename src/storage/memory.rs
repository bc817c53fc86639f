//! In-memory key/value backend.

use super::{KeyValueStorage, StorageOp};
use crate::error::StorageError;

use parking_lot::Mutex;
use std::collections::HashMap;

/// Process-local storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn apply(&self, ops: &[StorageOp]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        for op in ops {
            match op {
                StorageOp::Set { key, value } => {
                    entries.insert(key.to_string(), value.clone());
                }
                StorageOp::Remove { key } => {
                    entries.remove(*key);
                }
            }
        }
        Ok(())
    }
}
