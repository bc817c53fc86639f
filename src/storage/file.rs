//! JSON-file key/value backend (native only).
//!
//! All keys live in one JSON object. Every write rewrites the whole document to
//! a sibling temp file and renames it into place, so a crash mid-write leaves
//! either the old or the new document on disk, never a torn one.

use super::{KeyValueStorage, StorageOp};
use crate::error::StorageError;

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

type Document = BTreeMap<String, String>;

/// Durable storage in a single JSON file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Document, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            StorageError::Corrupted(format!("{}: {}", self.path.display(), e))
        })
    }

    fn write_document(&self, document: &Document) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(document)
            .map_err(|e| StorageError::Corrupted(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Read-modify-write under the write lock. A corrupted document is
    /// replaced rather than preserved.
    fn update(&self, f: impl FnOnce(&mut Document)) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let mut document = self.read_document().unwrap_or_default();
        f(&mut document);
        self.write_document(&document)
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_document()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|document| {
            document.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|document| {
            document.remove(key);
        })
    }

    fn apply(&self, ops: &[StorageOp]) -> Result<(), StorageError> {
        self.update(|document| {
            for op in ops {
                match op {
                    StorageOp::Set { key, value } => {
                        document.insert(key.to_string(), value.clone());
                    }
                    StorageOp::Remove { key } => {
                        document.remove(*key);
                    }
                }
            }
        })
    }
}
