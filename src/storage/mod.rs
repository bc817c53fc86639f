//! Durable credential storage.
//!
//! [`TokenStore`] is the sole owner of the persisted access token, refresh token
//! and cached user profile. It sits on top of a [`KeyValueStorage`] backend:
//!
//! - [`MemoryStorage`] — process memory (tests, ephemeral CLIs)
//! - [`FileStorage`] — a JSON document on disk, rewritten atomically (native)
//! - [`LocalStorage`] — the browser's `localStorage` (WASM)
//!
//! ## Consistency
//!
//! `save` drops the old token, then writes the user, then the new token.
//! `clear` removes the token before the user. Both run under the store's mutex,
//! so a failed write can leave a user without a token but never a token paired
//! with the wrong user. `load` treats a token without
//! a user (or a user without a token, or an unparsable user) as corruption: it
//! wipes every key and reports nothing stored. Together this means a caller
//! never observes one half of a session without the other.

pub mod memory;

#[cfg(all(feature = "file-storage", not(target_arch = "wasm32")))]
pub mod file;

#[cfg(feature = "web-storage")]
pub mod web;

pub use memory::MemoryStorage;

#[cfg(all(feature = "file-storage", not(target_arch = "wasm32")))]
pub use file::FileStorage;

#[cfg(feature = "web-storage")]
pub use web::LocalStorage;

use crate::auth::{Credential, User};
use crate::error::StorageError;

use parking_lot::Mutex;
use std::sync::Arc;

/// Key holding the raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// Key holding the refresh token, when the backend issued one.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
/// Key holding the serialized user profile.
pub const USER_KEY: &str = "user";

/// A single write against a [`KeyValueStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOp {
    Set { key: &'static str, value: String },
    Remove { key: &'static str },
}

impl StorageOp {
    pub fn set(key: &'static str, value: impl Into<String>) -> Self {
        Self::Set {
            key,
            value: value.into(),
        }
    }

    pub fn remove(key: &'static str) -> Self {
        Self::Remove { key }
    }
}

/// String key/value persistence.
///
/// Backends that can commit several writes at once (a single file rewrite, a
/// single map lock) override [`apply`](KeyValueStorage::apply).
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;

    fn apply(&self, ops: &[StorageOp]) -> Result<(), StorageError> {
        for op in ops {
            match op {
                StorageOp::Set { key, value } => self.set(key, value)?,
                StorageOp::Remove { key } => self.remove(key)?,
            }
        }
        Ok(())
    }
}

/// A persisted session: credential plus the profile it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub credential: Credential,
    pub user: User,
}

/// Credential persistence with all-or-nothing semantics.
#[derive(Clone)]
pub struct TokenStore {
    backend: Arc<dyn KeyValueStorage>,
    lock: Arc<Mutex<()>>,
}

impl TokenStore {
    pub fn new(backend: impl KeyValueStorage + 'static) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    pub fn from_arc(backend: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            backend,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Store backed by process memory.
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Persist a credential together with its user profile.
    pub fn save(&self, credential: &Credential, user: &User) -> Result<(), StorageError> {
        let user_json =
            serde_json::to_string(user).map_err(|e| StorageError::Corrupted(e.to_string()))?;

        let mut ops = vec![
            StorageOp::remove(TOKEN_KEY),
            StorageOp::set(USER_KEY, user_json),
        ];
        ops.push(match &credential.refresh_token {
            Some(refresh) => StorageOp::set(REFRESH_TOKEN_KEY, refresh.as_str()),
            None => StorageOp::remove(REFRESH_TOKEN_KEY),
        });
        ops.push(StorageOp::set(TOKEN_KEY, credential.token.as_str()));

        let _guard = self.lock.lock();
        self.backend.apply(&ops)
    }

    /// Load the persisted session, if a complete one exists.
    ///
    /// Never fails: unreadable or partial data is wiped and reported as absent.
    pub fn load(&self) -> Option<StoredSession> {
        let _guard = self.lock.lock();
        self.load_locked()
    }

    /// Remove every persisted key.
    pub fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        self.backend.apply(&clear_ops())
    }

    /// Current bearer token, read fresh from the backend.
    pub fn token(&self) -> Option<String> {
        self.load().map(|s| s.credential.token)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.load().and_then(|s| s.credential.refresh_token)
    }

    pub fn has_credential(&self) -> bool {
        self.load().is_some()
    }

    /// Clear the store only if it still holds `token`.
    ///
    /// Returns `false` when the token was already replaced (a newer login or a
    /// completed refresh) or removed, leaving the store untouched.
    pub fn clear_if_current(&self, token: &str) -> Result<bool, StorageError> {
        let _guard = self.lock.lock();
        match self.load_locked() {
            Some(stored) if stored.credential.token == token => {
                self.backend.apply(&clear_ops())?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Swap the token (and refresh token) only if the store still holds
    /// `expected`. The cached user profile is kept.
    pub fn replace_token(
        &self,
        expected: &str,
        credential: &Credential,
    ) -> Result<bool, StorageError> {
        let _guard = self.lock.lock();
        match self.load_locked() {
            Some(stored) if stored.credential.token == expected => {
                let refresh = credential
                    .refresh_token
                    .clone()
                    .or(stored.credential.refresh_token);
                let mut ops = Vec::with_capacity(2);
                if let Some(refresh) = refresh {
                    ops.push(StorageOp::set(REFRESH_TOKEN_KEY, refresh));
                }
                ops.push(StorageOp::set(TOKEN_KEY, credential.token.as_str()));
                self.backend.apply(&ops)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn load_locked(&self) -> Option<StoredSession> {
        let read = || -> Result<_, StorageError> {
            Ok((
                self.backend.get(TOKEN_KEY)?,
                self.backend.get(USER_KEY)?,
                self.backend.get(REFRESH_TOKEN_KEY)?,
            ))
        };

        let (token, user, refresh_token) = match read() {
            Ok(entries) => entries,
            Err(e) => {
                self.wipe_locked(&e.to_string());
                return None;
            }
        };

        match (token, user) {
            (None, None) => None,
            (Some(token), Some(raw_user)) if !token.is_empty() => {
                match serde_json::from_str::<User>(&raw_user) {
                    Ok(user) => Some(StoredSession {
                        credential: Credential {
                            token,
                            refresh_token,
                        },
                        user,
                    }),
                    Err(e) => {
                        self.wipe_locked(&format!("unparsable user profile: {}", e));
                        None
                    }
                }
            }
            (Some(_), Some(_)) => {
                self.wipe_locked("empty token");
                None
            }
            (Some(_), None) => {
                self.wipe_locked("token without user profile");
                None
            }
            (None, Some(_)) => {
                self.wipe_locked("user profile without token");
                None
            }
        }
    }

    fn wipe_locked(&self, reason: &str) {
        tracing::warn!(reason, "Discarding corrupted stored session");
        if let Err(e) = self.backend.apply(&clear_ops()) {
            tracing::warn!(error = %e, "Failed to wipe corrupted stored session");
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn clear_ops() -> [StorageOp; 3] {
    [
        StorageOp::remove(TOKEN_KEY),
        StorageOp::remove(REFRESH_TOKEN_KEY),
        StorageOp::remove(USER_KEY),
    ]
}
