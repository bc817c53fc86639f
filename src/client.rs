//! High-level client — `CryptofolioClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the session manager and accessor methods.

use crate::auth::client::SessionManager;
use crate::domain::coin::client::Coins;
use crate::domain::holding::client::Holdings;
use crate::domain::portfolio::client::Portfolios;
use crate::domain::transaction::client::Transactions;
use crate::error::SdkError;
use crate::http::{CryptofolioHttp, UnauthorizedPolicy};
use crate::network::{DEFAULT_API_URL, DEFAULT_TIMEOUT};
use crate::resource::StalePolicy;
use crate::storage::TokenStore;

use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::domain::coin::client::Coins as CoinsClient;
pub use crate::domain::holding::client::Holdings as HoldingsClient;
pub use crate::domain::portfolio::client::Portfolios as PortfoliosClient;
pub use crate::domain::transaction::client::Transactions as TransactionsClient;

/// The primary entry point for the Cryptofolio SDK.
///
/// Provides nested sub-client accessors for each domain:
/// `client.transactions()`, `client.portfolios()`, etc. Cloning shares the
/// HTTP connection pool, the token store and the session.
#[derive(Clone)]
pub struct CryptofolioClient {
    pub(crate) http: CryptofolioHttp,
    pub(crate) session: SessionManager,
    /// Applied to every list handle created by the sub-clients.
    pub(crate) stale_policy: StalePolicy,
}

impl CryptofolioClient {
    pub fn builder() -> CryptofolioClientBuilder {
        CryptofolioClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn auth(&self) -> &SessionManager {
        &self.session
    }

    pub fn transactions(&self) -> Transactions<'_> {
        Transactions { client: self }
    }

    pub fn portfolios(&self) -> Portfolios<'_> {
        Portfolios { client: self }
    }

    pub fn holdings(&self) -> Holdings<'_> {
        Holdings { client: self }
    }

    pub fn coins(&self) -> Coins<'_> {
        Coins { client: self }
    }

    /// The underlying HTTP client, for endpoints without a sub-client.
    pub fn http(&self) -> &CryptofolioHttp {
        &self.http
    }

    pub fn stale_policy(&self) -> StalePolicy {
        self.stale_policy
    }
}

impl std::fmt::Debug for CryptofolioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptofolioClient")
            .field("base_url", &self.http.base_url())
            .field("session", &self.session)
            .field("stale_policy", &self.stale_policy)
            .finish()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct CryptofolioClientBuilder {
    base_url: String,
    timeout: Duration,
    unauthorized: UnauthorizedPolicy,
    tokens: Option<TokenStore>,
    stale_policy: StalePolicy,
}

impl Default for CryptofolioClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            unauthorized: UnauthorizedPolicy::default(),
            tokens: None,
            stale_policy: StalePolicy::default(),
        }
    }
}

impl CryptofolioClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// What to do when an authenticated request is rejected with 401.
    pub fn unauthorized_policy(mut self, policy: UnauthorizedPolicy) -> Self {
        self.unauthorized = policy;
        self
    }

    /// Where credentials persist. Defaults to memory (lost on exit).
    pub fn token_store(mut self, tokens: TokenStore) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Persist credentials in a JSON file at `path`.
    #[cfg(all(feature = "file-storage", not(target_arch = "wasm32")))]
    pub fn token_file(self, path: impl Into<std::path::PathBuf>) -> Self {
        self.token_store(TokenStore::new(crate::storage::FileStorage::new(path)))
    }

    /// Persist credentials in the browser's `localStorage`.
    #[cfg(feature = "web-storage")]
    pub fn browser_storage(self) -> Self {
        self.token_store(TokenStore::new(crate::storage::LocalStorage::new()))
    }

    pub fn stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    pub fn build(self) -> Result<CryptofolioClient, SdkError> {
        if self.timeout.is_zero() {
            return Err(SdkError::Validation("Timeout must be positive".to_string()));
        }

        let http = CryptofolioHttp::new(
            &self.base_url,
            self.tokens.unwrap_or_default(),
            self.timeout,
            self.unauthorized,
        )?;
        tracing::debug!(base_url = %http.base_url(), timeout = ?self.timeout, "Client built");

        Ok(CryptofolioClient {
            session: SessionManager::new(http.clone()),
            http,
            stale_policy: self.stale_policy,
        })
    }
}
