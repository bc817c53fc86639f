//! # Cryptofolio SDK
//!
//! Session and data-sync core of the Cryptofolio portfolio tracker, for both
//! native and WASM clients.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Domain models, derived metrics, list state machines and
//!    durable token storage (always available, WASM-safe)
//! 2. **Auth** — Credentials, user profile and the session state machine
//! 3. **HTTP API** — `CryptofolioHttp` with per-endpoint auth policies and
//!    401 handling
//! 4. **High-Level Client** — `CryptofolioClient` with nested sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cryptofolio_sdk::prelude::*;
//!
//! let client = CryptofolioClient::builder()
//!     .base_url("http://localhost:8080")
//!     .token_file("session.json")
//!     .build()?;
//!
//! client.auth().validate_existing_token().await?;
//! let page = client.transactions().list_handle().refresh().await?;
//! let portfolio = client.portfolios().get("Binance").await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared types used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Generic paginated fetching: queries, fetch state, list driver.
pub mod resource;

/// Durable credential storage.
pub mod storage;

/// Unified SDK error types.
pub mod error;

/// Network defaults.
pub mod network;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Authentication: credentials, session state, login/logout.
pub mod auth;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with auth policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `CryptofolioClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared types
    pub use crate::shared::{Outcome, Sort, SortDirection, TradeSide};

    // Domain types
    pub use crate::domain::coin::CoinInformation;
    pub use crate::domain::holding::Holding;
    pub use crate::domain::portfolio::{
        HoldingMetrics, Multipliers, PortfolioDetail, PortfolioSnapshot, PortfolioSummary,
        PortfolioTotals,
    };
    pub use crate::domain::transaction::{
        filter as transaction_filter, AmountOperator, NewTransaction, Transaction,
    };

    // Resource fetching
    pub use crate::resource::{
        FetchState, FetchStatus, FilterValue, ListState, PageFetcher, ResourceList, ResourcePage,
        ResourceQuery, StalePolicy,
    };

    // Errors
    pub use crate::error::{ErrorKind, FetchError, SdkError};

    // Network
    pub use crate::network::DEFAULT_API_URL;

    // Auth + storage
    pub use crate::auth::{Credential, LifecycleStatus, Session, SessionPhase, User};
    pub use crate::storage::{KeyValueStorage, MemoryStorage, TokenStore};

    #[cfg(all(feature = "file-storage", not(target_arch = "wasm32")))]
    pub use crate::storage::FileStorage;

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::auth::client::SessionManager;
    #[cfg(feature = "http")]
    pub use crate::client::{
        CoinsClient, CryptofolioClient, CryptofolioClientBuilder, HoldingsClient,
        PortfoliosClient, TransactionsClient,
    };
    #[cfg(feature = "http")]
    pub use crate::http::{AuthPolicy, UnauthorizedPolicy};
}
