//! Authentication — credentials, user profile, session state, login/logout.
//!
//! ## Token lifecycle
//!
//! - **Acquisition**: `login` returns a bearer token (and optionally a refresh
//!   token) which is persisted by the [`TokenStore`](crate::storage::TokenStore)
//!   together with the user profile.
//! - **Use**: the HTTP layer reads the token from the store on every request.
//!   The session never caches it.
//! - **Expiry**: a `401` on an authenticated request either forces a logout or
//!   triggers a single refresh, depending on the configured
//!   [`UnauthorizedPolicy`](crate::http::UnauthorizedPolicy). A forced logout
//!   is reported back to the [`SessionManager`](client::SessionManager).
//! - **Teardown**: `logout` is local only. It clears the store and resets the
//!   session, and cannot fail.
//!
//! ## Session Hydration
//!
//! On startup call `restore_cached_user()` for an optimistic profile, then
//! `validate_existing_token()` to confirm the stored token with the backend.
//! Validation without a stored token is a no-op and performs no network call.

#[cfg(feature = "http")]
pub mod client;

pub mod session;

pub use session::{LifecycleStatus, Session, SessionPhase};

use serde::{Deserialize, Serialize};

use crate::shared::serde_util::string_or_number;

// ============================================================================
// User profile types
// ============================================================================

/// Profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Bearer token plus the optional refresh token issued alongside it.
///
/// Persisted by the token store only; `Debug` never prints the secrets.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub refresh_token: Option<String>,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            refresh_token: None,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// `POST /api/auth/login` body.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// `POST /api/auth/login` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// `POST /api/auth/register` body.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// `POST /api/auth/register` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// `GET /api/auth/validate` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateResponse {
    pub user: User,
}

/// Refresh request body.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh response: a new bearer token, and a rotated refresh token if the
/// backend rotates them.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl From<RefreshResponse> for Credential {
    fn from(resp: RefreshResponse) -> Self {
        Self {
            token: resp.token,
            refresh_token: resp.refresh_token,
        }
    }
}
