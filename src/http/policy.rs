//! Per-endpoint auth policy and the response to rejected tokens.

use crate::network::DEFAULT_REFRESH_PATH;

/// Whether an endpoint carries the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Attach the stored token; a 401 applies the [`UnauthorizedPolicy`].
    Bearer,
    /// No token. A 401 is returned as-is (bad credentials, not an expired
    /// session). Used by login, register and refresh.
    Public,
}

/// What happens when an authenticated request is rejected with `401`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UnauthorizedPolicy {
    /// Clear the stored credential and signal reauthentication.
    #[default]
    ForceLogout,
    /// Exchange the refresh token at `path` once, then re-issue the request once.
    RefreshToken { path: String },
}

impl UnauthorizedPolicy {
    /// Refresh against the default endpoint.
    pub fn refresh() -> Self {
        Self::RefreshToken {
            path: DEFAULT_REFRESH_PATH.to_string(),
        }
    }
}

/// Notified after a rejected token has been cleared from storage.
pub trait ReauthListener: Send + Sync {
    fn reauthentication_required(&self);
}
