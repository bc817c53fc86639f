//! Session state owned by the [`SessionManager`](super::client::SessionManager).

use serde::{Deserialize, Serialize};

use super::User;

/// Message recorded when the backend rejects the stored token.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please log in again";

/// Status of the most recent session operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStatus {
    #[default]
    Idle,
    Pending,
    Ready,
    Failed,
}

/// Coarse session phase, derived from [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Anonymous,
    Authenticating,
    Authenticated,
}

/// Snapshot of the authentication state.
///
/// `user` and `is_authenticated` are only ever changed together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub lifecycle_status: LifecycleStatus,
    pub last_error: Option<String>,
    /// Confirmation message from the last successful registration.
    pub message: Option<String>,
}

impl Session {
    pub fn phase(&self) -> SessionPhase {
        if self.lifecycle_status == LifecycleStatus::Pending {
            SessionPhase::Authenticating
        } else if self.is_authenticated {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }

    pub(crate) fn begin(&mut self) {
        self.lifecycle_status = LifecycleStatus::Pending;
        self.last_error = None;
        self.message = None;
    }

    pub(crate) fn authenticate(&mut self, user: User) {
        self.user = Some(user);
        self.is_authenticated = true;
        self.lifecycle_status = LifecycleStatus::Ready;
        self.last_error = None;
    }

    pub(crate) fn fail(&mut self, error: impl Into<String>) {
        self.user = None;
        self.is_authenticated = false;
        self.lifecycle_status = LifecycleStatus::Failed;
        self.last_error = Some(error.into());
    }

    /// Back to anonymous. A pending operation keeps its status.
    pub(crate) fn expire(&mut self) {
        self.user = None;
        self.is_authenticated = false;
        if self.lifecycle_status != LifecycleStatus::Pending {
            self.lifecycle_status = LifecycleStatus::Failed;
        }
        self.last_error = Some(SESSION_EXPIRED_MESSAGE.to_string());
    }

    pub(crate) fn reset(&mut self) {
        *self = Session::default();
    }
}
