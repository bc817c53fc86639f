//! Unified SDK error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// 401, with the server's message when the body carried one.
    #[error("Unauthorized")]
    Unauthorized(Option<String>),

    /// `message` is the JSON `message`/`error` field; `body` is the raw text.
    #[error("Not found: {body}")]
    NotFound { message: Option<String>, body: String },

    #[error("Bad request ({status}): {body}")]
    BadRequest {
        status: u16,
        message: Option<String>,
        body: String,
    },

    #[error("Server error {status}: {body}")]
    ServerError {
        status: u16,
        message: Option<String>,
        body: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Registration failed: {0}")]
    RegistrationFailed(String),
}

/// Token storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupted entry: {0}")]
    Corrupted(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Coarse classification used by views to pick an error presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The request never reached the server.
    NetworkUnreachable,
    /// The server did not answer within the configured timeout.
    Timeout,
    /// 401: the token is missing, invalid or expired.
    Unauthorized,
    /// 4xx with a message payload, or a response that did not match its schema.
    Validation,
    /// 5xx.
    Server,
    /// Local failure that never involved the server (storage, encoding).
    Internal,
}

impl HttpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            #[cfg(feature = "http")]
            Self::Reqwest(e) if e.is_timeout() => ErrorKind::Timeout,
            #[cfg(feature = "http")]
            Self::Reqwest(e) if e.is_decode() => ErrorKind::Validation,
            #[cfg(feature = "http")]
            Self::Reqwest(_) => ErrorKind::NetworkUnreachable,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::NotFound { .. } | Self::BadRequest { .. } | Self::InvalidResponse(_) => {
                ErrorKind::Validation
            }
            Self::ServerError { .. } => ErrorKind::Server,
            Self::Timeout => ErrorKind::Timeout,
        }
    }

    /// Message reported by the server in a JSON error body. Raw bodies
    /// (HTML error pages, stack traces) never count as a message.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::NotFound { message, .. }
            | Self::BadRequest { message, .. }
            | Self::ServerError { message, .. }
            | Self::Unauthorized(message) => message.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }
}

impl SdkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(e) => e.kind(),
            Self::Auth(_) => ErrorKind::Validation,
            Self::Storage(_) | Self::Other(_) => ErrorKind::Internal,
            Self::Validation(_) | Self::Serde(_) => ErrorKind::Validation,
        }
    }

    /// Human-readable message for display: the server's own message when one
    /// was returned, otherwise a generic transport-level description.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(e) => match e.server_message() {
                Some(message) => message.to_string(),
                None => generic_message(e.kind()).to_string(),
            },
            Self::Auth(AuthError::LoginFailed(m) | AuthError::RegistrationFailed(m)) => m.clone(),
            other => other.to_string(),
        }
    }
}

pub(crate) fn generic_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NetworkUnreachable => "Unable to reach the server",
        ErrorKind::Timeout => "The server took too long to respond",
        ErrorKind::Unauthorized => "Session expired, please log in again",
        ErrorKind::Validation => "The request was rejected",
        ErrorKind::Server => "The server encountered an error",
        ErrorKind::Internal => "Something went wrong on this device",
    }
}

/// Cloneable error stored inside fetch state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<&SdkError> for FetchError {
    fn from(e: &SdkError) -> Self {
        Self::new(e.kind(), e.user_message())
    }
}

impl From<SdkError> for FetchError {
    fn from(e: SdkError) -> Self {
        Self::from(&e)
    }
}

impl From<HttpError> for FetchError {
    fn from(e: HttpError) -> Self {
        Self::from(SdkError::from(e))
    }
}
