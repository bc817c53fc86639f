//! Low-level HTTP client — `CryptofolioHttp`.
//!
//! Typed request helpers against one base URL. Attaches the bearer token read
//! from the [`TokenStore`] on every call and intercepts `401` according to the
//! configured [`UnauthorizedPolicy`]. Returns wire types; conversion to domain
//! types happens in the sub-clients.

use crate::auth::{Credential, RefreshRequest, RefreshResponse};
use crate::error::HttpError;
use crate::http::policy::{AuthPolicy, ReauthListener, UnauthorizedPolicy};
use crate::storage::TokenStore;

use futures_util::future::{select, Either};
use parking_lot::RwLock;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// One field of a `multipart/form-data` body.
#[derive(Debug, Clone)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self::File {
            name: name.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// Request body, kept owned so the request can be re-issued after a refresh.
enum RequestBody<'a> {
    Empty,
    Json(Vec<u8>),
    Multipart(&'a [FormPart]),
}

/// Low-level HTTP client for the Cryptofolio REST API.
#[derive(Clone)]
pub struct CryptofolioHttp {
    base_url: String,
    client: Client,
    timeout: Duration,
    tokens: TokenStore,
    unauthorized: UnauthorizedPolicy,
    listener: Arc<RwLock<Option<Arc<dyn ReauthListener>>>>,
    /// Serializes token refreshes so concurrent 401s trigger one refresh.
    refresh_lock: Arc<async_lock::Mutex<()>>,
}

impl CryptofolioHttp {
    pub fn new(
        base_url: &str,
        tokens: TokenStore,
        timeout: Duration,
        unauthorized: UnauthorizedPolicy,
    ) -> Result<Self, HttpError> {
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder.pool_max_idle_per_host(10);
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
            timeout,
            tokens,
            unauthorized,
            listener: Arc::new(RwLock::new(None)),
            refresh_lock: Arc::new(async_lock::Mutex::new(())),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn unauthorized_policy(&self) -> &UnauthorizedPolicy {
        &self.unauthorized
    }

    /// Register the component notified when stored credentials are dropped
    /// after a rejected token. Replaces any previous listener.
    pub fn set_reauth_listener(&self, listener: Arc<dyn ReauthListener>) {
        *self.listener.write() = Some(listener);
    }

    // ── Request helpers ──────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        auth: AuthPolicy,
    ) -> Result<T, HttpError> {
        self.request(Method::GET, url, RequestBody::Empty, auth)
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        auth: AuthPolicy,
    ) -> Result<T, HttpError> {
        let json = serde_json::to_vec(body)
            .map_err(|e| HttpError::InvalidResponse(format!("Unencodable request body: {}", e)))?;
        self.request(Method::POST, url, RequestBody::Json(json), auth)
            .await
    }

    /// POST without a body.
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        url: &str,
        auth: AuthPolicy,
    ) -> Result<T, HttpError> {
        self.request(Method::POST, url, RequestBody::Empty, auth)
            .await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: &str,
        parts: &[FormPart],
        auth: AuthPolicy,
    ) -> Result<T, HttpError> {
        self.request(Method::POST, url, RequestBody::Multipart(parts), auth)
            .await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: RequestBody<'_>,
        auth: AuthPolicy,
    ) -> Result<T, HttpError> {
        let token = match auth {
            AuthPolicy::Bearer => self.tokens.token(),
            AuthPolicy::Public => None,
        };

        let bytes = match self.send(&method, url, &body, token.as_deref()).await {
            Err(HttpError::Unauthorized(message)) => match token {
                Some(rejected) => {
                    self.handle_unauthorized(&method, url, &body, &rejected, message)
                        .await?
                }
                None => return Err(HttpError::Unauthorized(message)),
            },
            other => other?,
        };

        decode(url, &bytes)
    }

    /// Apply the unauthorized policy after `rejected` drew a 401. Re-issues
    /// the request at most once.
    async fn handle_unauthorized(
        &self,
        method: &Method,
        url: &str,
        body: &RequestBody<'_>,
        rejected: &str,
        message: Option<String>,
    ) -> Result<Vec<u8>, HttpError> {
        let refresh_path = match &self.unauthorized {
            UnauthorizedPolicy::ForceLogout => {
                self.force_logout(rejected);
                return Err(HttpError::Unauthorized(message));
            }
            UnauthorizedPolicy::RefreshToken { path } => path,
        };

        let guard = self.refresh_lock.lock().await;
        let next = match self.tokens.token() {
            None => return Err(HttpError::Unauthorized(message)),
            Some(current) if current != rejected => {
                tracing::debug!(url, "Token replaced while waiting, retrying");
                current
            }
            Some(_) => match self.refresh(refresh_path, rejected).await {
                Ok(token) => token,
                Err(e) => {
                    tracing::debug!(error = %e, "Token refresh failed");
                    self.force_logout(rejected);
                    return Err(HttpError::Unauthorized(message));
                }
            },
        };
        drop(guard);

        match self.send(method, url, body, Some(&next)).await {
            Err(HttpError::Unauthorized(message)) => {
                self.force_logout(&next);
                Err(HttpError::Unauthorized(message))
            }
            other => other,
        }
    }

    async fn refresh(&self, path: &str, rejected: &str) -> Result<String, HttpError> {
        let refresh_token = self
            .tokens
            .refresh_token()
            .ok_or(HttpError::Unauthorized(None))?;

        let url = format!("{}{}", self.base_url, path);
        let json = serde_json::to_vec(&RefreshRequest { refresh_token })
            .map_err(|e| HttpError::InvalidResponse(e.to_string()))?;
        tracing::debug!(url = %url, "Refreshing token");
        let bytes = self
            .send(&Method::POST, &url, &RequestBody::Json(json), None)
            .await?;
        let credential: Credential = decode::<RefreshResponse>(&url, &bytes)?.into();

        match self.tokens.replace_token(rejected, &credential) {
            Ok(true) => Ok(credential.token),
            Ok(false) => Err(HttpError::Unauthorized(None)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to persist refreshed token");
                Err(HttpError::Unauthorized(None))
            }
        }
    }

    /// Drop the stored credential if it is still `rejected` and tell the
    /// listener. A credential replaced in the meantime is left alone.
    fn force_logout(&self, rejected: &str) {
        match self.tokens.clear_if_current(rejected) {
            Ok(true) => {
                tracing::warn!("Stored token rejected, forcing logout");
                let listener = self.listener.read().clone();
                if let Some(listener) = listener {
                    listener.reauthentication_required();
                }
            }
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to clear rejected token"),
        }
    }

    /// One exchange bounded by the configured timeout.
    async fn send(
        &self,
        method: &Method,
        url: &str,
        body: &RequestBody<'_>,
        token: Option<&str>,
    ) -> Result<Vec<u8>, HttpError> {
        let exchange = Box::pin(self.exchange(method, url, body, token));
        let deadline = futures_timer::Delay::new(self.timeout);

        match select(exchange, deadline).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => {
                tracing::debug!(url, timeout_ms = self.timeout.as_millis() as u64, "Request timed out");
                Err(HttpError::Timeout)
            }
        }
    }

    async fn exchange(
        &self,
        method: &Method,
        url: &str,
        body: &RequestBody<'_>,
        token: Option<&str>,
    ) -> Result<Vec<u8>, HttpError> {
        let mut req = self.client.request(method.clone(), url);

        if let Some(token) = token {
            req = req.bearer_auth(token);
        }

        req = match body {
            RequestBody::Empty => req,
            RequestBody::Json(json) => req
                .header(CONTENT_TYPE, "application/json")
                .body(json.clone()),
            RequestBody::Multipart(parts) => req.multipart(build_form(parts)?),
        };

        tracing::debug!(method = %method, url, authenticated = token.is_some(), "Dispatching request");

        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if status.is_success() {
            return Ok(bytes.to_vec());
        }

        Err(error_for_status(status.as_u16(), &bytes))
    }
}

impl std::fmt::Debug for CryptofolioHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptofolioHttp")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("unauthorized", &self.unauthorized)
            .finish_non_exhaustive()
    }
}

/// `multipart::Form` is single-use, so it is rebuilt for each attempt.
fn build_form(parts: &[FormPart]) -> Result<reqwest::multipart::Form, HttpError> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File {
                name,
                file_name,
                mime,
                bytes,
            } => {
                let file = reqwest::multipart::Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime)?;
                form.part(name.clone(), file)
            }
        };
    }
    Ok(form)
}

/// An empty body decodes as JSON `null`, so `()` and `Option<_>` accept it.
fn decode<T: DeserializeOwned>(url: &str, bytes: &[u8]) -> Result<T, HttpError> {
    let bytes = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        bytes
    };
    serde_json::from_slice(bytes).map_err(|e| {
        tracing::debug!(url, error = %e, "Response did not match the expected shape");
        HttpError::InvalidResponse(e.to_string())
    })
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Server-provided message from a `{"message": ...}` (or `{"error": ...}`) body.
fn extract_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    parsed
        .message
        .filter(|m| !m.trim().is_empty())
        .or(parsed.error.filter(|m| !m.trim().is_empty()))
}

fn error_for_status(status: u16, body: &[u8]) -> HttpError {
    let message = extract_message(body);
    let body = String::from_utf8_lossy(body).trim().to_string();

    match status {
        401 => HttpError::Unauthorized(message),
        404 => HttpError::NotFound { message, body },
        400..=499 => HttpError::BadRequest {
            status,
            message,
            body,
        },
        _ => HttpError::ServerError {
            status,
            message,
            body,
        },
    }
}
