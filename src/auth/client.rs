//! Session manager — login, register, logout, token validation.

use crate::auth::session::{Session, SessionPhase};
use crate::auth::{
    Credential, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User,
    ValidateResponse,
};
use crate::error::{generic_message, AuthError, ErrorKind, HttpError, SdkError};
use crate::http::{AuthPolicy, CryptofolioHttp, ReauthListener};
use crate::shared::Outcome;
use crate::storage::TokenStore;

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";

/// Owns the authentication state.
///
/// Every operation captures a generation when it starts. When it resolves,
/// the result is committed only if no newer operation (or logout) has started
/// since; otherwise it returns [`Outcome::Stale`] and persists nothing.
#[derive(Clone)]
pub struct SessionManager {
    http: CryptofolioHttp,
    tokens: TokenStore,
    inner: Arc<SessionInner>,
}

struct SessionInner {
    state: RwLock<Session>,
    generation: AtomicU64,
}

impl SessionInner {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

impl ReauthListener for SessionInner {
    fn reauthentication_required(&self) {
        tracing::warn!("Session expired");
        self.state.write().expire();
    }
}

impl SessionManager {
    /// Create the manager and register it as `http`'s reauthentication listener.
    pub fn new(http: CryptofolioHttp) -> Self {
        let inner = Arc::new(SessionInner {
            state: RwLock::new(Session::default()),
            generation: AtomicU64::new(0),
        });
        http.set_reauth_listener(inner.clone());
        Self {
            tokens: http.token_store().clone(),
            http,
            inner,
        }
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.inner.state.read().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.state.read().phase()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().is_authenticated
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.read().user.clone()
    }

    /// The persisted profile, for display before the token is validated.
    /// Does not mark the session authenticated.
    pub fn restore_cached_user(&self) -> Option<User> {
        self.tokens.load().map(|stored| stored.user)
    }

    /// Clear the last error and registration message.
    pub fn dismiss_messages(&self) {
        let mut state = self.inner.state.write();
        state.last_error = None;
        state.message = None;
    }

    // ── Operations ───────────────────────────────────────────────────────

    /// Exchange credentials for a token. On success the token and profile are
    /// persisted and the session becomes authenticated.
    pub async fn login(&self, username: &str, password: &str) -> Result<Outcome<User>, SdkError> {
        let generation = self.begin();
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let url = format!("{}/api/auth/login", self.http.base_url());
        let result: Result<LoginResponse, HttpError> =
            self.http.post(&url, &request, AuthPolicy::Public).await;

        let mut state = self.inner.state.write();
        if !self.inner.is_current(generation) {
            tracing::debug!(generation, "Discarding stale login result");
            return Ok(Outcome::Stale);
        }

        match result {
            Ok(resp) => {
                let credential = Credential {
                    token: resp.token,
                    refresh_token: resp.refresh_token,
                };
                if let Err(e) = self.tokens.save(&credential, &resp.user) {
                    let err = SdkError::from(e);
                    state.fail(err.user_message());
                    return Err(err);
                }
                tracing::info!(username = %resp.user.username, "Logged in");
                state.authenticate(resp.user.clone());
                Ok(Outcome::Applied(resp.user))
            }
            Err(e) => {
                let message = failure_message(&e, LOGIN_FAILED);
                tracing::info!(error = %e, "Login failed");
                state.fail(message.clone());
                Err(AuthError::LoginFailed(message).into())
            }
        }
    }

    /// Create an account. Never authenticates; the confirmation message is
    /// recorded on the session.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Outcome<String>, SdkError> {
        let generation = self.begin();
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let url = format!("{}/api/auth/register", self.http.base_url());
        let result: Result<RegisterResponse, HttpError> =
            self.http.post(&url, &request, AuthPolicy::Public).await;

        let mut state = self.inner.state.write();
        if !self.inner.is_current(generation) {
            tracing::debug!(generation, "Discarding stale registration result");
            return Ok(Outcome::Stale);
        }

        match result {
            Ok(resp) => {
                tracing::info!(username, "Registered");
                state.lifecycle_status = crate::auth::LifecycleStatus::Ready;
                state.message = Some(resp.message.clone());
                Ok(Outcome::Applied(resp.message))
            }
            Err(e) => {
                let message = failure_message(&e, REGISTRATION_FAILED);
                state.lifecycle_status = crate::auth::LifecycleStatus::Failed;
                state.last_error = Some(message.clone());
                Err(AuthError::RegistrationFailed(message).into())
            }
        }
    }

    /// Confirm the stored token with the backend.
    ///
    /// Without a stored token this is a no-op that performs no network call
    /// and returns `Applied(None)`.
    pub async fn validate_existing_token(&self) -> Result<Outcome<Option<User>>, SdkError> {
        if self.tokens.load().is_none() {
            return Ok(Outcome::Applied(None));
        }

        let generation = self.begin();
        let url = format!("{}/api/auth/validate", self.http.base_url());
        let result: Result<ValidateResponse, HttpError> =
            self.http.get(&url, AuthPolicy::Bearer).await;

        let mut state = self.inner.state.write();
        if !self.inner.is_current(generation) {
            tracing::debug!(generation, "Discarding stale validation result");
            return Ok(Outcome::Stale);
        }

        match result {
            Ok(resp) => {
                // Keep the cached profile in sync; the token may have been refreshed.
                if let Some(stored) = self.tokens.load() {
                    if let Err(e) = self.tokens.save(&stored.credential, &resp.user) {
                        tracing::warn!(error = %e, "Failed to update cached user profile");
                    }
                }
                state.authenticate(resp.user.clone());
                Ok(Outcome::Applied(Some(resp.user)))
            }
            Err(e) => {
                if let Err(storage) = self.tokens.clear() {
                    tracing::warn!(error = %storage, "Failed to clear rejected token");
                }
                let err = SdkError::from(e);
                state.fail(err.user_message());
                Err(err)
            }
        }
    }

    /// Clear stored credentials and reset the session. Local only.
    ///
    /// Supersedes every in-flight operation. Storage failures are logged and
    /// the session is reset regardless.
    pub fn logout(&self) {
        let mut state = self.inner.state.write();
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.tokens.clear() {
            tracing::warn!(error = %e, "Failed to clear stored credentials on logout");
        }
        state.reset();
        tracing::info!("Logged out");
    }

    fn begin(&self) -> u64 {
        let mut state = self.inner.state.write();
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        state.begin();
        generation
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session", &*self.inner.state.read())
            .finish_non_exhaustive()
    }
}

/// The server's message verbatim; `fallback` when the server answered without
/// one; the transport description when it never answered.
fn failure_message(e: &HttpError, fallback: &str) -> String {
    if let Some(message) = e.server_message() {
        return message.to_string();
    }
    match e.kind() {
        kind @ (ErrorKind::NetworkUnreachable | ErrorKind::Timeout) => {
            generic_message(kind).to_string()
        }
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::SESSION_EXPIRED_MESSAGE;
    use crate::auth::LifecycleStatus;
    use crate::error::StorageError;
    use crate::http::UnauthorizedPolicy;
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user_json(name: &str) -> serde_json::Value {
        json!({ "id": 1, "username": name, "email": format!("{}@example.com", name) })
    }

    fn manager(base_url: &str, tokens: TokenStore) -> SessionManager {
        let http = CryptofolioHttp::new(
            base_url,
            tokens,
            Duration::from_secs(5),
            UnauthorizedPolicy::ForceLogout,
        )
        .unwrap();
        SessionManager::new(http)
    }

    fn stored(tokens: &TokenStore, token: &str) {
        let user = User {
            id: "1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            roles: vec![],
        };
        tokens.save(&Credential::new(token), &user).unwrap();
    }

    #[tokio::test]
    async fn test_login_persists_and_authenticates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({ "username": "alice", "password": "pw" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "user": user_json("alice"), "token": "t1" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let tokens = TokenStore::in_memory();
        let session = manager(&server.uri(), tokens.clone());
        let user = session.login("alice", "pw").await.unwrap().applied().unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(session.phase(), SessionPhase::Authenticated);
        assert_eq!(tokens.token().as_deref(), Some("t1"));
        assert_eq!(tokens.load().unwrap().user, user);
    }

    #[tokio::test]
    async fn test_login_failure_shows_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
            )
            .mount(&server)
            .await;

        let tokens = TokenStore::in_memory();
        let session = manager(&server.uri(), tokens.clone());
        let err = session.login("alice", "bad").await.unwrap_err();

        assert_eq!(err.user_message(), "Invalid credentials");
        let state = session.session();
        assert_eq!(state.phase(), SessionPhase::Anonymous);
        assert_eq!(state.lifecycle_status, LifecycleStatus::Failed);
        assert_eq!(state.last_error.as_deref(), Some("Invalid credentials"));
        assert!(tokens.load().is_none());
    }

    #[tokio::test]
    async fn test_login_failure_without_message_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let session = manager(&server.uri(), TokenStore::in_memory());
        let _ = session.login("alice", "pw").await;
        assert_eq!(session.session().last_error.as_deref(), Some(LOGIN_FAILED));
    }

    #[tokio::test]
    async fn test_login_failure_with_html_page_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(502)
                    .set_body_raw("<html><body><h1>502 Bad Gateway</h1></body></html>", "text/html"),
            )
            .mount(&server)
            .await;

        let session = manager(&server.uri(), TokenStore::in_memory());
        let err = session.login("alice", "pw").await.unwrap_err();
        assert_eq!(session.session().last_error.as_deref(), Some(LOGIN_FAILED));
        assert!(!err.user_message().contains("<html>"));
    }

    #[tokio::test]
    async fn test_login_response_missing_token_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": user_json("alice") })))
            .mount(&server)
            .await;

        let tokens = TokenStore::in_memory();
        let session = manager(&server.uri(), tokens.clone());
        assert!(session.login("alice", "pw").await.is_err());
        assert!(!session.is_authenticated());
        assert!(tokens.load().is_none());
    }

    #[tokio::test]
    async fn test_slow_login_superseded_by_fast_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({ "username": "slow", "password": "pw" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "user": user_json("slow"), "token": "t-slow" }))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({ "username": "fast", "password": "pw" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "user": user_json("fast"), "token": "t-fast" })),
            )
            .mount(&server)
            .await;

        let tokens = TokenStore::in_memory();
        let session = manager(&server.uri(), tokens.clone());

        let slow = {
            let session = session.clone();
            tokio::spawn(async move { session.login("slow", "pw").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        let fast = session.login("fast", "pw").await.unwrap();
        let slow = slow.await.unwrap().unwrap();

        assert!(fast.is_applied());
        assert!(slow.is_stale());
        assert_eq!(session.user().unwrap().username, "fast");
        assert_eq!(tokens.token().as_deref(), Some("t-fast"));
    }

    #[tokio::test]
    async fn test_logout_supersedes_inflight_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "user": user_json("alice"), "token": "t1" }))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let tokens = TokenStore::in_memory();
        let session = manager(&server.uri(), tokens.clone());

        let login = {
            let session = session.clone();
            tokio::spawn(async move { session.login("alice", "pw").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        session.logout();

        assert!(login.await.unwrap().unwrap().is_stale());
        assert!(!session.is_authenticated());
        assert!(tokens.load().is_none());
    }

    #[tokio::test]
    async fn test_validate_without_token_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/validate"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let session = manager(&server.uri(), TokenStore::in_memory());
        let before = session.session();
        assert_eq!(session.validate_existing_token().await.unwrap(), Outcome::Applied(None));
        assert_eq!(session.validate_existing_token().await.unwrap(), Outcome::Applied(None));
        assert_eq!(session.session(), before);
    }

    #[tokio::test]
    async fn test_validate_success_authenticates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/validate"))
            .and(header("authorization", "Bearer t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": user_json("alice") })))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = TokenStore::in_memory();
        stored(&tokens, "t1");
        let session = manager(&server.uri(), tokens.clone());

        let outcome = session.validate_existing_token().await.unwrap();
        assert_eq!(outcome.applied().flatten().unwrap().username, "alice");
        assert_eq!(session.phase(), SessionPhase::Authenticated);
    }

    #[tokio::test]
    async fn test_validate_rejected_clears_store() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/validate"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let tokens = TokenStore::in_memory();
        stored(&tokens, "t1");
        let session = manager(&server.uri(), tokens.clone());

        assert!(session.validate_existing_token().await.is_err());
        let state = session.session();
        assert_eq!(state.phase(), SessionPhase::Anonymous);
        assert_eq!(state.last_error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
        assert!(tokens.load().is_none());
    }

    #[tokio::test]
    async fn test_forced_logout_resets_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/portfolio/names"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let tokens = TokenStore::in_memory();
        stored(&tokens, "t1");
        let http = CryptofolioHttp::new(
            &server.uri(),
            tokens.clone(),
            Duration::from_secs(5),
            UnauthorizedPolicy::ForceLogout,
        )
        .unwrap();
        let session = SessionManager::new(http.clone());
        session.inner.state.write().authenticate(tokens.load().unwrap().user);

        let url = format!("{}/portfolio/names", http.base_url());
        assert!(http.get::<Vec<String>>(&url, AuthPolicy::Bearer).await.is_err());

        let state = session.session();
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
        assert_eq!(state.last_error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
    }

    #[tokio::test]
    async fn test_register_records_message_without_authenticating() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "message": "User registered successfully" })),
            )
            .mount(&server)
            .await;

        let tokens = TokenStore::in_memory();
        let session = manager(&server.uri(), tokens.clone());
        let outcome = session.register("bob", "bob@example.com", "pw").await.unwrap();

        assert_eq!(outcome, Outcome::Applied("User registered successfully".to_string()));
        let state = session.session();
        assert!(!state.is_authenticated);
        assert_eq!(state.message.as_deref(), Some("User registered successfully"));
        assert!(tokens.load().is_none());
    }

    #[tokio::test]
    async fn test_register_failure_records_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "message": "Username is already taken" })),
            )
            .mount(&server)
            .await;

        let session = manager(&server.uri(), TokenStore::in_memory());
        let err = session.register("bob", "bob@example.com", "pw").await.unwrap_err();
        assert_eq!(err.user_message(), "Username is already taken");
        assert_eq!(
            session.session().last_error.as_deref(),
            Some("Username is already taken")
        );
    }

    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".to_string()))
        }
    }

    #[tokio::test]
    async fn test_logout_always_succeeds_offline() {
        // Nothing listens on this port.
        let session = manager("http://127.0.0.1:9", TokenStore::new(BrokenStorage));
        session.inner.state.write().authenticate(User {
            id: "1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            roles: vec![],
        });

        session.logout();
        assert_eq!(session.session(), Session::default());

        let tokens = TokenStore::new(MemoryStorage::new());
        stored(&tokens, "t1");
        let session = manager("http://127.0.0.1:9", tokens.clone());
        session.logout();
        assert!(tokens.load().is_none());
        assert_eq!(session.phase(), SessionPhase::Anonymous);
    }

    #[tokio::test]
    async fn test_restore_cached_user_does_not_authenticate() {
        let tokens = TokenStore::in_memory();
        stored(&tokens, "t1");
        let session = manager("http://127.0.0.1:9", tokens);

        assert_eq!(session.restore_cached_user().unwrap().username, "alice");
        assert!(!session.is_authenticated());
    }
}
