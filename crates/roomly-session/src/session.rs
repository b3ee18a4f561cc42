//! The session store: single source of truth for the current actor.

use serde::{Deserialize, Serialize};

use roomly_api::{paths, ApiClient, ApiError};
use roomly_core::{ProfileUpdate, Registration, Role, User};

use crate::error::{Result, SessionError};
use crate::gate::{self, GateDecision};
use crate::handle::{SessionHandle, SessionSnapshot, SessionStatus};

/// Credential exchange payload.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Response from the login and registration endpoints.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Owns the session lifecycle: token acquisition, persistence, propagation,
/// and invalidation.
///
/// Constructed once at process start and passed by reference (or cheap
/// clone) to consumers; it lives for the process lifetime and is reset only
/// through [`logout`](Self::logout) or a request-layer invalidity signal,
/// never through implicit module state.
#[derive(Clone)]
pub struct SessionStore {
    api: ApiClient,
    handle: SessionHandle,
}

impl SessionStore {
    /// Create the store over a gateway client and the shared session handle.
    ///
    /// The handle must be installed on the gateway as middleware; the store
    /// does not verify the wiring.
    #[must_use]
    pub fn new(api: ApiClient, handle: SessionHandle) -> Self {
        Self { api, handle }
    }

    /// The shared session handle (for middleware installation and
    /// subscriptions).
    #[must_use]
    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    /// `true` iff a token is held. O(1), synchronous, and does not imply the
    /// user record is resolved.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.handle.is_authenticated()
    }

    /// `true` iff the resolved user is an administrator; `false`, never a
    /// panic, while the user is unresolved.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.handle.is_admin()
    }

    /// Current lifecycle position.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.handle.status()
    }

    /// The resolved user record, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.handle.user()
    }

    /// Current observable summary.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.handle.snapshot()
    }

    /// Evaluate the authorization gate against the current session state.
    #[must_use]
    pub fn authorize(&self, require_admin: bool) -> GateDecision {
        gate::evaluate(
            self.handle.status(),
            self.handle.is_authenticated(),
            self.handle.is_admin(),
            require_admin,
        )
    }

    /// Resolve a persisted token into a full session at process start.
    ///
    /// Must complete before any gate decision is trusted; until then the
    /// session reports [`SessionStatus::Loading`] and the gate answers
    /// `RenderLoading`. A token that no longer resolves is cleared and the
    /// session settles Anonymous.
    pub async fn restore(&self) -> SessionStatus {
        if self.handle.status() != SessionStatus::Loading {
            return self.handle.status();
        }

        let epoch = self.handle.epoch();
        match self.fetch_profile_inner(epoch).await {
            Ok(user) => {
                tracing::info!(username = %user.username, "Session restored");
            }
            Err(e) => {
                tracing::info!(error = %e, "Persisted session did not resolve; starting anonymous");
            }
        }

        self.handle.status()
    }

    /// Exchange credentials for a token, persist it, and resolve the
    /// profile. The session becomes Authenticated only after the profile
    /// fetch succeeds; a profile failure rolls everything back to Anonymous.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Authentication`]: credentials rejected; session
    ///   left Anonymous.
    /// - [`SessionError::ProfileFetch`]: token issued but the profile did
    ///   not resolve; token cleared, session Anonymous.
    /// - [`SessionError::Superseded`]: a concurrent logout won; its clear
    ///   stands.
    /// - [`SessionError::Api`]: transient network/server failure; session
    ///   state unchanged.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let epoch = self.handle.epoch();
        self.handle.begin_loading();

        let request = LoginRequest { username, password };
        let response: std::result::Result<TokenResponse, ApiError> =
            self.api.post(paths::LOGIN, &request).await;

        let token = match response {
            Ok(body) => body.token,
            Err(e) => {
                self.handle.settle(epoch);
                return Err(map_login_error(e));
            }
        };

        self.handle.adopt_credentials(epoch, &token, username)?;
        tracing::info!(username, "Credentials accepted; resolving profile");

        self.fetch_profile_inner(epoch).await
    }

    /// Create an account, persist the returned token, and seed the user
    /// record optimistically from the submitted fields without a profile
    /// round-trip.
    ///
    /// The seeded record has an empty server id and the default `USER` role
    /// until the next [`fetch_profile`](Self::fetch_profile) replaces it
    /// with the canonical one. That is a known eventual-consistency window,
    /// not something this method hides.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Validation`]: payload rejected; session Anonymous.
    /// - [`SessionError::Conflict`]: username or email taken; session
    ///   Anonymous.
    /// - [`SessionError::Api`]: transient failure; session state unchanged.
    pub async fn register(&self, registration: Registration) -> Result<User> {
        let epoch = self.handle.epoch();
        self.handle.begin_loading();

        let response: std::result::Result<TokenResponse, ApiError> =
            self.api.post(paths::REGISTER, &registration).await;

        let token = match response {
            Ok(body) => body.token,
            Err(e) => {
                self.handle.settle(epoch);
                return Err(map_register_error(e));
            }
        };

        self.handle
            .adopt_credentials(epoch, &token, &registration.username)?;

        let user = User {
            id: String::new(),
            username: registration.username,
            email: registration.email,
            role: Role::User,
            phone_number: registration.phone_number,
            preferred_location: registration.preferred_location,
            budget: registration.budget,
            preferred_gender: registration.preferred_gender,
        };

        self.handle.adopt_user(epoch, user.clone())?;
        tracing::info!(username = %user.username, "Account registered");

        Ok(user)
    }

    /// Clear the session: token, user record, and persisted credentials.
    ///
    /// Synchronous, idempotent, always succeeds. Consumers watching the
    /// snapshot channel see Anonymous immediately.
    pub fn logout(&self) {
        tracing::info!("Logging out");
        self.handle.clear();
    }

    /// Fetch the authenticated user's record and store it.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotAuthenticated`]: no token is held.
    /// - [`SessionError::ProfileFetch`]: the token did not resolve; the
    ///   session has been cleared, exactly as if `logout` had been called.
    pub async fn fetch_profile(&self) -> Result<User> {
        let epoch = self.handle.epoch();
        self.fetch_profile_inner(epoch).await
    }

    /// Send a sparse profile update and adopt the server's canonical record.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotAuthenticated`]: session is not Authenticated.
    /// - [`SessionError::Update`]: backend rejected the update; session
    ///   state unchanged.
    /// - [`SessionError::Api`] with [`ApiError::Unauthorized`]: the session
    ///   was invalidated mid-operation (and has already been cleared).
    pub async fn update_profile(&self, changes: &ProfileUpdate) -> Result<User> {
        if self.handle.status() != SessionStatus::Authenticated {
            return Err(SessionError::NotAuthenticated);
        }
        let username = self
            .handle
            .username()
            .ok_or(SessionError::NotAuthenticated)?;

        let epoch = self.handle.epoch();
        match self.api.put::<_, User>(&paths::user(&username), changes).await {
            Ok(user) => {
                self.handle.adopt_user(epoch, user.clone())?;
                tracing::info!(username = %user.username, "Profile updated");
                Ok(user)
            }
            Err(e @ ApiError::Unauthorized) => Err(SessionError::Api(e)),
            Err(e) => Err(SessionError::Update(e.to_string())),
        }
    }

    async fn fetch_profile_inner(&self, epoch: u64) -> Result<User> {
        if !self.handle.is_authenticated() {
            return Err(SessionError::NotAuthenticated);
        }
        let username = self
            .handle
            .username()
            .ok_or(SessionError::NotAuthenticated)?;

        match self.api.get::<User>(&paths::user(&username)).await {
            Ok(user) => {
                self.handle.adopt_user(epoch, user.clone())?;
                Ok(user)
            }
            Err(e) => {
                // The held token no longer resolves to a user; per the error
                // policy this is equivalent to a logout.
                tracing::warn!(error = %e, "Profile fetch failed; clearing session");
                self.handle.clear();
                Err(SessionError::ProfileFetch(e.to_string()))
            }
        }
    }
}

fn map_login_error(error: ApiError) -> SessionError {
    match error {
        // 401 here means the submitted credentials were bad, not that a held
        // session went stale; other 4xx echo malformed credential payloads.
        ApiError::Unauthorized | ApiError::Client { .. } => SessionError::Authentication,
        other => other.into(),
    }
}

fn map_register_error(error: ApiError) -> SessionError {
    match error {
        ApiError::Client {
            status: 409,
            message,
        } => SessionError::Conflict(message),
        ApiError::Client { message, .. } => SessionError::Validation(message),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::time::Duration;

    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use roomly_api::{ApiConfig, Middleware};
    use roomly_store::{CredentialStore, MemoryStore, StoredCredentials};

    fn user_json(username: &str, role: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "u-1",
            "username": username,
            "email": format!("{username}@example.com"),
            "role": role,
        })
    }

    fn stack(server: &MockServer) -> (SessionStore, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let handle = SessionHandle::new(store.clone());
        let middleware: Vec<Arc<dyn Middleware>> = vec![Arc::new(handle.clone())];
        let api = ApiClient::new(&ApiConfig::new(server.uri()), middleware);
        (SessionStore::new(api, handle), store)
    }

    fn seeded_stack(
        server: &MockServer,
        token: &str,
        username: &str,
    ) -> (SessionStore, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store
            .save(&StoredCredentials::new(token, username))
            .unwrap();
        let handle = SessionHandle::new(store.clone());
        let middleware: Vec<Arc<dyn Middleware>> = vec![Arc::new(handle.clone())];
        let api = ApiClient::new(&ApiConfig::new(server.uri()), middleware);
        (SessionStore::new(api, handle), store)
    }

    async fn mount_login(server: &MockServer, username: &str, password: &str, token: &str) {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(serde_json::json!({
                "username": username,
                "password": password,
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": token })),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn login_persists_token_and_resolves_profile_once() {
        let server = MockServer::start().await;
        mount_login(&server, "alice", "correct", "tok123").await;
        Mock::given(method("GET"))
            .and(path("/api/users/alice"))
            .and(header("authorization", "Bearer tok123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json("alice", "USER")))
            .expect(1)
            .mount(&server)
            .await;

        let (session, store) = stack(&server);
        let user = session.login("alice", "correct").await.unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(session.status(), SessionStatus::Authenticated);
        assert!(session.is_authenticated());
        assert!(!session.is_admin());
        assert_eq!(store.load().unwrap().unwrap().token, "tok123");

        // Regular view renders, admin view falls back.
        assert_eq!(session.authorize(false), GateDecision::RenderProtected);
        assert_eq!(session.authorize(true), GateDecision::RedirectToFallback);
    }

    #[tokio::test]
    async fn login_with_bad_credentials_leaves_session_anonymous() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (session, store) = stack(&server);
        let result = session.login("alice", "wrong").await;

        assert!(matches!(result, Err(SessionError::Authentication)));
        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert!(store.load().unwrap().is_none());
        assert_eq!(session.authorize(false), GateDecision::RedirectToLogin);
    }

    #[tokio::test]
    async fn login_rolls_back_when_profile_does_not_resolve() {
        let server = MockServer::start().await;
        mount_login(&server, "alice", "correct", "tok123").await;
        Mock::given(method("GET"))
            .and(path("/api/users/alice"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (session, store) = stack(&server);
        let result = session.login("alice", "correct").await;

        assert!(matches!(result, Err(SessionError::ProfileFetch(_))));
        assert!(!session.is_authenticated());
        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn login_network_failure_leaves_state_untouched() {
        let (session, store) = {
            let store = Arc::new(MemoryStore::new());
            let handle = SessionHandle::new(store.clone());
            let middleware: Vec<Arc<dyn Middleware>> = vec![Arc::new(handle.clone())];
            // Port 9 is never serving HTTP.
            let api = ApiClient::new(&ApiConfig::new("http://127.0.0.1:9"), middleware);
            (SessionStore::new(api, handle), store)
        };

        let result = session.login("alice", "correct").await;

        assert!(matches!(
            result,
            Err(SessionError::Api(ApiError::Network(_)))
        ));
        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn restore_resolves_a_persisted_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/alice"))
            .and(header("authorization", "Bearer tok123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json("alice", "USER")))
            .expect(1)
            .mount(&server)
            .await;

        let (session, _store) = seeded_stack(&server, "tok123", "alice");
        assert_eq!(session.status(), SessionStatus::Loading);
        assert_eq!(session.authorize(false), GateDecision::RenderLoading);

        let status = session.restore().await;

        assert_eq!(status, SessionStatus::Authenticated);
        assert_eq!(session.current_user().unwrap().username, "alice");
    }

    #[tokio::test]
    async fn restore_clears_a_stale_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/alice"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (session, store) = seeded_stack(&server, "stale", "alice");
        let status = session.restore().await;

        assert_eq!(status, SessionStatus::Anonymous);
        assert!(!session.is_authenticated());
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn restore_without_a_token_is_a_no_op() {
        let server = MockServer::start().await;
        let (session, _store) = stack(&server);

        assert_eq!(session.restore().await, SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn register_seeds_the_user_optimistically() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "token": "tok456" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (session, store) = stack(&server);
        let registration = Registration {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "secret".to_string(),
            phone_number: None,
            preferred_location: Some("Midtown".to_string()),
            budget: Some(600.0),
            preferred_gender: None,
        };

        let user = session.register(registration).await.unwrap();

        // Seeded record: server id unknown, role defaulted, no profile fetch.
        assert_eq!(user.id, "");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.preferred_location.as_deref(), Some("Midtown"));
        assert_eq!(session.status(), SessionStatus::Authenticated);
        assert_eq!(store.load().unwrap().unwrap().token, "tok456");
    }

    #[tokio::test]
    async fn register_conflict_and_validation_are_distinguished() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "message": "username already taken"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (session, _store) = stack(&server);
        let registration = Registration {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret".to_string(),
            phone_number: None,
            preferred_location: None,
            budget: None,
            preferred_gender: None,
        };

        let result = session.register(registration.clone()).await;
        assert!(matches!(result, Err(SessionError::Conflict(_))));
        assert_eq!(session.status(), SessionStatus::Anonymous);

        server.reset().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "message": "email is malformed"
            })))
            .mount(&server)
            .await;

        let result = session.register(registration).await;
        assert!(matches!(result, Err(SessionError::Validation(_))));
        assert_eq!(session.status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn unauthorized_mid_session_forces_logout() {
        let server = MockServer::start().await;
        mount_login(&server, "alice", "correct", "tok123").await;
        Mock::given(method("GET"))
            .and(path("/api/users/alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json("alice", "USER")))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/users/alice"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (session, store) = stack(&server);
        session.login("alice", "correct").await.unwrap();
        assert!(session.is_authenticated());

        let result = session.update_profile(&ProfileUpdate::default()).await;

        assert!(matches!(
            result,
            Err(SessionError::Api(ApiError::Unauthorized))
        ));
        assert!(!session.is_authenticated());
        assert!(store.load().unwrap().is_none());
        assert_eq!(session.authorize(false), GateDecision::RedirectToLogin);
    }

    #[tokio::test]
    async fn update_profile_adopts_the_canonical_record() {
        let server = MockServer::start().await;
        mount_login(&server, "alice", "correct", "tok123").await;
        Mock::given(method("GET"))
            .and(path("/api/users/alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json("alice", "USER")))
            .mount(&server)
            .await;

        let mut canonical = user_json("alice", "USER");
        canonical["email"] = serde_json::json!("alice@new.example");
        Mock::given(method("PUT"))
            .and(path("/api/users/alice"))
            .and(body_json(serde_json::json!({ "email": "alice@new.example" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(canonical))
            .mount(&server)
            .await;

        let (session, _store) = stack(&server);
        session.login("alice", "correct").await.unwrap();

        let changes = ProfileUpdate {
            email: Some("alice@new.example".to_string()),
            ..ProfileUpdate::default()
        };
        let user = session.update_profile(&changes).await.unwrap();

        assert_eq!(user.email, "alice@new.example");
        assert_eq!(
            session.current_user().unwrap().email,
            "alice@new.example"
        );
    }

    #[tokio::test]
    async fn update_profile_failure_leaves_the_record_alone() {
        let server = MockServer::start().await;
        mount_login(&server, "alice", "correct", "tok123").await;
        Mock::given(method("GET"))
            .and(path("/api/users/alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json("alice", "USER")))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/users/alice"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (session, _store) = stack(&server);
        session.login("alice", "correct").await.unwrap();
        let before = session.current_user().unwrap();

        let result = session.update_profile(&ProfileUpdate::default()).await;

        assert!(matches!(result, Err(SessionError::Update(_))));
        assert_eq!(session.current_user().unwrap(), before);
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn update_profile_requires_an_authenticated_session() {
        let server = MockServer::start().await;
        let (session, _store) = stack(&server);

        let result = session.update_profile(&ProfileUpdate::default()).await;
        assert!(matches!(result, Err(SessionError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn logout_is_idempotent_and_observable() {
        let server = MockServer::start().await;
        mount_login(&server, "alice", "correct", "tok123").await;
        Mock::given(method("GET"))
            .and(path("/api/users/alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json("alice", "USER")))
            .mount(&server)
            .await;

        let (session, store) = stack(&server);
        session.login("alice", "correct").await.unwrap();
        let rx = session.handle().subscribe();

        session.logout();
        session.logout();

        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.status, SessionStatus::Anonymous);
        assert!(store.load().unwrap().is_none());
        assert_eq!(session.authorize(false), GateDecision::RedirectToLogin);
    }

    #[tokio::test]
    async fn concurrent_logout_wins_over_a_completing_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "token": "tok123" }))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let (session, store) = stack(&server);

        let (login_result, ()) = tokio::join!(session.login("alice", "correct"), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            session.logout();
        });

        assert!(matches!(login_result, Err(SessionError::Superseded)));
        assert!(!session.is_authenticated());
        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn admin_role_opens_admin_views() {
        let server = MockServer::start().await;
        mount_login(&server, "root", "correct", "tok-admin").await;
        Mock::given(method("GET"))
            .and(path("/api/users/root"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json("root", "ADMIN")))
            .mount(&server)
            .await;

        let (session, _store) = stack(&server);
        session.login("root", "correct").await.unwrap();

        assert!(session.is_admin());
        assert_eq!(session.authorize(true), GateDecision::RenderProtected);
    }
}
