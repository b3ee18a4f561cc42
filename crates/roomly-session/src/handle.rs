//! Shared session state and its gateway middleware.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;

use roomly_api::{ApiError, Middleware};
use roomly_core::{Role, User};
use roomly_store::{CredentialStore, StoredCredentials};

use crate::error::{Result, SessionError};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// A token is held but the user record is not resolved yet. No gate
    /// decision other than "keep waiting" may be trusted in this state.
    Loading,
    /// No token, no user.
    Anonymous,
    /// Token and resolved user are both present.
    Authenticated,
}

/// Observable summary of the session, published after every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Lifecycle position.
    pub status: SessionStatus,
    /// Whether a token is held (independent of `status`).
    pub authenticated: bool,
    /// Username, resolved or last-known.
    pub username: Option<String>,
    /// Role of the resolved user, if any.
    pub role: Option<Role>,
}

struct State {
    token: Option<String>,
    username: Option<String>,
    user: Option<User>,
    status: SessionStatus,
    /// Bumped on every clear. Await-crossing writers capture it before
    /// suspending and apply their result only if it is unchanged, so a
    /// logout is never silently undone by a completing login.
    epoch: u64,
}

impl State {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            authenticated: self.token.is_some(),
            username: self
                .user
                .as_ref()
                .map(|u| u.username.clone())
                .or_else(|| self.username.clone()),
            role: self.user.as_ref().map(|u| u.role),
        }
    }

    /// Status implied by what is actually held, used when an in-flight
    /// operation fails and Loading must settle back down.
    fn derived_status(&self) -> SessionStatus {
        match (&self.token, &self.user) {
            (Some(_), Some(_)) => SessionStatus::Authenticated,
            (Some(_), None) => SessionStatus::Loading,
            (None, _) => SessionStatus::Anonymous,
        }
    }
}

struct Inner {
    state: RwLock<State>,
    store: Box<dyn CredentialStore>,
    events: watch::Sender<SessionSnapshot>,
}

/// Handle to the shared session state.
///
/// Cheap to clone. Installed on the gateway as [`Middleware`], it injects
/// the bearer credential into every outbound request and, as the one
/// intentionally stateful transform in the chain, clears the session when
/// a response is classified [`ApiError::Unauthorized`].
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Inner>,
}

impl SessionHandle {
    /// Create a handle over the injected credential store.
    ///
    /// If a credential record is persisted, the session starts in
    /// [`SessionStatus::Loading`] and must be resolved via
    /// `SessionStore::restore` before gate decisions are trusted. An
    /// unreadable record is treated as absent.
    pub fn new(store: impl CredentialStore + 'static) -> Self {
        let persisted = match store.load() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Persisted credentials unreadable; starting anonymous");
                None
            }
        };

        let state = match persisted {
            Some(StoredCredentials {
                token, username, ..
            }) => State {
                token: Some(token),
                username: Some(username),
                user: None,
                status: SessionStatus::Loading,
                epoch: 0,
            },
            None => State {
                token: None,
                username: None,
                user: None,
                status: SessionStatus::Anonymous,
                epoch: 0,
            },
        };

        let (events, _) = watch::channel(state.snapshot());

        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(state),
                store: Box::new(store),
                events,
            }),
        }
    }

    /// Current lifecycle position.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.inner.state.read().status
    }

    /// `true` iff a token is held. Does not imply the user is resolved.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().token.is_some()
    }

    /// `true` iff the resolved user is an administrator. Never panics; an
    /// unresolved user is simply not an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.inner
            .state
            .read()
            .user
            .as_ref()
            .is_some_and(|u| u.role == Role::Admin)
    }

    /// The resolved user record, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.state.read().user.clone()
    }

    /// Current observable summary.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.read().snapshot()
    }

    /// Subscribe to session changes. Consumers re-evaluate the authorization
    /// gate on every received snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.events.subscribe()
    }

    /// Clear the session: token, user, and persisted record.
    ///
    /// Idempotent and always succeeds; a failure to remove the persisted
    /// record is logged, not surfaced, since the in-memory session is gone
    /// either way.
    pub fn clear(&self) {
        {
            let mut state = self.inner.state.write();
            state.token = None;
            state.username = None;
            state.user = None;
            state.status = SessionStatus::Anonymous;
            state.epoch += 1;
        }

        if let Err(e) = self.inner.store.clear() {
            tracing::error!(error = %e, "Failed to clear persisted credentials");
        }

        self.publish();
    }

    pub(crate) fn token(&self) -> Option<String> {
        self.inner.state.read().token.clone()
    }

    pub(crate) fn username(&self) -> Option<String> {
        let state = self.inner.state.read();
        state
            .user
            .as_ref()
            .map(|u| u.username.clone())
            .or_else(|| state.username.clone())
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.inner.state.read().epoch
    }

    /// Move into Loading for the duration of an in-flight transition.
    pub(crate) fn begin_loading(&self) {
        self.inner.state.write().status = SessionStatus::Loading;
        self.publish();
    }

    /// Persist and adopt a freshly issued token. Fails with `Superseded`
    /// when a clear happened since `epoch` was captured.
    pub(crate) fn adopt_credentials(&self, epoch: u64, token: &str, username: &str) -> Result<()> {
        {
            let state = self.inner.state.read();
            if state.epoch != epoch {
                return Err(SessionError::Superseded);
            }
        }

        // Persist first: if storage fails the in-memory session is not left
        // claiming a token that will vanish on restart.
        self.inner
            .store
            .save(&StoredCredentials::new(token, username))?;

        {
            let mut state = self.inner.state.write();
            if state.epoch != epoch {
                // A clear won the race after the save; honor it.
                if let Err(e) = self.inner.store.clear() {
                    tracing::error!(error = %e, "Failed to clear persisted credentials");
                }
                return Err(SessionError::Superseded);
            }
            state.token = Some(token.to_string());
            state.username = Some(username.to_string());
        }

        self.publish();
        Ok(())
    }

    /// Adopt the resolved user record and become Authenticated.
    pub(crate) fn adopt_user(&self, epoch: u64, user: User) -> Result<()> {
        {
            let mut state = self.inner.state.write();
            if state.epoch != epoch {
                return Err(SessionError::Superseded);
            }
            state.username = Some(user.username.clone());
            state.user = Some(user);
            state.status = SessionStatus::Authenticated;
        }

        self.publish();
        Ok(())
    }

    /// Settle the status after a failed in-flight transition: Loading drops
    /// back to whatever the held state actually supports.
    pub(crate) fn settle(&self, epoch: u64) {
        {
            let mut state = self.inner.state.write();
            if state.epoch != epoch {
                return;
            }
            state.status = state.derived_status();
        }

        self.publish();
    }

    fn publish(&self) {
        let snapshot = self.inner.state.read().snapshot();
        self.inner.events.send_replace(snapshot);
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("SessionHandle")
            .field("status", &state.status)
            .field("authenticated", &state.token.is_some())
            .field("username", &state.username)
            .finish_non_exhaustive()
    }
}

impl Middleware for SessionHandle {
    fn on_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn on_error(&self, error: &ApiError) {
        if error.is_unauthorized() && self.is_authenticated() {
            tracing::warn!("Backend rejected the session credential; clearing session");
            self.clear();
        }
    }
}
