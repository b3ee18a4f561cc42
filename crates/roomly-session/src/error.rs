//! Session error types.

use roomly_api::ApiError;
use roomly_store::StoreError;
use thiserror::Error;

/// A result type using `SessionError`.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors that can occur during session operations.
///
/// Only [`SessionError::ProfileFetch`] and an underlying
/// [`ApiError::Unauthorized`] come with a state transition (forced logout);
/// every other failure leaves session state exactly as it was.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backend rejected the submitted credentials. Recoverable: the user
    /// retries.
    #[error("invalid credentials")]
    Authentication,

    /// The registration payload was rejected. Recoverable: the user corrects
    /// the input.
    #[error("registration rejected: {0}")]
    Validation(String),

    /// The desired username or email is already taken.
    #[error("account conflict: {0}")]
    Conflict(String),

    /// The authenticated user's record could not be fetched; the session has
    /// been cleared. Callers treat this exactly like a logout.
    #[error("profile fetch failed: {0}")]
    ProfileFetch(String),

    /// A profile update was rejected; session state is unchanged.
    #[error("profile update failed: {0}")]
    Update(String),

    /// The operation requires an authenticated session.
    #[error("not authenticated")]
    NotAuthenticated,

    /// A concurrent logout (explicit or forced) won the race against this
    /// operation; its result was discarded rather than resurrecting the
    /// cleared session.
    #[error("superseded by a concurrent session change")]
    Superseded,

    /// A classified gateway failure passed through unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The persisted credential record could not be written.
    #[error("credential storage failed: {0}")]
    Store(#[from] StoreError),
}
