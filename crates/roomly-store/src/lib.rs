//! Client-local credential persistence for roomly.
//!
//! The session layer never touches ambient storage directly; it talks to the
//! [`CredentialStore`] trait, so it can be constructed against a real
//! file-backed store in the application and an in-memory store in tests.
//!
//! The persisted record is deliberately small: the opaque session token and
//! the last-known username (the handle the profile endpoint is keyed by).
//! The resolved user profile is never persisted; it is refetched on restore.
//!
//! # Example
//!
//! ```no_run
//! use roomly_store::{CredentialStore, FileStore, StoredCredentials};
//!
//! let store = FileStore::new("/home/alice/.roomly/credentials.json");
//! store.save(&StoredCredentials::new("tok123", "alice")).unwrap();
//!
//! let loaded = store.load().unwrap();
//! assert_eq!(loaded.unwrap().username, "alice");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod file;
pub mod memory;

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The credential record persisted between process runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    /// Opaque session token issued at login or registration.
    pub token: String,
    /// Last-known username; the profile endpoint is keyed by it.
    pub username: String,
    /// When this record was written.
    pub saved_at: DateTime<Utc>,
}

impl StoredCredentials {
    /// Build a record stamped with the current time.
    #[must_use]
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            saved_at: Utc::now(),
        }
    }
}

/// Persistence port for the session credential record.
///
/// Implementations must make `clear` idempotent: clearing an absent record
/// succeeds. The session layer relies on that when a forced logout races an
/// explicit one.
pub trait CredentialStore: Send + Sync {
    /// Load the persisted record, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read or the record
    /// cannot be decoded.
    fn load(&self) -> Result<Option<StoredCredentials>>;

    /// Persist the record, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, credentials: &StoredCredentials) -> Result<()>;

    /// Remove the persisted record. Succeeds when none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn clear(&self) -> Result<()>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for std::sync::Arc<S> {
    fn load(&self) -> Result<Option<StoredCredentials>> {
        (**self).load()
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        (**self).save(credentials)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
