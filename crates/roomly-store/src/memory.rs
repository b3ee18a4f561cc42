//! In-memory credential store for tests and embedders without a filesystem.

use parking_lot::Mutex;

use crate::error::Result;
use crate::{CredentialStore, StoredCredentials};

/// Credential store holding the record in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<Option<StoredCredentials>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Option<StoredCredentials>> {
        Ok(self.record.lock().clone())
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        *self.record.lock() = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.record.lock() = None;
        Ok(())
    }
}
