//! Admin-only user management surface.

use roomly_api::{paths, ApiClient};
use roomly_core::User;

use crate::error::Result;

/// Typed access to the backend's user administration endpoints.
///
/// The backend enforces the admin requirement; consumers are expected to
/// consult the authorization gate first so non-admins are redirected instead
/// of hitting a rejection.
#[derive(Clone)]
pub struct UserDirectory {
    api: ApiClient,
}

impl UserDirectory {
    /// Create the directory over the shared gateway client.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List every registered user.
    ///
    /// # Errors
    ///
    /// Returns the classified gateway failure unchanged.
    pub async fn all_users(&self) -> Result<Vec<User>> {
        Ok(self.api.get(paths::USERS_ALL).await?)
    }

    /// Delete a user account by username.
    ///
    /// # Errors
    ///
    /// Returns the classified gateway failure unchanged.
    pub async fn delete_user(&self, username: &str) -> Result<()> {
        self.api.delete(&paths::user(username)).await?;
        tracing::info!(username, "User deleted");
        Ok(())
    }
}
