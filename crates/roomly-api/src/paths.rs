//! Backend endpoint paths.
//!
//! Kept in one place so the session and listing layers agree on the REST
//! surface they consume.

/// Credential exchange: `POST {username, password}` → `{token}`.
pub const LOGIN: &str = "/auth/login";

/// Account creation: `POST` registration payload → `{token}`.
pub const REGISTER: &str = "/auth/register";

/// All user records (admin only).
pub const USERS_ALL: &str = "/api/users/all";

/// All listings, unfiltered.
pub const PROPERTIES_ALL: &str = "/api/properties/all";

/// Filtered listings; populated criteria go in the query string.
pub const PROPERTIES_FILTER: &str = "/api/properties/filter/advanced";

/// The current session's own listings.
pub const PROPERTIES_MINE: &str = "/api/properties/user";

/// Listing creation.
pub const PROPERTY_CREATE: &str = "/api/properties/create";

/// A user record by username (`GET`/`PUT`/`DELETE`).
#[must_use]
pub fn user(username: &str) -> String {
    format!("/api/users/{username}")
}

/// A listing by id.
#[must_use]
pub fn property(id: &str) -> String {
    format!("/api/properties/{id}")
}

/// Listing update by id.
#[must_use]
pub fn property_update(id: &str) -> String {
    format!("/api/properties/update/{id}")
}

/// Listing deletion by id.
#[must_use]
pub fn property_delete(id: &str) -> String {
    format!("/api/properties/delete/{id}")
}
