//! Request/response transforms applied by the gateway.

use crate::error::ApiError;

/// A transform in the gateway's middleware chain.
///
/// `on_request` decorates the outbound request; `on_error` observes every
/// classified failure after it happens. Transforms should be pure, with one
/// documented exception: the session layer installs a transform whose
/// `on_error` clears session state when it sees
/// [`ApiError::Unauthorized`]. That side effect is intentional and contained
/// there, since a stale token must be cleared before anything retries.
pub trait Middleware: Send + Sync {
    /// Transform an outbound request before it is sent.
    fn on_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
    }

    /// Observe a classified failure.
    fn on_error(&self, _error: &ApiError) {}
}
