//! Gateway error classification.

use thiserror::Error;

/// A result type using `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Every inbound failure, classified into exactly one variant.
///
/// `Unauthorized` is the only variant that can invalidate a session without
/// explicit user action; the session layer's middleware reacts to it. All
/// other variants are local to the operation that triggered them.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the presented credential (HTTP 401).
    #[error("session credential rejected by the backend")]
    Unauthorized,

    /// The backend reported a server-side fault (HTTP 5xx), or returned a
    /// body that violates the payload contract.
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Error payload text, or a placeholder when none was readable.
        message: String,
    },

    /// No usable response was received (connect failure, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The backend rejected the request itself (HTTP 4xx other than 401),
    /// e.g. a validation failure echoed from the server.
    #[error("request rejected ({status}): {message}")]
    Client {
        /// HTTP status code.
        status: u16,
        /// Error payload text, or a placeholder when none was readable.
        message: String,
    },
}

impl ApiError {
    /// Returns `true` if this failure must force the session closed.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns `true` for transient failures that are surfaced as a notice
    /// and abandoned rather than acted on.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Server { .. })
    }

    /// The HTTP status this failure carries, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Server { status, .. } | Self::Client { status, .. } => Some(*status),
            Self::Network(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_is_not_transient() {
        assert!(ApiError::Unauthorized.is_unauthorized());
        assert!(!ApiError::Unauthorized.is_transient());
    }

    #[test]
    fn transient_classification() {
        assert!(ApiError::Network("connection refused".into()).is_transient());
        assert!(ApiError::Server {
            status: 503,
            message: "unavailable".into()
        }
        .is_transient());
        assert!(!ApiError::Client {
            status: 400,
            message: "bad input".into()
        }
        .is_transient());
    }

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::Unauthorized.status(), Some(401));
        assert_eq!(ApiError::Network("timeout".into()).status(), None);
        assert_eq!(
            ApiError::Client {
                status: 409,
                message: "duplicate".into()
            }
            .status(),
            Some(409)
        );
    }
}
