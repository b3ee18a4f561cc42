//! Gateway configuration types.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the HTTP gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend (e.g. `http://localhost:8080`).
    #[serde(default = "ApiConfig::default_base_url")]
    pub base_url: String,

    /// Fixed per-call deadline in seconds.
    #[serde(default = "ApiConfig::default_timeout")]
    pub timeout_seconds: u64,
}

impl ApiConfig {
    fn default_base_url() -> String {
        "http://localhost:8080".to_string()
    }

    const fn default_timeout() -> u64 {
        10
    }

    /// Create a config for the given base URL with the default deadline.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: Self::default_timeout(),
        }
    }

    /// Get the per-call deadline as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout_seconds: Self::default_timeout(),
        }
    }
}
