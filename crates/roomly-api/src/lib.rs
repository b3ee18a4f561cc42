//! HTTP request gateway for the roomly marketplace backend.
//!
//! Every outbound request in the client stack goes through the [`ApiClient`]
//! in this crate. The gateway owns two cross-cutting concerns and nothing
//! else:
//!
//! - **Credential injection**: an installed [`Middleware`] decorates each
//!   request (the session layer contributes the `Authorization` header).
//! - **Failure classification**: every failure becomes exactly one
//!   [`ApiError`] variant (`Unauthorized`, `Client`, `Server`, or
//!   `Network`) and the middleware chain observes it.
//!
//! The gateway never retries. Retrying an `Unauthorized` without first
//! clearing the stale token would loop forever, so retry policy belongs to
//! callers that can see session state.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐     ┌────────────────┐     ┌────────────────┐
//! │ SessionStore / │────▶│   ApiClient    │────▶│    backend     │
//! │ ListingService │     │  (middleware   │     │    REST API    │
//! └────────────────┘     │   chain)       │     └────────────────┘
//!                        └───────┬────────┘
//!                                │ on_request / on_error
//!                        ┌───────▼────────┐
//!                        │  Middleware    │
//!                        │  (trait)       │
//!                        └────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod paths;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use middleware::Middleware;
