//! Session lifecycle and authorization gate for the roomly client.
//!
//! This crate owns "who is the current actor, and are they allowed to act":
//!
//! - [`SessionStore`]: the single source of truth for the session. It drives
//!   the **Anonymous → Loading → Authenticated** state machine through
//!   `login`/`register`/`restore` and back to Anonymous through `logout` or
//!   any request-layer signal of token invalidity.
//! - [`SessionHandle`]: the shared session state. It implements the
//!   gateway's `Middleware`, injecting the bearer credential into every
//!   outbound request and clearing the session when the backend rejects it.
//! - [`gate`]: the pure authorization decision consulted before rendering
//!   any protected view, re-evaluated on every session change via the
//!   snapshot channel exposed by [`SessionHandle::subscribe`].
//! - [`UserDirectory`]: the admin-only user management surface.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   login/logout/...   ┌──────────────┐
//! │   consumer   │─────────────────────▶│ SessionStore │
//! │  (CLI, UI)   │                      └──────┬───────┘
//! └──────┬───────┘                             │ mutates
//!        │ watches / authorizes         ┌──────▼───────┐
//!        └──────────────────────────────│SessionHandle │
//!                                       └──────┬───────┘
//!                                              │ Middleware
//!                                       ┌──────▼───────┐
//!                                       │  ApiClient   │
//!                                       └──────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use roomly_api::{ApiClient, ApiConfig, Middleware};
//! use roomly_session::{gate, SessionHandle, SessionStore};
//! use roomly_store::MemoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let handle = SessionHandle::new(MemoryStore::new());
//! let middleware: Vec<Arc<dyn Middleware>> = vec![Arc::new(handle.clone())];
//! let api = ApiClient::new(&ApiConfig::default(), middleware);
//! let session = SessionStore::new(api, handle);
//!
//! // Resolve any persisted token before trusting a gate decision.
//! session.restore().await;
//!
//! let user = session.login("alice", "correct").await?;
//! assert_eq!(session.authorize(false), gate::GateDecision::RenderProtected);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod directory;
pub mod error;
pub mod gate;
pub mod handle;
pub mod session;

pub use directory::UserDirectory;
pub use error::{Result, SessionError};
pub use gate::{evaluate, GateDecision};
pub use handle::{SessionHandle, SessionSnapshot, SessionStatus};
pub use session::SessionStore;
