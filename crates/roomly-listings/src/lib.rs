//! Listing queries and property CRUD for the roomly client.
//!
//! The centerpiece is [`ListingService`], which maps a sparse
//! [`roomly_core::PropertyFilter`] to exactly one backend query and keeps
//! rapid filter changes well-ordered: each new fetch supersedes any
//! in-flight one, so a late-arriving older response can never overwrite
//! newer results.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod service;

pub use service::ListingService;
