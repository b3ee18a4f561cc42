//! Domain types for the roomly marketplace client.
//!
//! This crate provides the types shared across the client stack:
//!
//! - **Accounts**: [`User`], [`Role`], and the registration/update payloads
//! - **Listings**: [`Property`] and its create/update payloads
//! - **Filtering**: [`PropertyFilter`], the sparse criteria object that the
//!   listing query layer maps onto backend queries
//!
//! All types serialize to the backend's camelCase JSON wire format.
//!
//! # Example
//!
//! ```
//! use roomly_core::{Gender, PropertyFilter};
//!
//! let filter = PropertyFilter {
//!     location: Some("Downtown".to_string()),
//!     min_budget: Some(500.0),
//!     ..PropertyFilter::default()
//! };
//!
//! assert!(!filter.is_empty());
//! assert_eq!(filter.query_params().len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod filter;
pub mod payload;
pub mod types;

pub use filter::PropertyFilter;
pub use payload::{NewProperty, ProfileUpdate, PropertyUpdate, Registration};
pub use types::{Gender, ParseEnumError, Property, Role, User};
