//! Product catalog state for the grocery client.
//!
//! [`ProductCatalog`] holds the loaded product list (with loading and error
//! flags) in a shared [`common::StateCell`], loads it from a
//! [`storage::ProductStore`], and answers lookups, searches, and tag
//! filters. The cart manager writes cached stock values through
//! [`ProductCatalog::set_stock`] so every view of a product agrees after a
//! reservation.

pub mod catalog;
pub mod error;

pub use catalog::{CatalogState, ProductCatalog};
pub use error::{CatalogError, Result};
