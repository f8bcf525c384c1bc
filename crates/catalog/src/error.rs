//! Catalog error types.

use storage::StorageError;
use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The product store failed.
    #[error("Store error: {0}")]
    Store(#[from] StorageError),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
