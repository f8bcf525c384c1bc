//! Cart error types.

use storage::StorageError;
use thiserror::Error;

/// Errors surfaced to callers of the cart manager.
///
/// Only pre-mutation validation failures and the order append are
/// caller-visible. Snapshot persistence failures and background stock sync
/// failures are logged (the latter with a compensating rollback) and never
/// surface here.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity below the minimum of 1.
    #[error("Invalid quantity: {quantity} (must be at least 1)")]
    InvalidQuantity { quantity: u32 },

    /// The requested quantity exceeds the available stock.
    #[error("Only {available} items available in stock")]
    InsufficientStock { requested: u32, available: u32 },

    /// Checkout on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The order log rejected the append; the cart is left intact.
    #[error("Store error: {0}")]
    Store(#[from] StorageError),
}

/// Result type for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;
