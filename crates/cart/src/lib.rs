//! Cart/reservation manager for the grocery client.
//!
//! The manager owns the authoritative local cart state and keeps a
//! best-effort stock reservation on the remote product store:
//!
//! 1. Mutations validate against the cached stock and apply locally first
//!    (the optimistic update; the UI sees the new cart immediately).
//! 2. The full cart is persisted to the local snapshot store after every
//!    mutation (once the initial snapshot load has settled).
//! 3. The remote stock update runs as a tracked background task. On failure
//!    the exact local transition is reverted and the cart re-persisted.
//!
//! Local state is the source of truth for the caller; remote failures
//! degrade to a logged rollback, never to a blocked caller. Validation uses
//! cached stock, not a fresh remote read, so concurrent sessions can
//! oversell: the remote store has no compare-and-swap and the last write
//! wins.

pub mod error;
pub mod favorites;
pub mod manager;
pub mod tasks;

pub use error::{CartError, Result};
pub use favorites::{FAVORITES_SNAPSHOT_KEY, FavoritesManager};
pub use manager::{CART_SNAPSHOT_KEY, CartManager};
pub use tasks::SyncTracker;
