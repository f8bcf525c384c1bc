//! Store contracts.

use async_trait::async_trait;
use common::{OrderId, ProductId, UserId};
use domain::{Order, Product};

use crate::error::Result;

/// The remote product catalog.
///
/// Assumed eventually consistent with no transactional guarantees:
/// `update_stock` overwrites the stored value, and concurrent writers are
/// resolved by last-write-wins.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Fetches every product.
    async fn get_all(&self) -> Result<Vec<Product>>;

    /// Fetches a product by id, `None` when absent.
    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>>;

    /// Overwrites the stock field of a product document.
    async fn update_stock(&self, id: &ProductId, new_stock: u32) -> Result<()>;

    /// Inserts or replaces a product document (catalog maintenance).
    async fn insert(&self, product: Product) -> Result<()>;

    /// Deletes every product document (catalog maintenance).
    async fn clear(&self) -> Result<()>;
}

/// Local persistent key/value storage for serialized snapshots.
///
/// Single in-process writer; no concurrency control. Values are opaque JSON
/// blobs.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Reads the blob stored under `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `blob` under `key`, replacing any previous value.
    async fn set(&self, key: &str, blob: String) -> Result<()>;

    /// Removes the blob stored under `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Append-only order records, keyed by an externally supplied identity uid.
#[async_trait]
pub trait OrderLog: Send + Sync {
    /// Appends an order record for a user.
    async fn append(&self, user_id: &UserId, order: &Order) -> Result<()>;

    /// Returns a user's orders, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>>;

    /// Fetches a single order by id, `None` when absent.
    async fn get(&self, id: &OrderId) -> Result<Option<Order>>;
}
