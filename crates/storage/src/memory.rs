//! In-memory store implementations for tests and demos.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, ProductId, UserId};
use domain::{Order, Product};
use tokio::sync::RwLock;

use crate::error::{Result, StorageError};
use crate::store::{OrderLog, ProductStore, SnapshotStore};

#[derive(Debug, Default)]
struct ProductState {
    products: Vec<Product>,
    fail_on_update_stock: bool,
    update_stock_calls: u32,
}

/// In-memory product store.
///
/// Keeps products in insertion order (the order `get_all` returns them).
/// Supports failure injection on `update_stock` and counts the calls made,
/// so tests can assert which operations issue remote syncs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductStore {
    state: Arc<RwLock<ProductState>>,
}

impl InMemoryProductStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with products.
    pub async fn with_products(products: Vec<Product>) -> Self {
        let store = Self::new();
        store.state.write().await.products = products;
        store
    }

    /// Makes subsequent `update_stock` calls fail.
    pub async fn set_fail_on_update_stock(&self, fail: bool) {
        self.state.write().await.fail_on_update_stock = fail;
    }

    /// Number of `update_stock` calls issued so far (including failed ones).
    pub async fn update_stock_calls(&self) -> u32 {
        self.state.read().await.update_stock_calls
    }

    /// Current stored stock for a product, for test assertions.
    pub async fn stock_of(&self, id: &ProductId) -> Option<u32> {
        self.state
            .read()
            .await
            .products
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.stock)
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn get_all(&self) -> Result<Vec<Product>> {
        Ok(self.state.read().await.products.clone())
    }

    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>> {
        Ok(self
            .state
            .read()
            .await
            .products
            .iter()
            .find(|p| &p.id == id)
            .cloned())
    }

    async fn update_stock(&self, id: &ProductId, new_stock: u32) -> Result<()> {
        let mut state = self.state.write().await;
        state.update_stock_calls += 1;

        if state.fail_on_update_stock {
            return Err(StorageError::Unavailable(
                "injected product store failure".to_string(),
            ));
        }

        match state.products.iter_mut().find(|p| &p.id == id) {
            Some(product) => {
                product.stock = new_stock;
                Ok(())
            }
            None => Err(StorageError::ProductNotFound(id.clone())),
        }
    }

    async fn insert(&self, product: Product) -> Result<()> {
        let mut state = self.state.write().await;
        match state.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => state.products.push(product),
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.state.write().await.products.clear();
        Ok(())
    }
}

#[derive(Debug, Default)]
struct SnapshotState {
    blobs: HashMap<String, String>,
    fail_on_set: bool,
}

/// In-memory snapshot store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotStore {
    state: Arc<RwLock<SnapshotState>>,
}

impl InMemorySnapshotStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `set` calls fail.
    pub async fn set_fail_on_set(&self, fail: bool) {
        self.state.write().await.fail_on_set = fail;
    }

    /// True when a blob is stored under `key`.
    pub async fn has(&self, key: &str) -> bool {
        self.state.read().await.blobs.contains_key(key)
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.state.read().await.blobs.get(key).cloned())
    }

    async fn set(&self, key: &str, blob: String) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_on_set {
            return Err(StorageError::Unavailable(
                "injected snapshot store failure".to_string(),
            ));
        }
        state.blobs.insert(key.to_string(), blob);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.state.write().await.blobs.remove(key);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct OrderLogState {
    orders: Vec<(UserId, Order)>,
    fail_on_append: bool,
}

/// In-memory order log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderLog {
    state: Arc<RwLock<OrderLogState>>,
}

impl InMemoryOrderLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `append` calls fail.
    pub async fn set_fail_on_append(&self, fail: bool) {
        self.state.write().await.fail_on_append = fail;
    }

    /// Total number of appended orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }
}

#[async_trait]
impl OrderLog for InMemoryOrderLog {
    async fn append(&self, user_id: &UserId, order: &Order) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_on_append {
            return Err(StorageError::Unavailable(
                "injected order log failure".to_string(),
            ));
        }
        state.orders.push((user_id.clone(), order.clone()));
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<Order> = state
            .orders
            .iter()
            .filter(|(uid, _)| uid == user_id)
            .map(|(_, order)| order.clone())
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn get(&self, id: &OrderId) -> Result<Option<Order>> {
        Ok(self
            .state
            .read()
            .await
            .orders
            .iter()
            .find(|(_, order)| order.id == *id)
            .map(|(_, order)| order.clone()))
    }
}
