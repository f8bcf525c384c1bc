//! Favorites: a persisted set of product ids.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use common::{ProductId, StateCell};
use storage::SnapshotStore;
use tokio::sync::watch;

/// Snapshot store key the favorites list is persisted under.
pub const FAVORITES_SNAPSHOT_KEY: &str = "favorites";

/// Manages the favorites list, independent of the cart.
///
/// Same lifecycle as the cart manager: load the snapshot on
/// [`FavoritesManager::init`], then persist after every change. Membership
/// changes are idempotent and persistence failures only warn.
pub struct FavoritesManager<S> {
    snapshots: Arc<S>,
    favorites: StateCell<Vec<ProductId>>,
    armed: Arc<AtomicBool>,
}

impl<S> Clone for FavoritesManager<S> {
    fn clone(&self) -> Self {
        Self {
            snapshots: Arc::clone(&self.snapshots),
            favorites: self.favorites.clone(),
            armed: Arc::clone(&self.armed),
        }
    }
}

impl<S: SnapshotStore> FavoritesManager<S> {
    /// Creates a manager with an empty, un-initialized list.
    pub fn new(snapshots: Arc<S>) -> Self {
        Self {
            snapshots,
            favorites: StateCell::default(),
            armed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Loads the persisted favorites and arms persistence-on-change.
    #[tracing::instrument(skip(self))]
    pub async fn init(&self) {
        match self.snapshots.get(FAVORITES_SNAPSHOT_KEY).await {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<ProductId>>(&blob) {
                Ok(favorites) => self.favorites.set(favorites),
                Err(e) => {
                    tracing::warn!(error = %e, "corrupt favorites snapshot, starting empty");
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "failed to load favorites, starting empty");
            }
        }
        self.armed.store(true, Ordering::Release);
    }

    /// The favorite product ids, in the order they were added.
    pub fn favorites(&self) -> Vec<ProductId> {
        self.favorites.get()
    }

    /// True when the product is a favorite.
    pub fn is_favorite(&self, product_id: &ProductId) -> bool {
        self.favorites.read(|ids| ids.contains(product_id))
    }

    /// Flips membership for a product.
    pub async fn toggle(&self, product_id: &ProductId) {
        self.favorites.update(|ids| {
            match ids.iter().position(|id| id == product_id) {
                Some(index) => {
                    ids.remove(index);
                }
                None => ids.push(product_id.clone()),
            }
        });
        self.persist().await;
    }

    /// Adds a product; already-favorite products are left as-is.
    pub async fn add(&self, product_id: &ProductId) {
        if !self.is_favorite(product_id) {
            self.toggle(product_id).await;
        }
    }

    /// Removes a product; non-favorite products are left as-is.
    pub async fn remove(&self, product_id: &ProductId) {
        if self.is_favorite(product_id) {
            self.toggle(product_id).await;
        }
    }

    /// Subscribes to favorites changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ProductId>> {
        self.favorites.subscribe()
    }

    async fn persist(&self) {
        if !self.armed.load(Ordering::Acquire) {
            return;
        }

        let blob = match self.favorites.read(|ids| serde_json::to_string(ids)) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize favorites");
                return;
            }
        };

        if let Err(e) = self.snapshots.set(FAVORITES_SNAPSHOT_KEY, blob).await {
            tracing::warn!(error = %e, "failed to persist favorites");
        }
    }
}
