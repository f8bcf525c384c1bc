//! The product catalog state container.

use std::sync::Arc;

use common::{ProductId, StateCell};
use domain::{Product, filter_by_tags, search_products};
use storage::ProductStore;
use tokio::sync::watch;

use crate::error::Result;

/// Catalog state: the loaded products plus load progress.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    /// Products as last fetched, in store order.
    pub products: Vec<Product>,
    /// True while a load is in flight.
    pub loading: bool,
    /// Message from the last failed load, cleared on the next attempt.
    pub error: Option<String>,
}

/// The shared product catalog.
///
/// Owns the products list; other components read it (and the cart manager
/// writes cached stock through it). Clones share state and store.
pub struct ProductCatalog<P> {
    store: Arc<P>,
    state: StateCell<CatalogState>,
}

impl<P> Clone for ProductCatalog<P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            state: self.state.clone(),
        }
    }
}

impl<P: ProductStore> ProductCatalog<P> {
    /// Creates an empty catalog over a product store.
    pub fn new(store: Arc<P>) -> Self {
        Self {
            store,
            state: StateCell::default(),
        }
    }

    /// Loads (or reloads) the product list from the store.
    ///
    /// The loading flag is set for the duration; a failure records its
    /// message in the state and is also returned.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> Result<()> {
        self.state.update(|s| {
            s.loading = true;
            s.error = None;
        });

        match self.store.get_all().await {
            Ok(products) => {
                tracing::info!(count = products.len(), "products loaded");
                self.state.update(|s| {
                    s.products = products;
                    s.loading = false;
                });
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load products");
                self.state.update(|s| {
                    s.loading = false;
                    s.error = Some(e.to_string());
                });
                Err(e.into())
            }
        }
    }

    /// The current product list.
    pub fn products(&self) -> Vec<Product> {
        self.state.read(|s| s.products.clone())
    }

    /// Looks up a product by id.
    pub fn get(&self, id: &ProductId) -> Option<Product> {
        self.state
            .read(|s| s.products.iter().find(|p| &p.id == id).cloned())
    }

    /// True while a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.read(|s| s.loading)
    }

    /// Message from the last failed load, if any.
    pub fn error(&self) -> Option<String> {
        self.state.read(|s| s.error.clone())
    }

    /// Overwrites the cached stock for a product. Returns false when the
    /// product is not in the loaded list.
    pub fn set_stock(&self, id: &ProductId, stock: u32) -> bool {
        let mut updated = false;
        self.state.update(|s| {
            if let Some(product) = s.products.iter_mut().find(|p| &p.id == id) {
                product.stock = stock;
                updated = true;
            }
        });
        updated
    }

    /// Searches the loaded products by name or description.
    pub fn search(&self, term: &str) -> Vec<Product> {
        self.state
            .read(|s| search_products(&s.products, term).into_iter().cloned().collect())
    }

    /// Searches, then narrows by selected tag filters.
    pub fn filtered(&self, term: &str, filters: &[String]) -> Vec<Product> {
        self.state.read(|s| {
            let searched: Vec<Product> = search_products(&s.products, term)
                .into_iter()
                .cloned()
                .collect();
            filter_by_tags(&searched, filters)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    /// Subscribes to catalog state changes.
    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.state.subscribe()
    }
}
