//! Client wiring for the grocery app.
//!
//! [`App`] assembles the session, catalog, cart manager, and favorites over
//! a set of injected stores, the composition root the UI layer would hold.
//! [`App::in_memory`] wires everything over in-memory stores for tests and
//! demos.

pub mod config;
pub mod seed;

use std::sync::Arc;

use auth::{IdentityProvider, InMemoryIdentityProvider, Session};
use cart::{CartManager, FavoritesManager};
use catalog::ProductCatalog;
use domain::Product;
use storage::{
    InMemoryOrderLog, InMemoryProductStore, InMemorySnapshotStore, OrderLog, ProductStore,
    SnapshotStore,
};

pub use config::Config;

/// The assembled client.
///
/// Holds one of everything the UI talks to. Construct with [`App::new`] over
/// real stores, then call [`App::init`] once at startup.
pub struct App<P, S, L> {
    pub session: Session,
    pub catalog: ProductCatalog<P>,
    pub cart: CartManager<P, S, L>,
    pub favorites: FavoritesManager<S>,
    pub orders: Arc<L>,
}

impl<P, S, L> App<P, S, L>
where
    P: ProductStore + 'static,
    S: SnapshotStore + 'static,
    L: OrderLog + 'static,
{
    /// Wires the client over the given stores and identity provider.
    pub fn new(
        products: Arc<P>,
        snapshots: Arc<S>,
        orders: Arc<L>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        let session = Session::new(provider);
        let catalog = ProductCatalog::new(Arc::clone(&products));
        let cart = CartManager::new(
            products,
            Arc::clone(&snapshots),
            Arc::clone(&orders),
            catalog.clone(),
            session.clone(),
        );
        let favorites = FavoritesManager::new(snapshots);

        Self {
            session,
            catalog,
            cart,
            favorites,
            orders,
        }
    }

    /// Startup sequence: restore local snapshots, then load the catalog.
    ///
    /// A failed catalog load is recorded in the catalog state (and logged)
    /// rather than aborting startup; the UI shows the error and can retry.
    pub async fn init(&self) {
        self.cart.init().await;
        self.favorites.init().await;
        if let Err(e) = self.catalog.load().await {
            tracing::warn!(error = %e, "initial catalog load failed");
        }
    }
}

/// The all-in-memory wiring used by tests and demos.
pub type InMemoryApp = App<InMemoryProductStore, InMemorySnapshotStore, InMemoryOrderLog>;

impl InMemoryApp {
    /// Wires the client over fresh in-memory stores seeded with `products`.
    ///
    /// Returns the provider alongside the app so tests can drive
    /// verification and failure injection.
    pub async fn in_memory(products: Vec<Product>) -> (Self, Arc<InMemoryIdentityProvider>) {
        let store = Arc::new(InMemoryProductStore::with_products(products).await);
        let snapshots = Arc::new(InMemorySnapshotStore::new());
        let orders = Arc::new(InMemoryOrderLog::new());
        let provider = Arc::new(InMemoryIdentityProvider::new());

        let app = App::new(store, snapshots, orders, provider.clone());
        (app, provider)
    }
}
