//! The cart/reservation manager.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use auth::Session;
use catalog::ProductCatalog;
use chrono::Utc;
use common::{ProductId, StateCell};
use domain::{Cart, CartItem, Money, Order, Product};
use futures_util::future::join_all;
use storage::{OrderLog, ProductStore, SnapshotStore};
use tokio::sync::watch;

use crate::error::{CartError, Result};
use crate::tasks::SyncTracker;

/// Snapshot store key the cart is persisted under.
pub const CART_SNAPSHOT_KEY: &str = "cart";

/// Undo record for one optimistic mutation.
///
/// Captured before the background sync is issued; applying it restores the
/// exact pre-mutation item state and the catalog's cached stock.
#[derive(Debug, Clone)]
struct Revert {
    product_id: ProductId,
    /// The item as it was before the mutation, `None` when it was absent.
    previous: Option<CartItem>,
    /// The catalog's cached stock before the mutation.
    catalog_stock: u32,
}

/// Manages the cart and its stock reservation on the product store.
///
/// Owns the cart state; mirrors every change to the snapshot store (after
/// [`CartManager::init`]) and reserves/releases stock on the product store
/// through tracked background tasks with rollback on failure. Clones share
/// all state.
pub struct CartManager<P, S, L> {
    products: Arc<P>,
    snapshots: Arc<S>,
    orders: Arc<L>,
    catalog: ProductCatalog<P>,
    session: Session,
    cart: StateCell<Cart>,
    armed: Arc<AtomicBool>,
    sync: Arc<SyncTracker>,
}

impl<P, S, L> Clone for CartManager<P, S, L> {
    fn clone(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
            snapshots: Arc::clone(&self.snapshots),
            orders: Arc::clone(&self.orders),
            catalog: self.catalog.clone(),
            session: self.session.clone(),
            cart: self.cart.clone(),
            armed: Arc::clone(&self.armed),
            sync: Arc::clone(&self.sync),
        }
    }
}

impl<P, S, L> CartManager<P, S, L>
where
    P: ProductStore + 'static,
    S: SnapshotStore + 'static,
    L: OrderLog + 'static,
{
    /// Creates a manager with an empty, un-initialized cart.
    ///
    /// Call [`CartManager::init`] before mutating; until then,
    /// persistence-on-change stays suppressed so an empty initial state
    /// cannot overwrite a stored snapshot.
    pub fn new(
        products: Arc<P>,
        snapshots: Arc<S>,
        orders: Arc<L>,
        catalog: ProductCatalog<P>,
        session: Session,
    ) -> Self {
        Self {
            products,
            snapshots,
            orders,
            catalog,
            session,
            cart: StateCell::default(),
            armed: Arc::new(AtomicBool::new(false)),
            sync: Arc::new(SyncTracker::new()),
        }
    }

    /// Loads the persisted cart snapshot and arms persistence-on-change.
    ///
    /// A missing, unreadable, or corrupt snapshot is treated as an empty
    /// cart; persistence is armed either way.
    #[tracing::instrument(skip(self))]
    pub async fn init(&self) {
        match self.snapshots.get(CART_SNAPSHOT_KEY).await {
            Ok(Some(blob)) => match serde_json::from_str::<Cart>(&blob) {
                Ok(cart) => {
                    tracing::info!(items = cart.len(), "cart snapshot loaded");
                    self.cart.set(cart);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "corrupt cart snapshot, starting empty");
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "failed to load cart snapshot, starting empty");
            }
        }
        self.armed.store(true, Ordering::Release);
    }

    /// Adds `quantity` units of a product to the cart.
    ///
    /// Validates against the stock carried on the passed-in product, which
    /// is the caller's last-known value, not a fresh remote read. On success the
    /// cart and the catalog's cached stock are updated immediately and the
    /// remote stock update runs in the background, rolling the addition back
    /// if it fails.
    #[tracing::instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_cart(&self, product: &Product, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }

        let existing = self.cart.read(|c| c.quantity_of(&product.id));
        let total = existing + quantity;
        if total > product.stock {
            return Err(CartError::InsufficientStock {
                requested: total,
                available: product.stock,
            });
        }

        let new_stock = product.stock - quantity;
        let revert = Revert {
            product_id: product.id.clone(),
            previous: self.cart.read(|c| c.get(&product.id).cloned()),
            // The catalog's own prior value, which may differ from the
            // caller's snapshot.
            catalog_stock: self
                .catalog
                .get(&product.id)
                .map_or(product.stock, |p| p.stock),
        };

        self.catalog.set_stock(&product.id, new_stock);
        self.cart
            .update(|c| c.insert_or_increment(product.with_stock(new_stock), quantity));
        metrics::counter!("cart_adds_total").increment(1);

        self.persist().await;
        self.spawn_stock_sync(product.id.clone(), new_stock, revert);
        Ok(())
    }

    /// Removes a product from the cart, releasing its reservation.
    ///
    /// Removing a product that is not in the cart is a successful no-op.
    #[tracing::instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_from_cart(&self, product_id: &ProductId) -> Result<()> {
        let mut removed = None;
        self.cart.update(|c| removed = c.remove(product_id));

        let Some(item) = removed else {
            return Ok(());
        };

        let restored = item.product.stock + item.quantity;
        let revert = Revert {
            product_id: product_id.clone(),
            catalog_stock: item.product.stock,
            previous: Some(item),
        };

        self.catalog.set_stock(product_id, restored);
        self.persist().await;
        self.spawn_stock_sync(product_id.clone(), restored, revert);
        Ok(())
    }

    /// Sets the quantity for a product already in the cart.
    ///
    /// A quantity of 0 removes the item. An unknown product id is a
    /// successful no-op. Increases are validated against the item's cached
    /// stock; the derived stock is pushed in the background with rollback.
    #[tracing::instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_quantity(&self, product_id: &ProductId, new_quantity: u32) -> Result<()> {
        if new_quantity == 0 {
            return self.remove_from_cart(product_id).await;
        }

        let Some(current) = self.cart.read(|c| c.get(product_id).cloned()) else {
            return Ok(());
        };

        let cached_stock = current.product.stock;
        let new_stock = if new_quantity >= current.quantity {
            let diff = new_quantity - current.quantity;
            if diff > cached_stock {
                return Err(CartError::InsufficientStock {
                    requested: diff,
                    available: cached_stock,
                });
            }
            cached_stock - diff
        } else {
            cached_stock + (current.quantity - new_quantity)
        };

        let revert = Revert {
            product_id: product_id.clone(),
            previous: Some(current),
            catalog_stock: cached_stock,
        };

        self.catalog.set_stock(product_id, new_stock);
        self.cart.update(|c| {
            c.set_quantity(product_id, new_quantity);
            c.set_cached_stock(product_id, new_stock);
        });

        self.persist().await;
        self.spawn_stock_sync(product_id.clone(), new_stock, revert);
        Ok(())
    }

    /// Empties the cart and releases every reservation.
    ///
    /// The cart and its snapshot are cleared immediately; stock restorations
    /// run in the background, one per item. A failed restoration returns its
    /// item to the cart; partial restoration is possible and logged.
    #[tracing::instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<()> {
        let mut items = Vec::new();
        self.cart.update(|c| items = c.clear());

        if let Err(e) = self.snapshots.remove(CART_SNAPSHOT_KEY).await {
            tracing::warn!(error = %e, "failed to clear cart snapshot");
        }

        if items.is_empty() {
            return Ok(());
        }
        metrics::counter!("cart_clears_total").increment(1);

        let this = self.clone();
        self.sync.spawn(async move {
            let restorations = items.into_iter().map(|item| {
                let this = this.clone();
                async move {
                    let product_id = item.product.id.clone();
                    let restored = item.product.stock + item.quantity;
                    match this.products.update_stock(&product_id, restored).await {
                        Ok(()) => {
                            this.catalog.set_stock(&product_id, restored);
                            true
                        }
                        Err(e) => {
                            metrics::counter!("cart_stock_sync_failures_total").increment(1);
                            tracing::warn!(
                                %product_id, error = %e,
                                "stock restoration failed, returning item to cart"
                            );
                            this.cart.update(|c| c.restore(item));
                            false
                        }
                    }
                }
            });

            let results = join_all(restorations).await;
            if results.contains(&false) {
                this.persist().await;
            }
        });

        Ok(())
    }

    /// Converts the reservation into a completed order.
    ///
    /// Builds the order record from the cart, appends it to the order log
    /// when an identity is signed in (an append failure propagates and
    /// leaves the cart intact), then empties the cart and its snapshot
    /// WITHOUT restoring stock. This is the only operation that makes the
    /// reservation permanent.
    #[tracing::instrument(skip(self))]
    pub async fn complete_order(&self) -> Result<Order> {
        let items = self.cart.read(|c| c.items().to_vec());
        if items.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let order = Order::from_cart_items(&items, Utc::now());

        match self.session.current() {
            Some(identity) => {
                self.orders.append(&identity.uid, &order).await?;
            }
            None => {
                tracing::warn!("no signed-in identity, order not recorded");
            }
        }

        self.cart.update(|c| {
            c.clear();
        });
        if let Err(e) = self.snapshots.remove(CART_SNAPSHOT_KEY).await {
            tracing::warn!(error = %e, "failed to clear cart snapshot");
        }

        metrics::counter!("orders_completed_total").increment(1);
        tracing::info!(
            order_number = %order.order_number,
            total = %order.total,
            "order completed"
        );
        Ok(order)
    }

    /// Sum of `unit price × quantity` over all items.
    pub fn cart_total(&self) -> Money {
        self.cart.read(Cart::total)
    }

    /// Sum of quantities over all items.
    pub fn items_count(&self) -> u32 {
        self.cart.read(Cart::item_count)
    }

    /// The current cart items, in insertion order.
    pub fn items(&self) -> Vec<CartItem> {
        self.cart.read(|c| c.items().to_vec())
    }

    /// Subscribes to cart changes.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.cart.subscribe()
    }

    /// Waits for all in-flight background stock syncs to settle.
    pub async fn flush(&self) {
        self.sync.flush().await;
    }

    /// Saves the full cart to the snapshot store, if persistence is armed.
    /// Failures are logged and never surface.
    async fn persist(&self) {
        if !self.armed.load(Ordering::Acquire) {
            return;
        }

        let blob = match self.cart.read(|c| serde_json::to_string(c)) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize cart snapshot");
                return;
            }
        };

        if let Err(e) = self.snapshots.set(CART_SNAPSHOT_KEY, blob).await {
            tracing::warn!(error = %e, "failed to persist cart snapshot");
        }
    }

    /// Issues the background stock sync for one mutation, with rollback.
    fn spawn_stock_sync(&self, product_id: ProductId, new_stock: u32, revert: Revert) {
        let this = self.clone();
        self.sync.spawn(async move {
            if let Err(e) = this.products.update_stock(&product_id, new_stock).await {
                metrics::counter!("cart_stock_sync_failures_total").increment(1);
                tracing::warn!(%product_id, error = %e, "stock sync failed, rolling back");
                this.apply_revert(revert);
                this.persist().await;
            }
        });
    }

    /// Restores the pre-mutation item state and cached stock.
    fn apply_revert(&self, revert: Revert) {
        let Revert {
            product_id,
            previous,
            catalog_stock,
        } = revert;

        self.cart.update(|c| match previous {
            Some(item) => c.restore(item),
            None => {
                c.remove(&product_id);
            }
        });
        self.catalog.set_stock(&product_id, catalog_stock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::{IdentityProvider, InMemoryIdentityProvider, Session};
    use storage::{InMemoryOrderLog, InMemoryProductStore, InMemorySnapshotStore};

    type TestManager = CartManager<InMemoryProductStore, InMemorySnapshotStore, InMemoryOrderLog>;

    struct Fixture {
        manager: TestManager,
        products: Arc<InMemoryProductStore>,
        snapshots: Arc<InMemorySnapshotStore>,
        orders: Arc<InMemoryOrderLog>,
        catalog: ProductCatalog<InMemoryProductStore>,
        provider: Arc<InMemoryIdentityProvider>,
    }

    fn product(id: &str, price_cents: i64, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::from("A sample product"),
            price: Money::from_cents(price_cents),
            image_url: String::new(),
            stock,
            category: None,
            tags: None,
        }
    }

    async fn setup(products: Vec<Product>) -> Fixture {
        let store = Arc::new(InMemoryProductStore::with_products(products).await);
        let snapshots = Arc::new(InMemorySnapshotStore::new());
        let orders = Arc::new(InMemoryOrderLog::new());
        let provider = Arc::new(InMemoryIdentityProvider::new());
        let session = Session::new(provider.clone());

        let catalog = ProductCatalog::new(Arc::clone(&store));
        catalog.load().await.unwrap();

        let manager = CartManager::new(
            Arc::clone(&store),
            Arc::clone(&snapshots),
            Arc::clone(&orders),
            catalog.clone(),
            session,
        );
        manager.init().await;

        Fixture {
            manager,
            products: store,
            snapshots,
            orders,
            catalog,
            provider,
        }
    }

    #[tokio::test]
    async fn add_to_cart_reserves_stock() {
        let f = setup(vec![product("prod_001", 299, 10)]).await;
        let p = f.catalog.get(&ProductId::new("prod_001")).unwrap();

        f.manager.add_to_cart(&p, 3).await.unwrap();
        f.manager.flush().await;

        let items = f.manager.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].product.stock, 7);
        assert_eq!(f.catalog.get(&p.id).unwrap().stock, 7);
        assert_eq!(f.products.stock_of(&p.id).await, Some(7));
    }

    #[tokio::test]
    async fn add_zero_quantity_is_invalid() {
        let f = setup(vec![product("prod_001", 299, 10)]).await;
        let p = f.catalog.get(&ProductId::new("prod_001")).unwrap();

        let result = f.manager.add_to_cart(&p, 0).await;
        assert!(matches!(result, Err(CartError::InvalidQuantity { .. })));
        assert!(f.manager.items().is_empty());
    }

    #[tokio::test]
    async fn insufficient_stock_rejects_without_mutation() {
        let f = setup(vec![product("prod_001", 299, 5)]).await;
        let p = f.catalog.get(&ProductId::new("prod_001")).unwrap();

        let result = f.manager.add_to_cart(&p, 6).await;
        assert!(matches!(
            result,
            Err(CartError::InsufficientStock {
                requested: 6,
                available: 5
            })
        ));

        f.manager.flush().await;
        assert!(f.manager.items().is_empty());
        assert_eq!(f.catalog.get(&p.id).unwrap().stock, 5);
        assert_eq!(f.products.update_stock_calls().await, 0);
    }

    #[tokio::test]
    async fn reservation_scenario_prod_001() {
        // Walkthrough with a caller that keeps its original product
        // snapshot (stock 10), as the product detail screen does:
        // add 3 → qty 3, add 5 → qty 8, add 5 more → rejected, unchanged.
        let f = setup(vec![product("prod_001", 299, 10)]).await;
        let id = ProductId::new("prod_001");
        let p = f.catalog.get(&id).unwrap();

        f.manager.add_to_cart(&p, 3).await.unwrap();
        assert_eq!(f.manager.items()[0].quantity, 3);
        assert_eq!(f.manager.items()[0].product.stock, 7);

        f.manager.add_to_cart(&p, 5).await.unwrap();
        assert_eq!(f.manager.items()[0].quantity, 8);

        let result = f.manager.add_to_cart(&p, 5).await;
        assert!(matches!(result, Err(CartError::InsufficientStock { .. })));
        assert_eq!(f.manager.items()[0].quantity, 8);
    }

    #[tokio::test]
    async fn repeated_add_with_fresh_stock_counts_existing_quantity() {
        // A caller that re-reads the (already decremented) cached stock:
        // the validation still counts the quantity already in the cart.
        let f = setup(vec![product("prod_001", 299, 10)]).await;
        let id = ProductId::new("prod_001");

        let p = f.catalog.get(&id).unwrap();
        f.manager.add_to_cart(&p, 3).await.unwrap();

        // Cached stock is now 7; 3 in cart + 5 more exceeds it.
        let p = f.catalog.get(&id).unwrap();
        assert_eq!(p.stock, 7);
        let result = f.manager.add_to_cart(&p, 5).await;
        assert!(matches!(
            result,
            Err(CartError::InsufficientStock {
                requested: 8,
                available: 7
            })
        ));

        // 3 + 4 = 7 still fits.
        f.manager.add_to_cart(&p, 4).await.unwrap();
        f.manager.flush().await;
        assert_eq!(f.manager.items()[0].quantity, 7);
        assert_eq!(f.manager.items()[0].product.stock, 3);
        assert_eq!(f.products.stock_of(&id).await, Some(3));
    }

    #[tokio::test]
    async fn cart_total_and_count() {
        let f = setup(vec![product("prod_001", 299, 10), product("prod_002", 499, 10)]).await;

        let p1 = f.catalog.get(&ProductId::new("prod_001")).unwrap();
        let p2 = f.catalog.get(&ProductId::new("prod_002")).unwrap();
        f.manager.add_to_cart(&p1, 3).await.unwrap();
        f.manager.add_to_cart(&p2, 2).await.unwrap();
        f.manager.flush().await;

        assert_eq!(f.manager.cart_total().cents(), 897 + 998);
        assert_eq!(f.manager.items_count(), 5);
    }

    #[tokio::test]
    async fn failed_add_sync_rolls_back() {
        let f = setup(vec![product("prod_001", 299, 10)]).await;
        let p = f.catalog.get(&ProductId::new("prod_001")).unwrap();

        f.products.set_fail_on_update_stock(true).await;
        f.manager.add_to_cart(&p, 3).await.unwrap();

        // Optimistic state is visible before the sync settles.
        assert_eq!(f.manager.items_count(), 3);

        f.manager.flush().await;
        assert!(f.manager.items().is_empty());
        assert_eq!(f.catalog.get(&p.id).unwrap().stock, 10);
        // The reverted (empty) cart was re-persisted.
        assert_eq!(
            f.snapshots.get(CART_SNAPSHOT_KEY).await.unwrap().unwrap(),
            "[]"
        );
    }

    #[tokio::test]
    async fn failed_increment_sync_restores_previous_quantity() {
        let f = setup(vec![product("prod_001", 299, 10)]).await;
        let id = ProductId::new("prod_001");
        let p = f.catalog.get(&id).unwrap();

        f.manager.add_to_cart(&p, 3).await.unwrap();
        f.manager.flush().await;

        f.products.set_fail_on_update_stock(true).await;
        f.manager.add_to_cart(&p, 5).await.unwrap();
        f.manager.flush().await;

        // The precise pre-mutation state is restored, not the whole item
        // removed.
        let items = f.manager.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].product.stock, 7);
        assert_eq!(f.catalog.get(&id).unwrap().stock, 7);
    }

    #[tokio::test]
    async fn remove_restores_stock() {
        let f = setup(vec![product("prod_001", 299, 10)]).await;
        let id = ProductId::new("prod_001");

        let p = f.catalog.get(&id).unwrap();
        f.manager.add_to_cart(&p, 3).await.unwrap();
        f.manager.flush().await;

        f.manager.remove_from_cart(&id).await.unwrap();
        f.manager.flush().await;

        assert!(f.manager.items().is_empty());
        assert_eq!(f.catalog.get(&id).unwrap().stock, 10);
        assert_eq!(f.products.stock_of(&id).await, Some(10));
    }

    #[tokio::test]
    async fn remove_nonexistent_is_a_noop() {
        let f = setup(vec![product("prod_001", 299, 10)]).await;

        f.manager
            .remove_from_cart(&ProductId::new("prod_404"))
            .await
            .unwrap();
        f.manager.flush().await;
        assert_eq!(f.products.update_stock_calls().await, 0);
    }

    #[tokio::test]
    async fn failed_remove_sync_reinstates_item() {
        let f = setup(vec![product("prod_001", 299, 10)]).await;
        let id = ProductId::new("prod_001");

        let p = f.catalog.get(&id).unwrap();
        f.manager.add_to_cart(&p, 3).await.unwrap();
        f.manager.flush().await;

        f.products.set_fail_on_update_stock(true).await;
        f.manager.remove_from_cart(&id).await.unwrap();
        f.manager.flush().await;

        let items = f.manager.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].product.stock, 7);
        assert_eq!(f.catalog.get(&id).unwrap().stock, 7);
    }

    #[tokio::test]
    async fn update_quantity_pushes_derived_stock() {
        let f = setup(vec![product("prod_001", 299, 10)]).await;
        let id = ProductId::new("prod_001");

        let p = f.catalog.get(&id).unwrap();
        f.manager.add_to_cart(&p, 3).await.unwrap();
        f.manager.flush().await;

        // 3 → 5: cached 7 - diff 2 = 5.
        f.manager.update_quantity(&id, 5).await.unwrap();
        f.manager.flush().await;
        assert_eq!(f.manager.items()[0].quantity, 5);
        assert_eq!(f.manager.items()[0].product.stock, 5);
        assert_eq!(f.products.stock_of(&id).await, Some(5));

        // 5 → 2: cached 5 + 3 = 8.
        f.manager.update_quantity(&id, 2).await.unwrap();
        f.manager.flush().await;
        assert_eq!(f.manager.items()[0].quantity, 2);
        assert_eq!(f.products.stock_of(&id).await, Some(8));
    }

    #[tokio::test]
    async fn update_quantity_rejects_more_than_cached_stock() {
        let f = setup(vec![product("prod_001", 299, 10)]).await;
        let id = ProductId::new("prod_001");

        let p = f.catalog.get(&id).unwrap();
        f.manager.add_to_cart(&p, 3).await.unwrap();
        f.manager.flush().await;

        // diff 8 > cached 7.
        let result = f.manager.update_quantity(&id, 11).await;
        assert!(matches!(result, Err(CartError::InsufficientStock { .. })));
        assert_eq!(f.manager.items()[0].quantity, 3);
    }

    #[tokio::test]
    async fn update_quantity_to_zero_removes() {
        let f = setup(vec![product("prod_001", 299, 10)]).await;
        let id = ProductId::new("prod_001");

        let p = f.catalog.get(&id).unwrap();
        f.manager.add_to_cart(&p, 3).await.unwrap();
        f.manager.update_quantity(&id, 0).await.unwrap();
        f.manager.flush().await;

        assert!(f.manager.items().is_empty());
        assert_eq!(f.products.stock_of(&id).await, Some(10));
    }

    #[tokio::test]
    async fn update_quantity_unknown_id_is_a_noop() {
        let f = setup(vec![product("prod_001", 299, 10)]).await;

        f.manager
            .update_quantity(&ProductId::new("prod_404"), 2)
            .await
            .unwrap();
        f.manager.flush().await;
        assert_eq!(f.products.update_stock_calls().await, 0);
    }

    #[tokio::test]
    async fn clear_cart_restores_every_item() {
        let f = setup(vec![product("prod_001", 299, 10), product("prod_002", 499, 6)]).await;

        let p1 = f.catalog.get(&ProductId::new("prod_001")).unwrap();
        let p2 = f.catalog.get(&ProductId::new("prod_002")).unwrap();
        f.manager.add_to_cart(&p1, 3).await.unwrap();
        f.manager.add_to_cart(&p2, 2).await.unwrap();
        f.manager.flush().await;

        f.manager.clear_cart().await.unwrap();
        f.manager.flush().await;

        assert_eq!(f.manager.items_count(), 0);
        assert!(!f.snapshots.has(CART_SNAPSHOT_KEY).await);
        assert_eq!(f.products.stock_of(&p1.id).await, Some(10));
        assert_eq!(f.products.stock_of(&p2.id).await, Some(6));
        assert_eq!(f.catalog.get(&p1.id).unwrap().stock, 10);
    }

    #[tokio::test]
    async fn failed_clear_restoration_returns_item_to_cart() {
        let f = setup(vec![product("prod_001", 299, 10)]).await;
        let id = ProductId::new("prod_001");

        let p = f.catalog.get(&id).unwrap();
        f.manager.add_to_cart(&p, 3).await.unwrap();
        f.manager.flush().await;

        f.products.set_fail_on_update_stock(true).await;
        f.manager.clear_cart().await.unwrap();
        f.manager.flush().await;

        let items = f.manager.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
    }

    #[tokio::test]
    async fn complete_order_keeps_reservation() {
        let f = setup(vec![product("prod_001", 299, 10)]).await;
        f.provider
            .sign_up("shopper@example.com", "hunter22", "Sam")
            .await
            .unwrap();

        let p = f.catalog.get(&ProductId::new("prod_001")).unwrap();
        f.manager.add_to_cart(&p, 3).await.unwrap();
        f.manager.flush().await;
        let calls_before = f.products.update_stock_calls().await;

        let order = f.manager.complete_order().await.unwrap();
        f.manager.flush().await;

        // Cart emptied, snapshot gone, and no stock restoration issued.
        assert_eq!(f.manager.items_count(), 0);
        assert!(!f.snapshots.has(CART_SNAPSHOT_KEY).await);
        assert_eq!(f.products.update_stock_calls().await, calls_before);
        assert_eq!(f.products.stock_of(&p.id).await, Some(7));

        assert_eq!(order.total.cents(), 897);
        assert_eq!(order.items.len(), 1);
        assert!(order.order_number.as_str().starts_with("ORD"));
        assert_eq!(f.orders.order_count().await, 1);
    }

    #[tokio::test]
    async fn complete_order_without_identity_skips_append_but_clears() {
        let f = setup(vec![product("prod_001", 299, 10)]).await;

        let p = f.catalog.get(&ProductId::new("prod_001")).unwrap();
        f.manager.add_to_cart(&p, 2).await.unwrap();
        f.manager.flush().await;

        f.manager.complete_order().await.unwrap();

        assert_eq!(f.manager.items_count(), 0);
        assert_eq!(f.orders.order_count().await, 0);
    }

    #[tokio::test]
    async fn complete_order_on_empty_cart_fails() {
        let f = setup(vec![product("prod_001", 299, 10)]).await;
        let result = f.manager.complete_order().await;
        assert!(matches!(result, Err(CartError::EmptyCart)));
    }

    #[tokio::test]
    async fn failed_order_append_leaves_cart_intact() {
        let f = setup(vec![product("prod_001", 299, 10)]).await;
        f.provider
            .sign_up("shopper@example.com", "hunter22", "Sam")
            .await
            .unwrap();

        let p = f.catalog.get(&ProductId::new("prod_001")).unwrap();
        f.manager.add_to_cart(&p, 2).await.unwrap();
        f.manager.flush().await;

        f.orders.set_fail_on_append(true).await;
        let result = f.manager.complete_order().await;
        assert!(matches!(result, Err(CartError::Store(_))));

        assert_eq!(f.manager.items_count(), 2);
        assert!(f.snapshots.has(CART_SNAPSHOT_KEY).await);
    }

    #[tokio::test]
    async fn snapshot_reload_reproduces_cart() {
        let f = setup(vec![product("prod_001", 299, 10), product("prod_002", 499, 6)]).await;

        let p1 = f.catalog.get(&ProductId::new("prod_001")).unwrap();
        let p2 = f.catalog.get(&ProductId::new("prod_002")).unwrap();
        f.manager.add_to_cart(&p1, 3).await.unwrap();
        f.manager.add_to_cart(&p2, 1).await.unwrap();
        f.manager.flush().await;
        let saved_items = f.manager.items();

        // A fresh manager over the same snapshot store (a new launch).
        let session = Session::new(f.provider.clone());
        let reloaded = CartManager::new(
            Arc::clone(&f.products),
            Arc::clone(&f.snapshots),
            Arc::clone(&f.orders),
            f.catalog.clone(),
            session,
        );
        reloaded.init().await;

        assert_eq!(reloaded.items(), saved_items);
    }

    #[tokio::test]
    async fn mutations_before_init_are_not_persisted() {
        let store = Arc::new(
            InMemoryProductStore::with_products(vec![product("prod_001", 299, 10)]).await,
        );
        let snapshots = Arc::new(InMemorySnapshotStore::new());
        // A snapshot from a previous run.
        snapshots
            .set(CART_SNAPSHOT_KEY, String::from("[]"))
            .await
            .unwrap();

        let catalog = ProductCatalog::new(Arc::clone(&store));
        catalog.load().await.unwrap();
        let session = Session::new(Arc::new(InMemoryIdentityProvider::new()));
        let manager = CartManager::new(
            Arc::clone(&store),
            Arc::clone(&snapshots),
            Arc::new(InMemoryOrderLog::new()),
            catalog.clone(),
            session,
        );

        // No init yet: the mutation applies locally but must not overwrite
        // the stored snapshot.
        let p = catalog.get(&ProductId::new("prod_001")).unwrap();
        manager.add_to_cart(&p, 1).await.unwrap();
        manager.flush().await;
        assert_eq!(
            snapshots.get(CART_SNAPSHOT_KEY).await.unwrap().unwrap(),
            "[]"
        );
    }
}
