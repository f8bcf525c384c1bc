//! Cart contents.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::product::Product;

/// A product in the cart together with the quantity reserved.
///
/// The embedded product is a snapshot; its `stock` field is the cached
/// remaining stock as of the last successful reservation against this item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Creates a cart item. Quantity is assumed validated by the caller.
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// Price of this line: unit price times quantity.
    pub fn line_total(&self) -> Money {
        self.product.price.times(self.quantity)
    }
}

/// The cart: an ordered collection of items, at most one per product id.
///
/// Insertion order is preserved because it is the order the user sees.
/// Serializes as a plain array of items, the snapshot blob format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cart from existing items (snapshot load).
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// All items, in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the cart holds nothing.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up an item by product id.
    pub fn get(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.product.id == product_id)
    }

    /// Quantity currently in the cart for a product, 0 when absent.
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.get(product_id).map_or(0, |item| item.quantity)
    }

    /// Cached stock for a product, if it is in the cart.
    pub fn cached_stock(&self, product_id: &ProductId) -> Option<u32> {
        self.get(product_id).map(|item| item.product.stock)
    }

    /// Adds a product, incrementing the quantity when it is already present.
    ///
    /// The passed product carries the new cached stock value; for an existing
    /// item the cached snapshot is refreshed from it.
    pub fn insert_or_increment(&mut self, product: Product, quantity: u32) {
        match self.items.iter_mut().find(|item| item.product.id == product.id) {
            Some(item) => {
                item.quantity += quantity;
                item.product = product;
            }
            None => self.items.push(CartItem::new(product, quantity)),
        }
    }

    /// Restores a previously removed item to its original state.
    pub fn restore(&mut self, item: CartItem) {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.product.id == item.product.id)
        {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Sets the quantity for an existing item. Returns false when absent.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        match self.items.iter_mut().find(|item| &item.product.id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Updates the cached stock on an item. Returns false when absent.
    pub fn set_cached_stock(&mut self, product_id: &ProductId, stock: u32) -> bool {
        match self.items.iter_mut().find(|item| &item.product.id == product_id) {
            Some(item) => {
                item.product.stock = stock;
                true
            }
            None => false,
        }
    }

    /// Removes an item, returning it when present.
    pub fn remove(&mut self, product_id: &ProductId) -> Option<CartItem> {
        let index = self
            .items
            .iter()
            .position(|item| &item.product.id == product_id)?;
        Some(self.items.remove(index))
    }

    /// Empties the cart, returning the removed items.
    pub fn clear(&mut self) -> Vec<CartItem> {
        std::mem::take(&mut self.items)
    }

    /// Sum of `unit price × quantity` over all items.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities over all items.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}
