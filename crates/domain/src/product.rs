//! Product documents.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A product as stored in the product store.
///
/// Copies of this struct are cached inside cart items; the `stock` field on a
/// cached copy reflects the value at the last successful reservation, not
/// necessarily the store's current value. Field names are camelCase on the
/// wire to match the existing document schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// External document id, unique.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Long-form description, searched alongside the name.
    pub description: String,

    /// Unit price. Never negative.
    pub price: Money,

    /// Image reference (URL).
    pub image_url: String,

    /// Units available. The reservation workflow decrements this.
    pub stock: u32,

    /// Optional category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Optional filter tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Product {
    /// True when at least one unit is available.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Returns a copy of this product with a different stock value.
    pub fn with_stock(&self, stock: u32) -> Product {
        Product {
            stock,
            ..self.clone()
        }
    }
}
