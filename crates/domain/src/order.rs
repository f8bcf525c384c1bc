//! Order records built at checkout.

use chrono::{DateTime, Utc};
use common::{OrderId, OrderNumber, ProductId};
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::money::Money;

/// Order lifecycle status.
///
/// New orders start as `Processing`; the fulfillment side moves them on.
/// Lowercase on the wire to match the existing order documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    #[default]
    Processing,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Returns the status name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of an order: the purchased product at the price paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub price: Money,
}

impl OrderLine {
    /// Builds a line from a cart item, snapshotting name and unit price.
    pub fn from_cart_item(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id.clone(),
            product_name: item.product.name.clone(),
            quantity: item.quantity,
            price: item.product.price,
        }
    }

    /// Price of this line: unit price times quantity.
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

/// An order as appended to the order log. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: OrderNumber,
    pub items: Vec<OrderLine>,
    pub total: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Builds an order from cart items at the given submission time.
    ///
    /// The total is computed from the lines, not taken on trust.
    pub fn from_cart_items(items: &[CartItem], created_at: DateTime<Utc>) -> Self {
        let lines: Vec<OrderLine> = items.iter().map(OrderLine::from_cart_item).collect();
        let total = lines.iter().map(OrderLine::line_total).sum();

        Self {
            id: OrderId::new(),
            order_number: OrderNumber::generate(created_at),
            items: lines,
            total,
            status: OrderStatus::default(),
            created_at,
        }
    }
}
