//! Domain model for the grocery client.
//!
//! Pure types and functions with no I/O:
//! - [`Product`] as held in the product store and cached in cart items
//! - [`Money`] amounts in integer cents
//! - [`Cart`] and [`CartItem`] with their mutation and query helpers
//! - [`Order`] records built at checkout
//! - catalog search and tag filtering

pub mod cart;
pub mod money;
pub mod order;
pub mod product;
pub mod search;

pub use cart::{Cart, CartItem};
pub use money::Money;
pub use order::{Order, OrderLine, OrderStatus};
pub use product::Product;
pub use search::{filter_by_tags, search_products};
