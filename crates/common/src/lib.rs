//! Shared building blocks for the grocery client.
//!
//! This crate provides:
//! - Identifier newtypes used across the workspace
//! - [`StateCell`], the watch-backed shared state container

pub mod ids;
pub mod state;

pub use ids::{OrderId, OrderNumber, ProductId, UserId};
pub use state::StateCell;
