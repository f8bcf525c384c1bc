//! Store contracts and implementations for the grocery client.
//!
//! Three external resources back the client (see the manager crates for how
//! they are used):
//! - [`ProductStore`]: the remote product catalog, read by id or in bulk,
//!   with field-level stock updates. No transactions; last write wins.
//! - [`SnapshotStore`]: local persistent key/value storage for cart and
//!   favorites snapshots.
//! - [`OrderLog`]: append-only order records keyed by identity uid.
//!
//! Each contract has an in-memory implementation (tests, failure injection),
//! and the remote ones have PostgreSQL-backed implementations storing JSONB
//! documents. The snapshot store additionally has a file-backed
//! implementation for on-device persistence.

pub mod error;
pub mod file;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{Result, StorageError};
pub use file::FileSnapshotStore;
pub use memory::{InMemoryOrderLog, InMemoryProductStore, InMemorySnapshotStore};
pub use postgres::{PostgresOrderLog, PostgresProductStore};
pub use store::{OrderLog, ProductStore, SnapshotStore};
