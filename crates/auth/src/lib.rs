//! Identity service contract and session state.
//!
//! The identity provider is an opaque external service; this crate defines
//! the [`IdentityProvider`] contract, an in-memory implementation for tests
//! and demos, and [`Session`], the shared current-identity facade the rest
//! of the client reads.

pub mod error;
pub mod identity;
pub mod memory;
pub mod provider;
pub mod session;

pub use error::{AuthError, Result};
pub use identity::Identity;
pub use memory::InMemoryIdentityProvider;
pub use provider::IdentityProvider;
pub use session::Session;
