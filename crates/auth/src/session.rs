//! Session facade over the identity provider.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::Result;
use crate::identity::Identity;
use crate::provider::IdentityProvider;

/// The client-side view of the signed-in identity.
///
/// Wraps a shared [`IdentityProvider`] and keeps a live subscription to its
/// identity feed, so `current()` is a cheap synchronous read. Clones share
/// the provider.
#[derive(Clone)]
pub struct Session {
    provider: Arc<dyn IdentityProvider>,
    current: watch::Receiver<Option<Identity>>,
}

impl Session {
    /// Creates a session over a provider.
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let current = provider.subscribe();
        Self { provider, current }
    }

    /// The identity as of the provider's last change, `None` when signed out.
    pub fn current(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    /// True when an identity is signed in.
    pub fn is_signed_in(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Subscribes to identity changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.provider.subscribe()
    }

    /// Creates an account and signs it in.
    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<Identity> {
        self.provider.sign_up(email, password, name).await
    }

    /// Signs in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        self.provider.sign_in(email, password).await
    }

    /// Signs out.
    pub async fn sign_out(&self) -> Result<()> {
        self.provider.sign_out().await
    }

    /// Re-sends the verification email.
    pub async fn send_verification_email(&self) -> Result<()> {
        self.provider.send_verification_email().await
    }

    /// Re-fetches the identity from the provider.
    pub async fn reload(&self) -> Result<Identity> {
        self.provider.reload().await
    }

    /// Signs in through the federated flow.
    pub async fn sign_in_federated(&self, email: &str, name: &str) -> Result<Identity> {
        self.provider.sign_in_federated(email, name).await
    }
}
