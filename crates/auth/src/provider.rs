//! Identity provider contract.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::Result;
use crate::identity::Identity;

/// The external identity service.
///
/// Implementations own the authoritative auth state and publish the current
/// identity (or its absence) through [`IdentityProvider::subscribe`] whenever
/// it changes (sign-in, sign-out, profile reloads).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates an account, sets the display name, and sends the verification
    /// email. The new identity is signed in but not yet verified.
    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<Identity>;

    /// Signs in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity>;

    /// Signs the current identity out.
    async fn sign_out(&self) -> Result<()>;

    /// Re-sends the verification email for the current identity.
    async fn send_verification_email(&self) -> Result<()>;

    /// Re-fetches the current identity from the provider (e.g. to observe a
    /// verification completed out-of-band).
    async fn reload(&self) -> Result<Identity>;

    /// Signs in through the federated provider flow. Federated identities
    /// arrive with a verified email.
    async fn sign_in_federated(&self, email: &str, name: &str) -> Result<Identity>;

    /// Subscribes to identity changes. The receiver observes the current
    /// value immediately and every change afterwards.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}
