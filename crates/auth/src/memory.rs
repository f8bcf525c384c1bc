//! In-memory identity provider for tests and demos.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::UserId;
use tokio::sync::{RwLock, watch};

use crate::error::{AuthError, Result};
use crate::identity::Identity;
use crate::provider::IdentityProvider;

/// Minimum password length enforced at sign-up.
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    password: String,
    identity: Identity,
}

#[derive(Debug, Default)]
struct ProviderState {
    accounts: HashMap<String, Account>,
}

/// In-memory identity provider.
///
/// A stand-in for the opaque external identity service, not a credential
/// store: passwords are kept in plain text and exist only for the lifetime
/// of the process. Verification is simulated with [`mark_verified`].
///
/// [`mark_verified`]: InMemoryIdentityProvider::mark_verified
#[derive(Debug, Clone)]
pub struct InMemoryIdentityProvider {
    state: Arc<RwLock<ProviderState>>,
    current: watch::Sender<Option<Identity>>,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentityProvider {
    /// Creates a provider with no accounts and nobody signed in.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(ProviderState::default())),
            current: watch::Sender::new(None),
        }
    }

    /// Marks an account's email verified, as the verification link would.
    ///
    /// The change becomes visible to the client after the next
    /// [`IdentityProvider::reload`], matching the real provider's behavior.
    pub async fn mark_verified(&self, email: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get_mut(email)
            .ok_or(AuthError::InvalidCredentials)?;
        account.identity.email_verified = true;
        Ok(())
    }

    fn validate_email(email: &str) -> Result<()> {
        let well_formed = email.contains('@') && !email.starts_with('@') && !email.ends_with('@');
        if well_formed {
            Ok(())
        } else {
            Err(AuthError::InvalidEmail {
                email: email.to_string(),
            })
        }
    }

    fn validate_password(password: &str) -> Result<()> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword {
                min_len: MIN_PASSWORD_LEN,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<Identity> {
        Self::validate_email(email)?;
        Self::validate_password(password)?;

        let mut state = self.state.write().await;
        if state.accounts.contains_key(email) {
            return Err(AuthError::EmailInUse {
                email: email.to_string(),
            });
        }

        let identity = Identity {
            uid: UserId::generate(),
            email: Some(email.to_string()),
            display_name: Some(name.to_string()),
            email_verified: false,
        };
        state.accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                identity: identity.clone(),
            },
        );

        tracing::info!(%identity.uid, "account created, verification email sent");
        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let state = self.state.read().await;
        let account = state
            .accounts
            .get(email)
            .ok_or(AuthError::InvalidCredentials)?;
        if account.password != password {
            return Err(AuthError::InvalidCredentials);
        }

        let identity = account.identity.clone();
        drop(state);

        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<()> {
        self.current.send_replace(None);
        Ok(())
    }

    async fn send_verification_email(&self) -> Result<()> {
        let current = self.current.borrow().clone();
        match current {
            Some(identity) => {
                tracing::info!(%identity.uid, "verification email re-sent");
                Ok(())
            }
            None => Err(AuthError::NotSignedIn),
        }
    }

    async fn reload(&self) -> Result<Identity> {
        let current = self.current.borrow().clone().ok_or(AuthError::NotSignedIn)?;
        let email = current.email.clone().ok_or(AuthError::NotSignedIn)?;

        let state = self.state.read().await;
        let identity = state
            .accounts
            .get(&email)
            .map(|account| account.identity.clone())
            .ok_or(AuthError::InvalidCredentials)?;
        drop(state);

        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_federated(&self, email: &str, name: &str) -> Result<Identity> {
        Self::validate_email(email)?;

        let mut state = self.state.write().await;
        let identity = match state.accounts.get(email) {
            Some(account) => account.identity.clone(),
            None => {
                let identity = Identity {
                    uid: UserId::generate(),
                    email: Some(email.to_string()),
                    display_name: Some(name.to_string()),
                    email_verified: true,
                };
                state.accounts.insert(
                    email.to_string(),
                    Account {
                        // Federated accounts have no local password.
                        password: String::new(),
                        identity: identity.clone(),
                    },
                );
                identity
            }
        };
        drop(state);

        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }
}
