//! Auth error types.

use thiserror::Error;

/// Errors that can occur during identity operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email address is malformed.
    #[error("Invalid email address: {email}")]
    InvalidEmail { email: String },

    /// The password does not meet the provider's minimum length.
    #[error("Password too weak: must be at least {min_len} characters")]
    WeakPassword { min_len: usize },

    /// An account already exists for this email.
    #[error("Email already in use: {email}")]
    EmailInUse { email: String },

    /// Unknown email or wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The operation requires a signed-in identity.
    #[error("Not signed in")]
    NotSignedIn,

    /// The provider rejected the request.
    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// Result type for identity operations.
pub type Result<T> = std::result::Result<T, AuthError>;
