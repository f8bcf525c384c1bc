//! The signed-in identity.

use common::UserId;
use serde::{Deserialize, Serialize};

/// A signed-in identity as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Provider-assigned uid.
    pub uid: UserId,

    /// Account email. Federated identities may not expose one.
    pub email: Option<String>,

    /// Display name, set at sign-up or by the federated provider.
    pub display_name: Option<String>,

    /// Whether the email address has been verified.
    pub email_verified: bool,
}
