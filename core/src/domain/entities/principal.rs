//! Authenticated identities.

use serde::{Deserialize, Serialize};

use super::user::User;

/// An authenticated identity plus its authority strings.
///
/// Authorities keep their order and may repeat; neither carries meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub username: String,
    pub authorities: Vec<String>,
}

impl Principal {
    pub fn new(username: impl Into<String>, authorities: Vec<String>) -> Self {
        Self {
            username: username.into(),
            authorities,
        }
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

/// Adapter exposing a directory [`User`] as an authentication principal.
///
/// The e-mail address is the username. Only the `status` flag can disable an
/// account; expiry, locking and credential expiry are not modelled.
#[derive(Debug, Clone)]
pub struct UserPrincipal {
    id: i64,
    email: String,
    password_hash: String,
    denomination: String,
    user_type: String,
    enabled: bool,
    authorities: Vec<String>,
}

impl UserPrincipal {
    /// Builds the principal for one authentication event
    pub fn new(user: &User, authorities: Vec<String>) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            denomination: user.denomination.clone(),
            user_type: user.user_type.clone(),
            enabled: user.status == Some(true),
            authorities,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn denomination(&self) -> &str {
        &self.denomination
    }

    pub fn user_type(&self) -> &str {
        &self.user_type
    }

    pub fn authorities(&self) -> &[String] {
        &self.authorities
    }

    pub fn is_account_non_expired(&self) -> bool {
        true
    }

    pub fn is_account_non_locked(&self) -> bool {
        true
    }

    pub fn is_credentials_non_expired(&self) -> bool {
        true
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The subject and authorities that go into a token
    pub fn to_principal(&self) -> Principal {
        Principal::new(self.email.clone(), self.authorities.clone())
    }
}

impl From<&User> for UserPrincipal {
    fn from(user: &User) -> Self {
        UserPrincipal::new(user, user.authorities.clone())
    }
}
