//! Authentication response value object for API responses.

use serde::{Deserialize, Serialize};

use crate::domain::entities::UserPrincipal;

/// Prefix distinguishing roles from fine-grained permissions
pub const ROLE_PREFIX: &str = "ROLE_";

/// Public view of an authenticated user. Carries no credential material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub denomination: String,
    pub user_type: String,
}

impl From<&UserPrincipal> for UserDto {
    fn from(principal: &UserPrincipal) -> Self {
        Self {
            id: principal.id(),
            email: principal.username().to_string(),
            denomination: principal.denomination().to_string(),
            user_type: principal.user_type().to_string(),
        }
    }
}

/// Result of a successful login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    /// Signed bearer token
    pub token: String,

    /// The authenticated user
    pub user: UserDto,

    /// Authorities starting with `ROLE_`, in grant order
    pub roles: Vec<String>,

    /// All other authorities, in grant order
    pub permissions: Vec<String>,
}

impl AuthResponse {
    /// Creates an authentication response, splitting the principal's
    /// authorities into roles and permissions
    pub fn new(token: String, principal: &UserPrincipal) -> Self {
        let (roles, permissions): (Vec<String>, Vec<String>) = principal
            .authorities()
            .iter()
            .cloned()
            .partition(|a| a.starts_with(ROLE_PREFIX));

        Self {
            token,
            user: UserDto::from(principal),
            roles,
            permissions,
        }
    }
}
