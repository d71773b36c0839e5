//! User entity as stored in the user directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directory record for a user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Directory identifier
    pub id: i64,

    /// E-mail address, unique, used as the username
    pub email: String,

    /// bcrypt hash of the password
    pub password_hash: String,

    /// Display name
    pub denomination: String,

    /// Free-form account type (e.g. "ADMIN", "CLIENT")
    pub user_type: String,

    /// Account status; only `Some(true)` counts as enabled
    pub status: Option<bool>,

    /// Roles and permissions granted to the account
    pub authorities: Vec<String>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates an enabled user
    pub fn new(
        id: i64,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        denomination: impl Into<String>,
        user_type: impl Into<String>,
        authorities: Vec<String>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            password_hash: password_hash.into(),
            denomination: denomination.into(),
            user_type: user_type.into(),
            status: Some(true),
            authorities,
            created_at: Utc::now(),
        }
    }

    /// Disables the account
    pub fn disable(&mut self) {
        self.status = Some(false);
    }
}
