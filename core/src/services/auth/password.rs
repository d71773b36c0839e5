//! Password hashing helpers over bcrypt

use crate::errors::DomainError;

/// bcrypt work factor used when no other is configured
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// Hashes a plain-text password
pub fn hash_password(password: &str, cost: u32) -> Result<String, DomainError> {
    bcrypt::hash(password, cost).map_err(|e| DomainError::Internal {
        message: format!("password hashing failed: {}", e),
    })
}

/// Checks a plain-text password against a stored bcrypt hash
///
/// # Errors
///
/// `DomainError::Internal` when the stored hash is not a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, DomainError> {
    bcrypt::verify(password, hash).map_err(|e| DomainError::Internal {
        message: format!("stored password hash is unusable: {}", e),
    })
}
