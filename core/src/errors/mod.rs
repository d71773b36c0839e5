//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A business rule was violated; the message is safe to show to clients.
    #[error("Business rule violation: {message}")]
    BusinessRule { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    /// Shorthand for a business rule violation
    pub fn business(message: impl Into<String>) -> Self {
        DomainError::BusinessRule {
            message: message.into(),
        }
    }

    /// Whether this error means "the caller is not (properly) authenticated"
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            DomainError::Unauthorized
                | DomainError::Token(_)
                | DomainError::Auth(AuthError::InvalidCredentials)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
