//! # Artefact Core
//!
//! Core domain layer for the Artefact backend.
//! This crate contains the bearer token service, the authenticated principal
//! model, the user directory interface and the login use case.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{AuthResponse, Claims, Principal, User, UserDto, UserPrincipal};
pub use errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
pub use repositories::{InMemoryUserRepository, UserRepository};
pub use services::{AuthService, Clock, SystemClock, TokenService, TokenServiceConfig};
