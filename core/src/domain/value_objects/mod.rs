//! Value objects returned by domain services.

pub mod auth_response;

pub use auth_response::{AuthResponse, UserDto, ROLE_PREFIX};
