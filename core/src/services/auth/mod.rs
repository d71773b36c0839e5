//! Authentication service module
//!
//! - Credential login producing a signed bearer token
//! - Bearer token resolution for request filters
//! - bcrypt password helpers

mod password;
mod service;

#[cfg(test)]
mod tests;

pub use password::{hash_password, verify_password, DEFAULT_COST};
pub use service::AuthService;
