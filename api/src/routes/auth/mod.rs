//! Authentication route handlers
//!
//! - Credential login issuing a bearer token
//! - The authenticated caller's identity

pub mod login;
pub mod me;
