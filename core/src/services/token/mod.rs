//! Token service module for JWT management
//!
//! This module handles all token-related operations:
//! - HMAC signing key decoding (once, at construction)
//! - Token issuance for an authenticated principal
//! - Validation against a claimed identity and expiry
//! - Subject and authority extraction

mod clock;
mod config;
mod service;
mod signing_key;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::TokenServiceConfig;
pub use service::TokenService;
pub use signing_key::{SigningKey, MIN_KEY_BYTES};
