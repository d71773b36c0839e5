//! HMAC key material for JWT signing and verification

use base64::{engine::general_purpose::STANDARD, Engine as _};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

use crate::errors::{DomainError, TokenError};

/// Smallest accepted HMAC key, in bytes (256 bits)
pub const MIN_KEY_BYTES: usize = 32;

/// Symmetric signing key, decoded once and never mutated afterwards
#[derive(Clone)]
pub struct SigningKey {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    key_len: usize,
}

// Key bytes stay out of Debug output.
impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .field("key_len", &self.key_len)
            .finish()
    }
}

impl SigningKey {
    /// Decodes a base64 secret into an HMAC key
    ///
    /// # Errors
    ///
    /// `TokenError::InvalidSigningKey` when the algorithm is not HS256/384/512,
    /// the secret is not base64, or it decodes to fewer than [`MIN_KEY_BYTES`].
    pub fn from_base64(secret_base64: &str, algorithm: Algorithm) -> Result<Self, DomainError> {
        let bytes = STANDARD.decode(secret_base64.trim()).map_err(|e| {
            DomainError::Token(TokenError::InvalidSigningKey {
                reason: format!("secret is not valid base64: {}", e),
            })
        })?;
        Self::from_bytes(&bytes, algorithm)
    }

    /// Wraps raw key bytes
    pub fn from_bytes(bytes: &[u8], algorithm: Algorithm) -> Result<Self, DomainError> {
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(DomainError::Token(TokenError::InvalidSigningKey {
                reason: format!("{:?} is not an HMAC algorithm", algorithm),
            }));
        }
        if bytes.len() < MIN_KEY_BYTES {
            return Err(DomainError::Token(TokenError::InvalidSigningKey {
                reason: format!(
                    "key is {} bits, at least {} required",
                    bytes.len() * 8,
                    MIN_KEY_BYTES * 8
                ),
            }));
        }

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            key_len: bytes.len(),
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}
