//! Main token service implementation

use std::sync::Arc;

use af_shared::config::MAX_TOKEN_TTL_SECONDS;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Header, Validation};
use tracing::debug;

use crate::domain::entities::{Claims, Principal};
use crate::errors::{DomainError, DomainResult, TokenError, ValidationError};

use super::clock::{Clock, SystemClock};
use super::config::TokenServiceConfig;
use super::signing_key::SigningKey;

/// Issues and checks signed bearer tokens.
///
/// The service is stateless apart from its signing key and clock, both fixed
/// at construction, so a single instance can be shared across threads.
#[derive(Clone)]
pub struct TokenService {
    key: SigningKey,
    ttl_seconds: i64,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("key", &self.key)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenService {
    /// Creates a new token service using the wall clock
    ///
    /// # Arguments
    ///
    /// * `config` - Token service configuration
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or `TokenError::InvalidSigningKey` if the secret is unusable
    pub fn new(config: TokenServiceConfig) -> Result<Self, DomainError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a new token service with an explicit time source
    pub fn with_clock(config: TokenServiceConfig, clock: Arc<dyn Clock>) -> Result<Self, DomainError> {
        if config.ttl_seconds <= 0 || config.ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(DomainError::Validation {
                message: format!(
                    "token ttl must be between 1 and {} seconds, got {}",
                    MAX_TOKEN_TTL_SECONDS, config.ttl_seconds
                ),
            });
        }

        let key = SigningKey::from_base64(&config.secret_base64, config.algorithm)?;

        // Expiry is judged against our own clock in `validate`, not by the library.
        let mut validation = Validation::new(key.algorithm());
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            key,
            ttl_seconds: config.ttl_seconds,
            validation,
            clock,
        })
    }

    /// Issues a signed token for `principal`
    ///
    /// The token carries `sub` = username, `iat` = now, `exp` = now + ttl and the
    /// principal's authorities in order. Identical input at the same second yields
    /// the identical token.
    ///
    /// # Errors
    ///
    /// * `ValidationError::RequiredField` - empty username
    /// * `TokenError::TokenGenerationFailed` - expiry out of range or encoding failed
    pub fn issue(&self, principal: &Principal) -> DomainResult<String> {
        if principal.username.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "username".to_string(),
            }
            .into());
        }

        let issued_at = self.clock.now().timestamp();
        let claims = Claims::new(
            principal.username.clone(),
            &principal.authorities,
            issued_at,
            self.ttl_seconds,
        )
        .ok_or(TokenError::TokenGenerationFailed)?;
        let token = self.encode_jwt(&claims)?;

        debug!(
            subject = %claims.sub,
            authorities = principal.authorities.len(),
            expires_at = claims.exp,
            "token issued"
        );
        Ok(token)
    }

    /// Whether `token` is a currently valid token for `username`.
    ///
    /// Never fails: malformed tokens, bad signatures, expiry and identity
    /// mismatch all come back as `false`.
    pub fn is_valid(&self, token: &str, username: &str) -> bool {
        match self.validate(token, username) {
            Ok(_) => true,
            Err(error) => {
                debug!(reason = %error, "token rejected");
                false
            }
        }
    }

    /// Same checks as [`is_valid`](Self::is_valid), keeping the reason on failure
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidTokenFormat` / `InvalidSignature` - token cannot be trusted
    /// * `TokenError::IdentityMismatch` - subject differs from `username`
    /// * `TokenError::TokenExpired` - `exp` is not strictly after now
    pub fn validate(&self, token: &str, username: &str) -> DomainResult<Claims> {
        let claims = self.extract_all_claims(token)?;

        if claims.sub != username {
            return Err(TokenError::IdentityMismatch.into());
        }
        if self.is_expired(&claims) {
            return Err(TokenError::TokenExpired.into());
        }
        Ok(claims)
    }

    /// Resolves a bearer token to the principal it was issued for
    ///
    /// The subject is read from the signed token, the token is validated
    /// against that subject and the service clock, and the authorities come
    /// from the same claims.
    ///
    /// # Errors
    ///
    /// Any `TokenError` raised while decoding or validating the token.
    pub fn authenticate(&self, token: &str) -> DomainResult<Principal> {
        let username = self.extract_username(token)?;
        let claims = self.validate(token, &username)?;
        Ok(Principal::new(username, claims.authority_list()))
    }

    /// Returns the subject of a correctly signed token
    ///
    /// # Errors
    ///
    /// Propagates `InvalidTokenFormat` / `InvalidSignature`.
    pub fn extract_username(&self, token: &str) -> DomainResult<String> {
        self.extract_all_claims(token).map(|claims| claims.sub)
    }

    /// Returns the authorities of a correctly signed token, in issue order
    ///
    /// A missing or non-array `authorities` claim gives an empty list.
    ///
    /// # Errors
    ///
    /// Propagates `InvalidTokenFormat` / `InvalidSignature`.
    pub fn extract_authorities(&self, token: &str) -> DomainResult<Vec<String>> {
        self.extract_all_claims(token).map(|claims| claims.authority_list())
    }

    /// Verifies the signature and decodes the payload
    pub fn extract_all_claims(&self, token: &str) -> DomainResult<Claims> {
        decode::<Claims>(token, self.key.decoding_key(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => DomainError::Token(TokenError::InvalidSignature),
                ErrorKind::MissingRequiredClaim(claim) => {
                    DomainError::Token(TokenError::MissingClaim {
                        claim: claim.clone(),
                    })
                }
                _ => DomainError::Token(TokenError::InvalidTokenFormat),
            })
    }

    /// Whether `claims` are expired according to the service clock
    pub fn is_expired(&self, claims: &Claims) -> bool {
        claims.is_expired_at(self.clock.now().timestamp())
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> DomainResult<String> {
        let header = Header::new(self.key.algorithm());
        encode(&header, claims, self.key.encoding_key())
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }
}
