//! Main authentication service implementation

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::{Principal, UserPrincipal};
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainResult, ValidationError};
use crate::repositories::UserRepository;
use crate::services::token::TokenService;

use super::password::verify_password;

/// Authentication service: credential login and bearer token resolution
pub struct AuthService<U>
where
    U: UserRepository,
{
    /// User directory
    user_repository: Arc<U>,
    /// Token service for JWT management
    token_service: Arc<TokenService>,
}

impl<U> AuthService<U>
where
    U: UserRepository,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Directory used to look up credentials
    /// * `token_service` - Service issuing the bearer tokens
    pub fn new(user_repository: Arc<U>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_repository,
            token_service,
        }
    }

    /// The token service shared with request filters
    pub fn token_service(&self) -> &Arc<TokenService> {
        &self.token_service
    }

    /// Authenticate an e-mail/password pair and issue a token
    ///
    /// This method:
    /// 1. Rejects empty inputs
    /// 2. Looks the user up by e-mail
    /// 3. Verifies the bcrypt password hash
    /// 4. Refuses disabled accounts
    /// 5. Issues a token carrying the user's authorities
    ///
    /// Unknown e-mail and wrong password both yield `AuthError::InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResponse> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "email".to_string(),
            }
            .into());
        }
        if password.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "password".to_string(),
            }
            .into());
        }

        let user = match self.user_repository.find_by_email(email).await? {
            Some(user) => user,
            None => {
                warn!("login rejected: unknown account");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = user.id, "login rejected: bad password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let principal = UserPrincipal::from(&user);
        if !principal.is_enabled() {
            warn!(user_id = user.id, "login rejected: account disabled");
            return Err(AuthError::AccountDisabled.into());
        }

        let token = self.token_service.issue(&principal.to_principal())?;
        info!(user_id = principal.id(), "login succeeded");

        Ok(AuthResponse::new(token, &principal))
    }

    /// Resolve a bearer token to the principal it was issued for
    ///
    /// Same resolution the request filter runs, see [`TokenService::authenticate`].
    pub fn authenticate_token(&self, token: &str) -> DomainResult<Principal> {
        self.token_service.authenticate(token)
    }
}
