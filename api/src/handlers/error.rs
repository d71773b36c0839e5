use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use af_core::errors::{AuthError, DomainError, TokenError, ValidationError};
use af_shared::{error_codes, ErrorResponse};
use std::fmt;

/// HTTP-facing error: a status code plus the JSON body sent to the client
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse::new(error, message),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error_codes::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, error_codes::FORBIDDEN, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ErrorResponse {
        &self.body
    }

    pub fn with_body(status: StatusCode, body: ErrorResponse) -> Self {
        Self { status, body }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.body.error, self.body.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(&self.body)
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        let (status, code, message) = classify(&error);
        Self::new(status, code, message)
    }
}

/// Status, error code and client-safe message for a domain error
fn classify(error: &DomainError) -> (StatusCode, &'static str, String) {
    match error {
        DomainError::Token(TokenError::TokenExpired) => (
            StatusCode::UNAUTHORIZED,
            error_codes::TOKEN_EXPIRED,
            "Token has expired".to_string(),
        ),
        DomainError::Token(TokenError::TokenGenerationFailed)
        | DomainError::Token(TokenError::InvalidSigningKey { .. }) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "An internal error occurred".to_string(),
        ),
        DomainError::Token(_) => (
            StatusCode::UNAUTHORIZED,
            error_codes::TOKEN_INVALID,
            "Invalid token".to_string(),
        ),
        DomainError::Auth(AuthError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            error_codes::INVALID_CREDENTIALS,
            "Invalid email or password".to_string(),
        ),
        DomainError::Auth(AuthError::UserNotFound) | DomainError::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            error_codes::UNAUTHORIZED,
            "Authentication required".to_string(),
        ),
        DomainError::Auth(AuthError::AccountDisabled) => (
            StatusCode::FORBIDDEN,
            error_codes::ACCOUNT_DISABLED,
            "Account is disabled".to_string(),
        ),
        DomainError::Auth(AuthError::InsufficientPermissions { authority }) => (
            StatusCode::FORBIDDEN,
            error_codes::FORBIDDEN,
            format!("Missing authority: {}", authority),
        ),
        DomainError::ValidationErr(validation) => (
            StatusCode::BAD_REQUEST,
            error_codes::VALIDATION_ERROR,
            match validation {
                ValidationError::RequiredField { field } => format!("{} is required", field),
                ValidationError::InvalidFormat { field } => format!("{} has an invalid format", field),
                ValidationError::InvalidEmail => "Invalid email address".to_string(),
            },
        ),
        DomainError::Validation { message } => (
            StatusCode::BAD_REQUEST,
            error_codes::VALIDATION_ERROR,
            message.clone(),
        ),
        DomainError::BusinessRule { message } => (
            StatusCode::BAD_REQUEST,
            error_codes::BUSINESS_RULE,
            message.clone(),
        ),
        DomainError::NotFound { resource } => (
            StatusCode::NOT_FOUND,
            error_codes::NOT_FOUND,
            format!("{} not found", resource),
        ),
        DomainError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "An internal error occurred".to_string(),
        ),
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    if error.is_authentication_failure() {
        log::warn!("Authentication failure: {}", error);
    } else {
        log::error!("Domain Error: {:?}", error);
    }
    ApiError::from(error).error_response()
}
