use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use af_core::repositories::UserRepository;
use af_shared::{error_codes, ErrorResponse};
use validator::Validate;

use crate::app::AppState;
use crate::dto::auth::LoginRequest;
use crate::handlers::error::{handle_domain_error, ApiError};

/// Handler for POST /api/login
///
/// # Request Body
///
/// ```json
/// {
///     "email": "ana@example.com",
///     "password": "secret"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "token": "eyJhbGciOiJIUzI1NiJ9...",
///     "user": { "id": 1, "email": "ana@example.com", "denomination": "Ana", "user_type": "ADMIN" },
///     "roles": ["ROLE_ADMIN"],
///     "permissions": ["users:write"]
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed email or empty password
/// - 401 Unauthorized: Unknown email or wrong password
/// - 403 Forbidden: Account disabled
pub async fn login<U>(
    state: web::Data<AppState<U>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    if let Err(validation_errors) = request.validate() {
        let mut body = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid login request");
        for (field, errors) in validation_errors.field_errors() {
            let messages: Vec<String> = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            body = body.add_detail(field.to_string(), messages);
        }
        log::warn!("Validation failed for login request");
        return ApiError::with_body(StatusCode::BAD_REQUEST, body).error_response();
    }

    let LoginRequest { email, password } = request.into_inner();
    match state.auth_service.login(&email, &password).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => handle_domain_error(error),
    }
}
