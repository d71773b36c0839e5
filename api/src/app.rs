//! Application state and route table
//!
//! `configure` registers every route; the caller wraps the `App` with
//! `JwtAuth` (and access logging) so public and protected routes share one
//! filter.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use af_core::repositories::UserRepository;
use af_core::services::auth::AuthService;
use af_core::services::token::TokenService;
use af_shared::{error_codes, ErrorResponse};

use crate::routes::auth::{login::login, me::me};
use crate::routes::health::health_check;

/// Application state that holds shared services
pub struct AppState<U>
where
    U: UserRepository,
{
    pub auth_service: Arc<AuthService<U>>,
}

impl<U> AppState<U>
where
    U: UserRepository,
{
    pub fn new(user_repository: Arc<U>, token_service: Arc<TokenService>) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(user_repository, token_service)),
        }
    }
}

/// Register all routes
pub fn configure<U>(cfg: &mut web::ServiceConfig)
where
    U: UserRepository + 'static,
{
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api")
            .route("/login", web::post().to(login::<U>))
            .route("/me", web::get().to(me)),
    );
}

/// Default 404 handler
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
