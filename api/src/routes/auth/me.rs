use actix_web::HttpResponse;
use af_shared::ApiResponse;

use crate::dto::auth::MeResponse;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/me
///
/// Requires a bearer token; echoes the principal it resolved to.
pub async fn me(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(MeResponse {
        username: auth.username,
        authorities: auth.authorities,
    }))
}
