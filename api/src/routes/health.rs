use actix_web::HttpResponse;
use af_shared::HealthResponse;

/// Health check endpoint handler
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy(
        "artefact-api",
        env!("CARGO_PKG_VERSION"),
    ))
}
