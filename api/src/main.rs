use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use af_api::{
    app::{self, AppState},
    config,
    middleware::auth::{JwtAuth, SecurityRules},
    telemetry,
};
use af_core::repositories::InMemoryUserRepository;
use af_core::services::auth::{hash_password, DEFAULT_COST};
use af_core::services::token::{TokenService, TokenServiceConfig};
use af_core::User;
use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};

/// Accounts available in the in-memory directory, seeded from
/// `DEMO_USER_EMAIL` / `DEMO_USER_PASSWORD` when both are set
fn seed_users() -> anyhow::Result<Vec<User>> {
    let (Ok(email), Ok(password)) = (
        std::env::var("DEMO_USER_EMAIL"),
        std::env::var("DEMO_USER_PASSWORD"),
    ) else {
        return Ok(Vec::new());
    };

    let hash = hash_password(&password, DEFAULT_COST)?;
    Ok(vec![User::new(
        1,
        email,
        hash,
        "Demo User",
        "ADMIN",
        vec!["ROLE_ADMIN".to_string(), "ROLE_USER".to_string()],
    )])
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = config::load().context("invalid configuration")?;
    let appender = telemetry::init(&config.logging)?;

    info!(environment = %config.environment, "Starting Artefact API Server");
    if config.uses_public_secret_in_production() {
        warn!("JWT_SECRET is not set; production tokens are signed with the built-in secret");
    } else if config.auth.jwt.is_using_default_secret() {
        info!("Using the built-in JWT secret");
    }

    let token_service = Arc::new(
        TokenService::new(TokenServiceConfig::from_jwt_config(&config.auth.jwt)?)
            .context("cannot build token service")?,
    );
    let rules = Arc::new(SecurityRules::from(&config.auth.security));
    let users = Arc::new(InMemoryUserRepository::with_users(seed_users()?));
    let state = web::Data::new(AppState::new(users, Arc::clone(&token_service)));

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(JwtAuth::with_rules(
                Arc::clone(&token_service),
                Arc::clone(&rules),
            ))
            .wrap(Logger::default())
            .configure(app::configure::<InMemoryUserRepository>)
            .default_service(web::route().to(app::not_found))
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    if let Some(appender) = appender {
        appender.stop();
    }
    Ok(())
}
