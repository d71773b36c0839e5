//! Integration tests for JWT authentication middleware

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{test, web, App, HttpResponse};
    use af_api::middleware::auth::{AuthContext, JwtAuth, RequireAuthority, SecurityRules};
    use af_core::services::token::{ManualClock, TokenService, TokenServiceConfig};
    use af_core::Principal;
    use chrono::{Duration, TimeZone, Utc};

    fn token_service() -> (Arc<TokenService>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc.timestamp_opt(1_700_000_000, 0).unwrap()));
        let service =
            TokenService::with_clock(TokenServiceConfig::default(), clock.clone()).unwrap();
        (Arc::new(service), clock)
    }

    fn issue(tokens: &TokenService, username: &str, authorities: &[&str]) -> String {
        let principal = Principal::new(
            username,
            authorities.iter().map(|a| a.to_string()).collect(),
        );
        tokens.issue(&principal).unwrap()
    }

    async fn whoami(auth: AuthContext) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({
            "username": auth.username,
            "authorities": auth.authorities,
        }))
    }

    async fn admin_only(auth: AuthContext) -> Result<HttpResponse, actix_web::Error> {
        auth.require_authority("ROLE_ADMIN")?;
        Ok(HttpResponse::Ok().body("admin content"))
    }

    #[actix_web::test]
    async fn test_middleware_requires_auth_header() {
        let (tokens, _) = token_service();
        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(tokens))
                .route("/secured", web::get().to(|| async {
                    HttpResponse::Ok().body("OK")
                })),
        )
        .await;

        let req = test::TestRequest::get().uri("/secured").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "UNAUTHORIZED");
    }

    #[actix_web::test]
    async fn test_middleware_rejects_invalid_token() {
        let (tokens, _) = token_service();
        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(tokens))
                .route("/secured", web::get().to(|| async {
                    HttpResponse::Ok().body("OK")
                })),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/secured")
            .insert_header(("Authorization", "Bearer invalid-token"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "TOKEN_INVALID");
    }

    #[actix_web::test]
    async fn test_valid_token_injects_auth_context() {
        let (tokens, _) = token_service();
        let token = issue(&tokens, "ana@example.com", &["ROLE_ADMIN", "users:write"]);
        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(tokens))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["username"], "ana@example.com");
        assert_eq!(
            body["authorities"],
            serde_json::json!(["ROLE_ADMIN", "users:write"])
        );
    }

    #[actix_web::test]
    async fn test_expired_token_is_rejected() {
        let (tokens, clock) = token_service();
        let token = issue(&tokens, "ana@example.com", &["ROLE_USER"]);
        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(tokens))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        clock.advance(Duration::seconds(3600));

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "TOKEN_EXPIRED");
    }

    #[actix_web::test]
    async fn test_token_from_another_key_is_rejected() {
        let (tokens, _) = token_service();
        let foreign = TokenService::new(TokenServiceConfig {
            secret_base64: "b3RoZXItc2VjcmV0LW9mLWF0LWxlYXN0LXRoaXJ0eS10d28tYnl0ZXM="
                .to_string(),
            ..TokenServiceConfig::default()
        })
        .unwrap();
        let token = issue(&foreign, "ana@example.com", &["ROLE_ADMIN"]);

        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(tokens))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_public_paths_skip_authentication() {
        let (tokens, _) = token_service();
        let rules = Arc::new(SecurityRules::new(["/open", "/docs/**"]));
        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::with_rules(tokens, rules))
                .route("/open", web::get().to(|| async { HttpResponse::Ok().body("open") }))
                .route(
                    "/docs/{page}",
                    web::get().to(|| async { HttpResponse::Ok().body("docs") }),
                )
                .route("/closed", web::get().to(|| async { HttpResponse::Ok().body("closed") })),
        )
        .await;

        for (uri, status) in [("/open", 200), ("/docs/intro", 200), ("/closed", 401)] {
            let req = test::TestRequest::get()
                .uri(uri)
                .insert_header(("Authorization", "Bearer garbage"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), status, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_require_authority_returns_forbidden() {
        let (tokens, _) = token_service();
        let user_token = issue(&tokens, "bob@example.com", &["ROLE_USER"]);
        let admin_token = issue(&tokens, "ana@example.com", &["ROLE_ADMIN"]);
        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(tokens))
                .route("/admin", web::get().to(admin_only)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/admin")
            .insert_header(("Authorization", format!("Bearer {}", user_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);

        let req = test::TestRequest::get()
            .uri("/admin")
            .insert_header(("Authorization", format!("Bearer {}", admin_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }

    #[actix_web::test]
    async fn test_auth_context_extractor_without_middleware() {
        let app = test::init_service(App::new().route("/whoami", web::get().to(whoami))).await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }
}
