//! JWT authentication middleware for protecting API endpoints.
//!
//! This middleware lets requests to public paths through untouched. Every
//! other request must carry `Authorization: Bearer <token>`; the token is
//! resolved to an `AuthContext` that is injected into the request extensions.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use af_core::{
    errors::{AuthError, DomainError},
    services::token::TokenService,
    Principal,
};
use af_shared::config::SecurityConfig;
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use crate::handlers::error::ApiError;

/// Authenticated caller injected into requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Subject of the bearer token
    pub username: String,
    /// Authorities carried by the token, in token order
    pub authorities: Vec<String>,
}

impl From<Principal> for AuthContext {
    fn from(principal: Principal) -> Self {
        Self {
            username: principal.username,
            authorities: principal.authorities,
        }
    }
}

/// Authority checks for handlers
pub trait RequireAuthority {
    fn has_authority(&self, authority: &str) -> bool;

    /// `Err` with a 403 response when the authority is missing
    fn require_authority(&self, authority: &str) -> Result<(), ApiError>;
}

impl RequireAuthority for AuthContext {
    fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    fn require_authority(&self, authority: &str) -> Result<(), ApiError> {
        if self.has_authority(authority) {
            Ok(())
        } else {
            log::warn!("{} lacks authority {}", self.username, authority);
            Err(ApiError::from(DomainError::Auth(
                AuthError::InsufficientPermissions {
                    authority: authority.to_string(),
                },
            )))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathRule {
    Exact(String),
    /// `/base/**`: the base itself and everything below it
    Prefix(String),
}

impl PathRule {
    fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix("/**") {
            Some(base) => PathRule::Prefix(base.to_string()),
            None => PathRule::Exact(pattern.to_string()),
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            PathRule::Exact(exact) => path == exact,
            PathRule::Prefix(base) => {
                path == base
                    || path
                        .strip_prefix(base.as_str())
                        .map_or(false, |rest| rest.starts_with('/'))
            }
        }
    }
}

/// Paths reachable without a bearer token
#[derive(Debug, Clone)]
pub struct SecurityRules {
    public: Vec<PathRule>,
}

impl SecurityRules {
    pub fn new<I, P>(public_paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        Self {
            public: public_paths
                .into_iter()
                .map(|p| PathRule::parse(p.as_ref()))
                .collect(),
        }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public.iter().any(|rule| rule.matches(path))
    }
}

impl Default for SecurityRules {
    fn default() -> Self {
        Self::from(&SecurityConfig::default())
    }
}

impl From<&SecurityConfig> for SecurityRules {
    fn from(config: &SecurityConfig) -> Self {
        Self::new(&config.public_paths)
    }
}

/// JWT authentication middleware factory
pub struct JwtAuth {
    token_service: Arc<TokenService>,
    rules: Arc<SecurityRules>,
}

impl JwtAuth {
    /// Creates a new JWT authentication middleware with the default public paths
    pub fn new(token_service: Arc<TokenService>) -> Self {
        Self::with_rules(token_service, Arc::new(SecurityRules::default()))
    }

    pub fn with_rules(token_service: Arc<TokenService>, rules: Arc<SecurityRules>) -> Self {
        Self {
            token_service,
            rules,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            token_service: Arc::clone(&self.token_service),
            rules: Arc::clone(&self.rules),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    token_service: Arc<TokenService>,
    rules: Arc<SecurityRules>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        if self.rules.is_public(req.path()) {
            return Box::pin(async move {
                service
                    .call(req)
                    .await
                    .map(|res| res.map_into_left_body())
            });
        }

        let outcome = match extract_bearer_token(&req) {
            Some(token) => self
                .token_service
                .authenticate(&token)
                .map(AuthContext::from)
                .map_err(ApiError::from),
            None => Err(ApiError::unauthorized(
                "Missing or invalid Authorization header",
            )),
        };

        Box::pin(async move {
            match outcome {
                Ok(context) => {
                    req.extensions_mut().insert(context);
                    service
                        .call(req)
                        .await
                        .map(|res| res.map_into_left_body())
                }
                Err(error) => {
                    log::warn!("Rejected {} {}: {}", req.method(), req.path(), error);
                    let response = error.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Extracts Bearer token from Authorization header
pub fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|s| s.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"));

        ready(result)
    }
}
