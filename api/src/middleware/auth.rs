//! JWT authentication middleware for the browser side of the pairing flow.
//!
//! This middleware extracts the session token from the Authorization header,
//! verifies it with the configured HS256 secret, and injects an
//! [`AuthContext`] into the request. Requests without a valid session are
//! answered with a localized 401 before reaching the handler.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};
use uuid::Uuid;

use dp_core::domain::entities::session::SessionClaims;
use dp_shared::config::JwtConfig;

use crate::handlers::error::{language_from_request, unauthorized_response};

/// Browser session identity injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID taken from the `sub` claim
    pub user_id: Uuid,
    /// Session expiry (epoch seconds)
    pub expires_at: i64,
}

impl AuthContext {
    /// Creates a new authentication context from session claims
    pub fn from_claims(claims: SessionClaims) -> Result<Self, String> {
        let user_id = claims
            .user_id()
            .map_err(|e| format!("Invalid subject claim: {}", e))?;
        Ok(Self {
            user_id,
            expires_at: claims.exp,
        })
    }
}

/// JWT authentication middleware factory
pub struct JwtAuth {
    config: Rc<JwtConfig>,
}

impl JwtAuth {
    /// Creates a new JWT authentication middleware
    pub fn new(config: JwtConfig) -> Self {
        Self {
            config: Rc::new(config),
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
            config: Rc::clone(&self.config),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    config: Rc<JwtConfig>,
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
        let config = Rc::clone(&self.config);

        Box::pin(async move {
            let verified = match extract_bearer_token(&req) {
                Some(token) => verify_session_token(&token, &config),
                None => Err("Missing or invalid Authorization header".to_string()),
            };

            match verified {
                Ok(auth_context) => {
                    req.extensions_mut().insert(auth_context);
                    let response = service.call(req).await?;
                    Ok(response.map_into_left_body())
                }
                Err(reason) => {
                    log::warn!("Rejected session on {}: {}", req.path(), reason);
                    let lang = language_from_request(req.request());
                    let response = req.into_response(unauthorized_response(lang));
                    Ok(response.map_into_right_body())
                }
            }
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Verify an HS256 session token and build the request context
pub fn verify_session_token(token: &str, config: &JwtConfig) -> Result<AuthContext, String> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = config.leeway;
    if let Some(issuer) = &config.issuer {
        validation.set_issuer(&[issuer.as_str()]);
    }

    let token_data = decode::<SessionClaims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Token decode error: {}", e))?;

    AuthContext::from_claims(token_data.claims)
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}
