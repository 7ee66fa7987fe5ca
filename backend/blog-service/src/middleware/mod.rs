/// Request authentication for the blog service
///
/// Route protection here is per-method (a GET on a path is public while the
/// POST on the same path requires auth), so the bearer check lives in the
/// `AuthUser` extractor rather than a scope-wide transform: handlers that
/// take an `AuthUser` argument are authenticated, the rest stay public.
pub mod permissions;

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;

/// The authenticated caller, recovered from a validated bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".to_string()))?;

    let token_data = auth_core::jwt::validate_token(token)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    let claims = token_data.claims;
    let id = auth_core::jwt::user_id_from_claims(&claims)
        .map_err(|_| AppError::Unauthorized("Invalid user ID".to_string()))?;

    Ok(AuthUser {
        id,
        username: claims.username,
        role: claims.role,
    })
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(Into::into))
    }
}
