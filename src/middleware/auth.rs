//! Access control: bearer-token extractors for protected and admin-only routes.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::auth::{Claims, TokenService};
use crate::error::AppError;

const BEARER_PREFIX: &str = "Bearer ";

/// Token string from `Authorization: Bearer <token>`.
/// Absent or not bearer-prefixed is `Unauthorized`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| AppError::Unauthorized("Token not provided".to_string()))
}

/// Missing token is 401; a present but unverifiable token is 403.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<Claims, AppError> {
    let token = bearer_token(headers)?;
    tokens.verify(token).map_err(|e| {
        debug!(reason = %e, "rejected token");
        AppError::Forbidden("Invalid token".to_string())
    })
}

pub fn require_admin(claims: Claims) -> Result<Claims, AppError> {
    if !claims.role.is_admin() {
        debug!(user_id = claims.id, "admin route denied");
        return Err(AppError::Forbidden("Insufficient privileges".to_string()));
    }
    Ok(claims)
}

/// Extractor: claims of the caller, from a verified bearer token.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Claims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = TokenService::from_ref(state);
        authenticate(&parts.headers, &tokens).map(AuthUser)
    }
}

/// Extractor: like [`AuthUser`] but the caller must hold the admin role.
#[derive(Clone, Debug)]
pub struct AdminUser(pub Claims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        require_admin(claims).map(AdminUser)
    }
}
