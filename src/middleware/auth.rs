use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::response::{Envelope, RequestMeta};
use crate::auth::{validate_jwt, AuthError, Claims};
use crate::config;
use crate::database::models::User;
use crate::error::ApiError;

/// Authenticated user context extracted from the JWT
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub user_type: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.user_type == User::ADMIN
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            user_type: claims.user_type,
        }
    }
}

/// Portal gate: any valid bearer token
pub async fn require_auth(meta: RequestMeta, mut request: Request, next: Next) -> Response {
    let secret = &config::config().security.jwt_secret;

    match authenticate(request.headers(), secret) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(error) => Envelope::failure(meta, error).into_response(),
    }
}

/// Admin gate. Must run inside `require_auth`.
pub async fn require_admin(meta: RequestMeta, request: Request, next: Next) -> Response {
    match request.extensions().get::<AuthUser>() {
        Some(user) if user.is_admin() => next.run(request).await,
        Some(_) => Envelope::failure(meta, ApiError::forbidden("Admin access required")).into_response(),
        None => Envelope::failure(meta, ApiError::unauthorized("Authentication required")).into_response(),
    }
}

pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthUser, ApiError> {
    let token = extract_bearer(headers)?;

    match validate_jwt(token, secret) {
        Ok(claims) => Ok(AuthUser::from(claims)),
        // Misconfiguration is our fault, not the client's
        Err(AuthError::InvalidSecret) => Err(ApiError::Auth(AuthError::InvalidSecret)),
        Err(e) => {
            tracing::debug!("Rejected bearer token: {}", e);
            Err(ApiError::unauthorized("Invalid or expired token"))
        }
    }
}

/// Extract the JWT from the Authorization header
fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err(ApiError::unauthorized("Empty JWT token")),
        None => Err(ApiError::unauthorized("Authorization header must use Bearer token format")),
    }
}
