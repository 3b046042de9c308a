use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::jwt::{Claims, JwtService};
use crate::AppState;

const BEARER_PREFIX: &str = "Bearer ";

pub const TOKEN_MISSING: &str = "Unauthorized: token not provided";
pub const TOKEN_INVALID: &str = "Unauthorized: invalid or expired token";

/// Token part of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Verify the request's bearer token. Failure detail goes to the log only.
pub fn authenticate(jwt: &JwtService, headers: &HeaderMap) -> Result<Claims, ApiError> {
    let token = bearer_token(headers).ok_or(ApiError::Auth(TOKEN_MISSING))?;

    jwt.verify_token(token).map_err(|e| {
        tracing::warn!(error = %e, "JWT verification failed");
        ApiError::Auth(TOKEN_INVALID)
    })
}

/// Gate for whole sub-routers. Verified claims are stored in the request
/// extensions before the inner handler runs.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state.jwt, request.headers()) {
        Ok(claims) => {
            tracing::debug!(sub = %claims.sub, "Authenticated request");
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Authenticated caller. Extract this in handlers that require auth; the
/// handler body never runs if verification fails.
pub struct AuthUser(pub Claims);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(AuthUser(claims.clone()));
        }
        authenticate(&state.jwt, &parts.headers).map(AuthUser)
    }
}
