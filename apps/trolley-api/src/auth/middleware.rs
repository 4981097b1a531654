//! Bearer access-token extraction.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use crate::auth::tokens;
use crate::error::ApiError;
use crate::AppState;

/// Authenticated user extracted from the `Authorization: Bearer <token>`
/// header. Carries the raw token so logout can revoke it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub token: String,
}

/// Rejection returned when the bearer token is missing or invalid.
pub struct AuthError(&'static str);

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::unauthorized(self.0).into_response()
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError("Missing Authorization header"))?;

    header
        .strip_prefix("Bearer ")
        .ok_or(AuthError("Invalid Authorization header format"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.to_string();

        let data = tokens::lookup_access_token(state.kv.as_ref(), &token)
            .await
            .map_err(|_| AuthError("Token lookup failed"))?
            .ok_or(AuthError("Invalid or expired token"))?;

        Ok(AuthUser {
            user_id: data.user_id,
            token,
        })
    }
}
