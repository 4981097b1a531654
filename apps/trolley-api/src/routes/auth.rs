//! Auth routes: registration, login, logout, and WebSocket tickets.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::middleware::AuthUser;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::tokens;
use crate::error::{ApiError, ApiErrorBody, FieldError};
use crate::models::user::{User, UserResponse};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/ws-ticket", post(ws_ticket))
        .route("/users/@me", get(get_me))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

/// Mint an access token for a user and persist it with its TTL.
async fn issue_access_token(state: &AppState, user_id: &str) -> Result<String, ApiError> {
    let token = tokens::generate_access_token();
    tokens::store_access_token(
        state.kv.as_ref(),
        &token,
        &tokens::TokenData {
            user_id: user_id.to_string(),
        },
    )
    .await?;
    Ok(token)
}

// ---------------------------------------------------------------------------
// POST /api/v1/auth/register
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation failed", body = ApiErrorBody),
        (status = 409, description = "Email already registered", body = ApiErrorBody),
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    // --- Validation ---
    let mut errors: Vec<FieldError> = Vec::new();

    let email = body.email.trim().to_lowercase();
    if !email.contains('@') || email.len() < 3 {
        errors.push(FieldError {
            field: "email".into(),
            message: "Invalid email address".into(),
        });
    }

    if body.password.len() < 8 {
        errors.push(FieldError {
            field: "password".into(),
            message: "Password must be at least 8 characters".into(),
        });
    }

    let phone = body.phone.as_ref().map(|p| p.trim().to_string());
    if let Some(ref p) = phone {
        if p.len() > 20 {
            errors.push(FieldError {
                field: "phone".into(),
                message: "Phone number must be 20 characters or fewer".into(),
            });
        }
    }

    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let password_hash = hash_password(&body.password)?;
    let id = trolley_common::id::prefixed_ulid(trolley_common::id::prefix::USER);

    let user = state
        .store
        .create_user(User {
            id,
            email,
            password_hash,
            phone,
            created_at: Utc::now(),
        })
        .await?;

    tracing::info!(user_id = %user.id, email = %user.email, "user registered");

    // Registration doubles as login.
    let token = issue_access_token(&state, &user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: tokens::ACCESS_TOKEN_TTL_SECS,
            user: UserResponse::from(user),
        }),
    ))
}

// ---------------------------------------------------------------------------
// POST /api/v1/auth/login
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ApiErrorBody),
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = body.email.trim().to_lowercase();

    // An unknown email and a wrong password answer identically.
    let user = state
        .store
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    verify_password(&body.password, &user.password_hash)?;

    let token = issue_access_token(&state, &user.id).await?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: tokens::ACCESS_TOKEN_TTL_SECS,
        user: UserResponse::from(user),
    }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/auth/logout
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Missing or invalid token", body = ApiErrorBody),
    ),
)]
pub async fn logout(
    AuthUser { user_id, token }: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    tokens::revoke_access_token(state.kv.as_ref(), &token).await?;

    tracing::info!(user_id = %user_id, "user logged out");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /api/v1/auth/ws-ticket
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct WsTicketResponse {
    pub ticket: String,
    pub expires_in: u64,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/ws-ticket",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Short-lived WebSocket ticket", body = WsTicketResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorBody),
    ),
)]
pub async fn ws_ticket(
    AuthUser { user_id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<WsTicketResponse>, ApiError> {
    let ticket = tokens::generate_ws_ticket();
    tokens::store_ws_ticket(
        state.kv.as_ref(),
        &ticket,
        &tokens::WsTicketData { user_id },
    )
    .await?;

    Ok(Json(WsTicketResponse {
        ticket,
        expires_in: tokens::WS_TICKET_TTL_SECS,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/users/@me
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/users/@me",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user's profile", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorBody),
    ),
)]
pub async fn get_me(
    AuthUser { user_id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .store
        .get_user(&user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(user)))
}
