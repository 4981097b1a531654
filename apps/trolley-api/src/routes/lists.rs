//! Shopping list endpoints: create, browse, share, export.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::middleware::AuthUser;
use crate::error::{ApiError, ApiErrorBody, FieldError};
use crate::models::list::{ListDetailResponse, ShoppingList};
use crate::AppState;

/// Title given to lists created without one.
const DEFAULT_TITLE: &str = "New Shopping List";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lists", post(create_list).get(list_lists))
        .route("/lists/{id}", get(get_list))
        .route("/lists/{id}/share", post(share_list))
        .route("/lists/{id}/export", get(export_list))
}

/// Load a list the user is allowed to see. Lists the user cannot access
/// answer exactly like lists that do not exist.
pub(crate) async fn visible_list(
    state: &AppState,
    list_id: i64,
    user_id: &str,
) -> Result<ShoppingList, ApiError> {
    let list = state
        .store
        .get_list(list_id)
        .await?
        .ok_or_else(|| ApiError::not_found("List not found"))?;

    if !list.can_access(user_id) {
        return Err(ApiError::not_found("List not found"));
    }

    Ok(list)
}

// ---------------------------------------------------------------------------
// POST /api/v1/lists
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateListRequest {
    pub title: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/lists",
    tag = "Lists",
    security(("bearer" = [])),
    request_body = CreateListRequest,
    responses(
        (status = 201, description = "List created", body = ShoppingList),
        (status = 400, description = "Validation failed", body = ApiErrorBody),
        (status = 401, description = "Missing or invalid token", body = ApiErrorBody),
    ),
)]
pub async fn create_list(
    AuthUser { user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateListRequest>,
) -> Result<(StatusCode, Json<ShoppingList>), ApiError> {
    let title = body
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .to_string();

    if title.len() > 100 {
        return Err(ApiError::validation(vec![FieldError {
            field: "title".into(),
            message: "Title must be 100 characters or fewer".into(),
        }]));
    }

    let list = state
        .store
        .create_list(ShoppingList {
            id: state.snowflake.generate(),
            owner_id: user_id.clone(),
            title,
            shared_with: Vec::new(),
            created_at: Utc::now(),
        })
        .await?;

    tracing::info!(list_id = list.id, user_id = %user_id, "list created");

    Ok((StatusCode::CREATED, Json(list)))
}

// ---------------------------------------------------------------------------
// GET /api/v1/lists
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct ListsResponse {
    pub data: Vec<ShoppingList>,
}

#[utoipa::path(
    get,
    path = "/api/v1/lists",
    tag = "Lists",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Lists the user owns or was invited to", body = ListsResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorBody),
    ),
)]
pub async fn list_lists(
    AuthUser { user_id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ListsResponse>, ApiError> {
    let data = state.store.lists_for_user(&user_id).await?;
    Ok(Json(ListsResponse { data }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/lists/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/lists/{id}",
    tag = "Lists",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "List id")),
    responses(
        (status = 200, description = "List with its items", body = ListDetailResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorBody),
        (status = 404, description = "List not found", body = ApiErrorBody),
    ),
)]
pub async fn get_list(
    AuthUser { user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ListDetailResponse>, ApiError> {
    let list = visible_list(&state, id, &user_id).await?;
    let items = state.store.items_for_list(list.id).await?;

    Ok(Json(ListDetailResponse { list, items }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/lists/{id}/share
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShareListRequest {
    pub email: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/lists/{id}/share",
    tag = "Lists",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "List id")),
    request_body = ShareListRequest,
    responses(
        (status = 200, description = "Updated list", body = ShoppingList),
        (status = 401, description = "Missing or invalid token", body = ApiErrorBody),
        (status = 404, description = "List or user not found", body = ApiErrorBody),
    ),
)]
pub async fn share_list(
    AuthUser { user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<ShareListRequest>,
) -> Result<Json<ShoppingList>, ApiError> {
    let list = state
        .store
        .get_list(id)
        .await?
        .ok_or_else(|| ApiError::not_found("List not found"))?;

    // Only the owner can share; everyone else sees the list as absent.
    if list.owner_id != user_id {
        return Err(ApiError::not_found("List not found"));
    }

    let email = body.email.trim().to_lowercase();
    let target = state
        .store
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::not_found("No user found with that email"))?;

    let updated = state
        .store
        .add_shared_user(id, &target.id)
        .await?
        .ok_or_else(|| ApiError::not_found("List not found"))?;

    tracing::info!(
        list_id = id,
        owner_id = %user_id,
        shared_with = %target.id,
        "list shared"
    );

    Ok(Json(updated))
}

// ---------------------------------------------------------------------------
// GET /api/v1/lists/{id}/export
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct ExportResponse {
    pub text: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/lists/{id}/export",
    tag = "Lists",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "List id")),
    responses(
        (status = 200, description = "Plain-text rendering of the list", body = ExportResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorBody),
        (status = 404, description = "List not found", body = ApiErrorBody),
    ),
)]
pub async fn export_list(
    AuthUser { user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ExportResponse>, ApiError> {
    let list = visible_list(&state, id, &user_id).await?;
    let items = state.store.items_for_list(list.id).await?;

    Ok(Json(ExportResponse {
        text: list.share_text(&items),
    }))
}
