//! List item endpoints: add and toggle.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::middleware::AuthUser;
use crate::error::{ApiError, ApiErrorBody, FieldError};
use crate::models::item::ListItem;
use crate::routes::lists::visible_list;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lists/{id}/items", post(create_item))
        .route("/items/{id}/toggle", post(toggle_item))
}

// ---------------------------------------------------------------------------
// POST /api/v1/lists/{id}/items
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    pub name: String,
    pub quantity: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/lists/{id}/items",
    tag = "Items",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "List id")),
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ListItem),
        (status = 400, description = "Validation failed", body = ApiErrorBody),
        (status = 401, description = "Missing or invalid token", body = ApiErrorBody),
        (status = 404, description = "List not found", body = ApiErrorBody),
    ),
)]
pub async fn create_item(
    AuthUser { user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(list_id): Path<i64>,
    Json(body): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ListItem>), ApiError> {
    let list = visible_list(&state, list_id, &user_id).await?;

    // --- Validation ---
    let mut errors: Vec<FieldError> = Vec::new();

    let name = body.name.trim().to_string();
    if name.is_empty() {
        errors.push(FieldError {
            field: "name".into(),
            message: "Item name is required".into(),
        });
    } else if name.len() > 200 {
        errors.push(FieldError {
            field: "name".into(),
            message: "Item name must be 200 characters or fewer".into(),
        });
    }

    // Quantity is free text ("2", "500g", "a dozen"); missing means one.
    let quantity = body
        .quantity
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or("1")
        .to_string();
    if quantity.len() > 50 {
        errors.push(FieldError {
            field: "quantity".into(),
            message: "Quantity must be 50 characters or fewer".into(),
        });
    }

    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let item = state
        .store
        .create_item(ListItem {
            id: state.snowflake.generate(),
            list_id: list.id,
            name,
            quantity,
            is_checked: false,
            created_at: Utc::now(),
        })
        .await?;

    state.publisher.item_added(&item);

    Ok((StatusCode::CREATED, Json(item)))
}

// ---------------------------------------------------------------------------
// POST /api/v1/items/{id}/toggle
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/v1/items/{id}/toggle",
    tag = "Items",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item with flipped checked state", body = ListItem),
        (status = 401, description = "Missing or invalid token", body = ApiErrorBody),
        (status = 404, description = "Item not found", body = ApiErrorBody),
    ),
)]
pub async fn toggle_item(
    AuthUser { user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ListItem>, ApiError> {
    let item = state
        .store
        .get_item(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Item not found"))?;

    // Access is checked through the owning list; outsiders see the item as
    // absent.
    let list = state
        .store
        .get_list(item.list_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Item not found"))?;
    if !list.can_access(&user_id) {
        return Err(ApiError::not_found("Item not found"));
    }

    let item = state
        .store
        .toggle_item(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Item not found"))?;

    state.publisher.item_toggled(&item);

    Ok(Json(item))
}
