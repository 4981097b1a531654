pub mod auth;
pub mod health;
pub mod items;
pub mod lists;

use axum::Router;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(crate::live::server::router())
        .nest(
            "/api/v1",
            auth::router().merge(lists::router()).merge(items::router()),
        )
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        auth::ws_ticket,
        auth::get_me,
        // Lists
        lists::create_list,
        lists::list_lists,
        lists::get_list,
        lists::share_list,
        lists::export_list,
        // Items
        items::create_item,
        items::toggle_item,
    ),
    components(
        schemas(
            // Error types
            crate::error::ApiErrorBody,
            crate::error::ApiErrorDetail,
            crate::error::FieldError,
            // Models
            crate::models::user::UserResponse,
            crate::models::list::ShoppingList,
            crate::models::list::ListDetailResponse,
            crate::models::item::ListItem,
            // Route request/response types
            health::HealthResponse,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            auth::WsTicketResponse,
            lists::CreateListRequest,
            lists::ListsResponse,
            lists::ShareListRequest,
            lists::ExportResponse,
            items::CreateItemRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check"),
        (name = "Auth", description = "Accounts and tokens"),
        (name = "Lists", description = "Shopping lists"),
        (name = "Items", description = "List items"),
    )
)]
pub struct ApiDoc;
