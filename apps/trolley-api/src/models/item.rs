use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// One entry on a shopping list. `quantity` is free-form text ("2", "500g",
/// "a dozen") rather than a number.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListItem {
    pub id: i64,
    pub list_id: i64,
    pub name: String,
    pub quantity: String,
    pub is_checked: bool,
    pub created_at: DateTime<Utc>,
}
