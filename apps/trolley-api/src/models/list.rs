use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::item::ListItem;

/// A shopping list. `shared_with` holds the user ids the owner has granted
/// access to; the owner themselves is never in it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShoppingList {
    pub id: i64,
    pub owner_id: String,
    pub title: String,
    pub shared_with: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ShoppingList {
    /// Owner and shared users can view and mutate the list.
    pub fn can_access(&self, user_id: &str) -> bool {
        self.owner_id == user_id || self.shared_with.iter().any(|u| u == user_id)
    }

    /// Plain-text rendering for sharing outside the app, checkbox-style.
    pub fn share_text(&self, items: &[ListItem]) -> String {
        let header = format!("🛒 *{}*\n\n", self.title);
        let body = items
            .iter()
            .map(|item| {
                let status = if item.is_checked { "[x]" } else { "[ ]" };
                format!("{} {} - {}", status, item.quantity, item.name)
            })
            .collect::<Vec<_>>()
            .join("\n");
        let footer = "\n\n_Shared from Trolley!_";
        format!("{header}{body}{footer}")
    }
}

/// List detail shape returned by the API: the list plus its items.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListDetailResponse {
    #[serde(flatten)]
    pub list: ShoppingList,
    pub items: Vec<ListItem>,
}
