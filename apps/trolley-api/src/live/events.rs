//! Wire-format events pushed to list viewers.
//!
//! One JSON object per event, discriminated by `event_type`:
//!
//! ```json
//! {"event_type": "item_added", "item": {"id": 7, "name": "Milk", "quantity": "2", "is_checked": false}}
//! {"event_type": "item_toggled", "item": {"id": 7, "is_checked": true}}
//! ```

use serde::Serialize;

use crate::models::item::ListItem;

/// An event broadcast to every connection viewing a list. Immutable once
/// built; the registry shares one instance across the whole group.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ListEvent {
    ItemAdded { item: ItemPayload },
    ItemToggled { item: TogglePayload },
}

/// Full item fields, sent when an item is created.
#[derive(Debug, Clone, Serialize)]
pub struct ItemPayload {
    pub id: i64,
    pub name: String,
    pub quantity: String,
    pub is_checked: bool,
}

/// Minimal payload for a checked-state change.
#[derive(Debug, Clone, Serialize)]
pub struct TogglePayload {
    pub id: i64,
    pub is_checked: bool,
}

impl From<&ListItem> for ItemPayload {
    fn from(item: &ListItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            quantity: item.quantity.clone(),
            is_checked: item.is_checked,
        }
    }
}

impl From<&ListItem> for TogglePayload {
    fn from(item: &ListItem) -> Self {
        Self {
            id: item.id,
            is_checked: item.is_checked,
        }
    }
}
