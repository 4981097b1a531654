//! Publishes mutation events to the groups of the lists they touch.

use std::sync::Arc;

use crate::models::item::ListItem;

use super::events::{ItemPayload, ListEvent, TogglePayload};
use super::groups::ListGroups;

/// Handle the mutation routes use to notify connected viewers. Publishing
/// is fire-and-forget: the HTTP response never waits on, or reflects,
/// delivery.
#[derive(Clone)]
pub struct ListPublisher {
    groups: Arc<ListGroups>,
}

impl ListPublisher {
    pub fn new(groups: Arc<ListGroups>) -> Self {
        Self { groups }
    }

    /// Announce a newly created item to its list's group.
    pub fn item_added(&self, item: &ListItem) {
        self.groups.broadcast(
            item.list_id,
            ListEvent::ItemAdded {
                item: ItemPayload::from(item),
            },
        );
    }

    /// Announce an item's new checked state to its list's group.
    pub fn item_toggled(&self, item: &ListItem) {
        self.groups.broadcast(
            item.list_id,
            ListEvent::ItemToggled {
                item: TogglePayload::from(item),
            },
        );
    }
}
