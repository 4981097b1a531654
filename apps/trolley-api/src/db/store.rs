use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::ApiError;
use crate::models::item::ListItem;
use crate::models::list::ShoppingList;
use crate::models::user::User;

/// Persistence seam for users, lists, and items.
///
/// Route handlers write here first and hand events to the publisher only
/// after the write has succeeded, so clients are never notified of a
/// mutation that failed to persist.
#[async_trait]
pub trait Store: Send + Sync {
    /// Create a user. Fails with a conflict when the email is taken.
    async fn create_user(&self, user: User) -> Result<User, ApiError>;
    async fn get_user(&self, id: &str) -> Result<Option<User>, ApiError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    async fn create_list(&self, list: ShoppingList) -> Result<ShoppingList, ApiError>;
    async fn get_list(&self, id: i64) -> Result<Option<ShoppingList>, ApiError>;
    /// Lists the user owns or has been granted access to, newest first.
    async fn lists_for_user(&self, user_id: &str) -> Result<Vec<ShoppingList>, ApiError>;
    /// Grant a user access to a list. Granting twice is a no-op.
    async fn add_shared_user(
        &self,
        list_id: i64,
        user_id: &str,
    ) -> Result<Option<ShoppingList>, ApiError>;

    async fn create_item(&self, item: ListItem) -> Result<ListItem, ApiError>;
    async fn get_item(&self, id: i64) -> Result<Option<ListItem>, ApiError>;
    /// Flip the item's checked state, returning the updated item.
    async fn toggle_item(&self, id: i64) -> Result<Option<ListItem>, ApiError>;
    /// Items of a list, oldest first.
    async fn items_for_list(&self, list_id: i64) -> Result<Vec<ListItem>, ApiError>;
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

pub struct MemoryStore {
    users: Mutex<HashMap<String, User>>,
    lists: Mutex<HashMap<i64, ShoppingList>>,
    items: Mutex<HashMap<i64, ListItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            lists: Mutex::new(HashMap::new()),
            items: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: User) -> Result<User, ApiError> {
        let mut users = self.users.lock();
        if users.values().any(|u| u.email == user.email) {
            return Err(ApiError::conflict("Email is already registered"));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, ApiError> {
        Ok(self.users.lock().get(id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self.users.lock().values().find(|u| u.email == email).cloned())
    }

    async fn create_list(&self, list: ShoppingList) -> Result<ShoppingList, ApiError> {
        self.lists.lock().insert(list.id, list.clone());
        Ok(list)
    }

    async fn get_list(&self, id: i64) -> Result<Option<ShoppingList>, ApiError> {
        Ok(self.lists.lock().get(&id).cloned())
    }

    async fn lists_for_user(&self, user_id: &str) -> Result<Vec<ShoppingList>, ApiError> {
        let lists = self.lists.lock();
        let mut visible: Vec<ShoppingList> = lists
            .values()
            .filter(|l| l.can_access(user_id))
            .cloned()
            .collect();
        // Snowflake ids are time-ordered, so id order is creation order.
        visible.sort_by_key(|l| std::cmp::Reverse(l.id));
        Ok(visible)
    }

    async fn add_shared_user(
        &self,
        list_id: i64,
        user_id: &str,
    ) -> Result<Option<ShoppingList>, ApiError> {
        let mut lists = self.lists.lock();
        let Some(list) = lists.get_mut(&list_id) else {
            return Ok(None);
        };
        if list.owner_id != user_id && !list.shared_with.iter().any(|u| u == user_id) {
            list.shared_with.push(user_id.to_string());
        }
        Ok(Some(list.clone()))
    }

    async fn create_item(&self, item: ListItem) -> Result<ListItem, ApiError> {
        self.items.lock().insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_item(&self, id: i64) -> Result<Option<ListItem>, ApiError> {
        Ok(self.items.lock().get(&id).cloned())
    }

    async fn toggle_item(&self, id: i64) -> Result<Option<ListItem>, ApiError> {
        let mut items = self.items.lock();
        let Some(item) = items.get_mut(&id) else {
            return Ok(None);
        };
        item.is_checked = !item.is_checked;
        Ok(Some(item.clone()))
    }

    async fn items_for_list(&self, list_id: i64) -> Result<Vec<ListItem>, ApiError> {
        let items = self.items.lock();
        let mut of_list: Vec<ListItem> = items
            .values()
            .filter(|i| i.list_id == list_id)
            .cloned()
            .collect();
        of_list.sort_by_key(|i| i.id);
        Ok(of_list)
    }
}
