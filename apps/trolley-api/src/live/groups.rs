//! Per-list connection groups and broadcast fan-out.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::events::ListEvent;

/// Capacity of each member's event buffer. A member whose buffer is full is
/// skipped for that event rather than stalling the rest of the group.
pub const MEMBER_BUFFER: usize = 32;

/// Registry mapping a list's group key to its currently-connected members.
///
/// Uses `DashMap` for shard-level concurrency and `parking_lot::Mutex` per
/// group for non-poisoning, fast locking. The inner mutex also serializes
/// broadcasts within one group, so members observe publisher order.
///
/// Membership changes only through `join` and `leave`; `broadcast` never
/// mutates it. Each member is addressed through the sending half of a
/// bounded channel, delivered to with a non-blocking `try_send`.
pub struct ListGroups {
    groups: DashMap<String, Mutex<HashMap<String, mpsc::Sender<Arc<ListEvent>>>>>,
}

impl ListGroups {
    pub fn new() -> Self {
        Self {
            groups: DashMap::new(),
        }
    }

    /// Group key for a list. Every connection scoped to the same list lands
    /// in the same group; different lists never share one.
    fn group_key(list_id: i64) -> String {
        format!("list_{list_id}")
    }

    /// Register a connection under a list's group. Re-joining an
    /// already-registered connection replaces its sender and is not an
    /// error.
    pub fn join(&self, list_id: i64, connection_id: &str, sender: mpsc::Sender<Arc<ListEvent>>) {
        self.groups
            .entry(Self::group_key(list_id))
            .or_insert_with(|| Mutex::new(HashMap::new()))
            .lock()
            .insert(connection_id.to_string(), sender);
    }

    /// Remove a connection from a list's group. A no-op when the connection
    /// is not registered. Empty groups are dropped so idle lists cost
    /// nothing.
    pub fn leave(&self, list_id: i64, connection_id: &str) {
        let key = Self::group_key(list_id);

        let now_empty = match self.groups.get(&key) {
            Some(entry) => {
                let mut members = entry.lock();
                members.remove(connection_id);
                members.is_empty()
            }
            None => return,
        };

        if now_empty {
            // The shard guard above is released; remove_if re-checks
            // emptiness under the shard lock so a racing join survives.
            self.groups.remove_if(&key, |_, members| members.lock().is_empty());
        }
    }

    /// Deliver an event to every member of a list's group, best-effort.
    ///
    /// A member with a full buffer misses this event and a member whose
    /// receiving half is gone is skipped; neither outcome stops delivery
    /// to siblings or surfaces an error to the caller.
    pub fn broadcast(&self, list_id: i64, event: ListEvent) {
        let Some(entry) = self.groups.get(&Self::group_key(list_id)) else {
            return;
        };

        let event = Arc::new(event);
        let members = entry.lock();
        for (connection_id, sender) in members.iter() {
            match sender.try_send(event.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        %connection_id,
                        list_id,
                        "member buffer full, dropping event"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    // The session is tearing down; its own leave call will
                    // remove the membership entry.
                    tracing::debug!(%connection_id, list_id, "member channel closed");
                }
            }
        }
    }

    /// Number of connections currently joined to a list's group.
    pub fn member_count(&self, list_id: i64) -> usize {
        self.groups
            .get(&Self::group_key(list_id))
            .map(|entry| entry.lock().len())
            .unwrap_or(0)
    }
}

impl Default for ListGroups {
    fn default() -> Self {
        Self::new()
    }
}
