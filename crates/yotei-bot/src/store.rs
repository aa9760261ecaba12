//! In-memory reminder and list storage, keyed by room, with JSON snapshots.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use yotei_engine::Cadence;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Delivery state of a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    /// Waiting for `fire_at`.
    Active,
    /// Claimed by a delivery sweep.
    Pending,
    /// Delivered and not repeating.
    Completed,
}

/// A scheduled reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderRecord {
    /// Unique reminder ID.
    pub id: String,
    /// Chat room the reminder belongs to.
    pub room_id: String,
    /// Name used to refer to the reminder in commands.
    pub name: String,
    /// Text delivered when the reminder fires.
    pub message: String,
    /// Next fire instant, always UTC.
    pub fire_at: DateTime<Utc>,
    #[serde(default)]
    pub cadence: Cadence,
    pub status: ReminderStatus,
    pub created_at: DateTime<Utc>,
}

impl ReminderRecord {
    pub fn new(
        room_id: impl Into<String>,
        message: impl Into<String>,
        fire_at: DateTime<Utc>,
        cadence: Cadence,
        created_at: DateTime<Utc>,
    ) -> Self {
        let message = message.into();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            room_id: room_id.into(),
            name: message.clone(),
            message,
            fire_at,
            cadence,
            status: ReminderStatus::Active,
            created_at,
        }
    }
}

/// A named list of items (shopping, todo, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRecord {
    pub room_id: String,
    pub name: String,
    pub items: Vec<String>,
    /// Last time the list was created or changed.
    pub updated_at: DateTime<Utc>,
}

/// Result of removing an item from a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveItem {
    Removed,
    NoSuchItem,
    NoSuchList,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    reminders: BTreeMap<String, ReminderRecord>,
    /// room id → list name → list
    #[serde(default)]
    lists: BTreeMap<String, BTreeMap<String, ListRecord>>,
}

/// Reminder and list storage guarded by a mutex.
///
/// Every status transition happens under the lock, so two sweeps cannot
/// claim the same reminder.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON snapshot, or start empty if the file does not exist.
    ///
    /// Reminders still pending from an interrupted sweep are released back to
    /// active so the next sweep delivers them.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!("No state at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        let mut snapshot: Snapshot = serde_json::from_str(&content)?;
        let mut released = 0;
        for r in snapshot.reminders.values_mut() {
            if r.status == ReminderStatus::Pending {
                r.status = ReminderStatus::Active;
                released += 1;
            }
        }
        if released > 0 {
            warn!(released, "Released reminders left pending by an interrupted sweep");
        }
        debug!(
            reminders = snapshot.reminders.len(),
            rooms = snapshot.lists.len(),
            "Loaded state from {}",
            path.display()
        );
        Ok(Self {
            inner: Mutex::new(snapshot),
        })
    }

    /// Write the current state as a JSON snapshot.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let content = {
            let inner = self.lock();
            serde_json::to_string_pretty(&*inner)?
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Reminders ───────────────────────────────────────────────────────

    pub fn insert_reminder(&self, reminder: ReminderRecord) {
        info!(
            reminder_id = %reminder.id,
            room_id = %reminder.room_id,
            fire_at = %reminder.fire_at,
            "Reminder stored"
        );
        self.lock().reminders.insert(reminder.id.clone(), reminder);
    }

    pub fn reminder(&self, id: &str) -> Option<ReminderRecord> {
        self.lock().reminders.get(id).cloned()
    }

    /// Reminders of a room that have not completed, soonest first.
    pub fn reminders_for_room(&self, room_id: &str) -> Vec<ReminderRecord> {
        let mut reminders: Vec<ReminderRecord> = self
            .lock()
            .reminders
            .values()
            .filter(|r| r.room_id == room_id && r.status != ReminderStatus::Completed)
            .cloned()
            .collect();
        reminders.sort_by_key(|r| r.fire_at);
        reminders
    }

    /// Delete every reminder of the room with this name. Returns how many.
    pub fn delete_reminders_named(&self, room_id: &str, name: &str) -> usize {
        let mut inner = self.lock();
        let before = inner.reminders.len();
        inner
            .reminders
            .retain(|_, r| !(r.room_id == room_id && r.name == name));
        before - inner.reminders.len()
    }

    /// Active reminders whose `fire_at` is at or before `now`, soonest first.
    pub fn due_reminders(&self, now: DateTime<Utc>) -> Vec<ReminderRecord> {
        let mut due: Vec<ReminderRecord> = self
            .lock()
            .reminders
            .values()
            .filter(|r| r.status == ReminderStatus::Active && r.fire_at <= now)
            .cloned()
            .collect();
        due.sort_by_key(|r| r.fire_at);
        due
    }

    /// Move an active reminder to pending. Returns false if it is missing or
    /// already claimed.
    pub fn claim_reminder(&self, id: &str) -> bool {
        match self.lock().reminders.get_mut(id) {
            Some(r) if r.status == ReminderStatus::Active => {
                r.status = ReminderStatus::Pending;
                true
            }
            _ => false,
        }
    }

    /// Return a pending reminder to active without changing `fire_at`.
    pub fn release_reminder(&self, id: &str) {
        if let Some(r) = self.lock().reminders.get_mut(id) {
            if r.status == ReminderStatus::Pending {
                r.status = ReminderStatus::Active;
            }
        }
    }

    /// Set a new `fire_at` and mark the reminder active.
    pub fn reschedule_reminder(&self, id: &str, fire_at: DateTime<Utc>) -> bool {
        match self.lock().reminders.get_mut(id) {
            Some(r) => {
                r.fire_at = fire_at;
                r.status = ReminderStatus::Active;
                true
            }
            None => false,
        }
    }

    pub fn complete_reminder(&self, id: &str) -> bool {
        match self.lock().reminders.get_mut(id) {
            Some(r) => {
                r.status = ReminderStatus::Completed;
                true
            }
            None => false,
        }
    }

    /// Remove completed reminders that last fired before `cutoff`.
    pub fn purge_completed_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut inner = self.lock();
        let before = inner.reminders.len();
        inner
            .reminders
            .retain(|_, r| !(r.status == ReminderStatus::Completed && r.fire_at < cutoff));
        before - inner.reminders.len()
    }

    // ── Lists ───────────────────────────────────────────────────────────

    /// Create an empty list. Returns false if the room already has one by that name.
    pub fn create_list(&self, room_id: &str, name: &str, now: DateTime<Utc>) -> bool {
        let mut inner = self.lock();
        let room = inner.lists.entry(room_id.to_string()).or_default();
        if room.contains_key(name) {
            return false;
        }
        room.insert(
            name.to_string(),
            ListRecord {
                room_id: room_id.to_string(),
                name: name.to_string(),
                items: Vec::new(),
                updated_at: now,
            },
        );
        true
    }

    /// Append items, creating the list if needed. Returns the new item count.
    pub fn add_items(&self, room_id: &str, name: &str, items: &[String], now: DateTime<Utc>) -> usize {
        let mut inner = self.lock();
        let list = inner
            .lists
            .entry(room_id.to_string())
            .or_default()
            .entry(name.to_string())
            .or_insert_with(|| ListRecord {
                room_id: room_id.to_string(),
                name: name.to_string(),
                items: Vec::new(),
                updated_at: now,
            });
        list.items.extend(items.iter().cloned());
        list.updated_at = now;
        list.items.len()
    }

    /// Remove the first item equal to `item`.
    pub fn remove_item(&self, room_id: &str, name: &str, item: &str, now: DateTime<Utc>) -> RemoveItem {
        let mut inner = self.lock();
        let Some(list) = inner.lists.get_mut(room_id).and_then(|room| room.get_mut(name)) else {
            return RemoveItem::NoSuchList;
        };
        match list.items.iter().position(|i| i == item) {
            Some(idx) => {
                list.items.remove(idx);
                list.updated_at = now;
                RemoveItem::Removed
            }
            None => RemoveItem::NoSuchItem,
        }
    }

    pub fn list(&self, room_id: &str, name: &str) -> Option<ListRecord> {
        self.lock()
            .lists
            .get(room_id)
            .and_then(|room| room.get(name))
            .cloned()
    }

    pub fn delete_list(&self, room_id: &str, name: &str) -> bool {
        let mut inner = self.lock();
        let removed = inner
            .lists
            .get_mut(room_id)
            .and_then(|room| room.remove(name))
            .is_some();
        if inner.lists.get(room_id).is_some_and(|room| room.is_empty()) {
            inner.lists.remove(room_id);
        }
        removed
    }

    /// Names of the room's lists, sorted.
    pub fn list_names(&self, room_id: &str) -> Vec<String> {
        self.lock()
            .lists
            .get(room_id)
            .map(|room| room.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove lists not touched since `cutoff`.
    pub fn purge_lists_idle_since(&self, cutoff: DateTime<Utc>) -> usize {
        let mut inner = self.lock();
        let mut removed = 0;
        for room in inner.lists.values_mut() {
            let before = room.len();
            room.retain(|_, list| list.updated_at >= cutoff);
            removed += before - room.len();
        }
        inner.lists.retain(|_, room| !room.is_empty());
        removed
    }
}
