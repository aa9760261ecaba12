//! Per-room conversation state with expiry.
//!
//! A room enters a session when a command needs follow-up messages (for now,
//! "send me the items for this list"). Sessions older than the TTL are
//! treated as absent and removed by [`SessionStore::purge_expired`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};

/// What the bot is waiting for in a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingInput {
    /// Subsequent messages are items for this list.
    ListItems { list: String },
}

#[derive(Debug, Clone)]
struct Entry {
    pending: PendingInput,
    touched_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_live(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        now - entry.touched_at < self.ttl
    }

    /// Start (or replace) the room's session.
    pub fn open(&self, room_id: &str, pending: PendingInput, now: DateTime<Utc>) {
        self.lock().insert(
            room_id.to_string(),
            Entry {
                pending,
                touched_at: now,
            },
        );
    }

    /// The room's live session, if any.
    pub fn get(&self, room_id: &str, now: DateTime<Utc>) -> Option<PendingInput> {
        self.lock()
            .get(room_id)
            .filter(|entry| self.is_live(entry, now))
            .map(|entry| entry.pending.clone())
    }

    /// Extend a live session. Returns false if there is none.
    pub fn touch(&self, room_id: &str, now: DateTime<Utc>) -> bool {
        let mut entries = self.lock();
        match entries.get_mut(room_id) {
            Some(entry) if now - entry.touched_at < self.ttl => {
                entry.touched_at = now;
                true
            }
            _ => false,
        }
    }

    /// End the room's session, returning it if it was still live.
    pub fn close(&self, room_id: &str, now: DateTime<Utc>) -> Option<PendingInput> {
        self.lock()
            .remove(room_id)
            .filter(|entry| self.is_live(entry, now))
            .map(|entry| entry.pending)
    }

    /// Drop expired sessions. Returns how many were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let ttl = self.ttl;
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| now - entry.touched_at < ttl);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 3, min, 0).unwrap()
    }

    fn items(list: &str) -> PendingInput {
        PendingInput::ListItems {
            list: list.to_string(),
        }
    }

    #[test]
    fn test_session_expires_after_ttl() {
        let sessions = SessionStore::new(Duration::minutes(10));
        sessions.open("r1", items("買い物"), at(0));
        assert_eq!(sessions.get("r1", at(9)), Some(items("買い物")));
        assert_eq!(sessions.get("r1", at(10)), None);
    }

    #[test]
    fn test_touch_extends_session() {
        let sessions = SessionStore::new(Duration::minutes(10));
        sessions.open("r1", items("todo"), at(0));
        assert!(sessions.touch("r1", at(8)));
        assert!(sessions.get("r1", at(15)).is_some());
        assert!(!sessions.touch("r2", at(8)));
    }

    #[test]
    fn test_close_returns_live_session_only() {
        let sessions = SessionStore::new(Duration::minutes(10));
        sessions.open("r1", items("todo"), at(0));
        assert_eq!(sessions.close("r1", at(1)), Some(items("todo")));
        assert_eq!(sessions.close("r1", at(1)), None);

        sessions.open("r1", items("todo"), at(0));
        assert_eq!(sessions.close("r1", at(30)), None);
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let sessions = SessionStore::new(Duration::minutes(10));
        sessions.open("old", items("a"), at(0));
        sessions.open("new", items("b"), at(20));
        assert_eq!(sessions.purge_expired(at(25)), 1);
        assert_eq!(sessions.len(), 1);
        assert!(sessions.get("new", at(25)).is_some());
    }
}
