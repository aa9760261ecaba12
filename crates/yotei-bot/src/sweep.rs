//! Periodic sweeps: delivering due reminders and purging stale data.
//!
//! Both are plain functions over the stores; an external scheduler (cron,
//! systemd timer, the CLI) decides when to call them.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use yotei_engine::{next_after, Occurrence};

use crate::session::SessionStore;
use crate::store::MemoryStore;

#[derive(Error, Debug)]
#[error("Delivery failed: {0}")]
pub struct DeliveryError(pub String);

/// Sends a reminder's text to its room.
pub trait Deliverer {
    fn deliver(&mut self, room_id: &str, text: &str) -> Result<(), DeliveryError>;
}

impl<F> Deliverer for F
where
    F: FnMut(&str, &str) -> Result<(), DeliveryError>,
{
    fn deliver(&mut self, room_id: &str, text: &str) -> Result<(), DeliveryError> {
        self(room_id, text)
    }
}

/// Text sent when a reminder fires.
pub fn reminder_text(message: &str) -> String {
    format!("🔔 リマインド: {message}")
}

/// Outcome counts of one delivery sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub delivered: usize,
    pub rescheduled: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Outcome counts of one cleanup sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub reminders_removed: usize,
    pub lists_removed: usize,
    pub sessions_expired: usize,
}

/// Deliver every due reminder once.
///
/// Each reminder is claimed (active → pending) before delivery, so a
/// concurrent sweep skips it. After a successful delivery a repeating
/// reminder moves to its next occurrence strictly after `now`; a one-shot
/// reminder is completed. A failed delivery releases the claim so the next
/// sweep retries.
pub fn deliver_due<D: Deliverer + ?Sized>(
    store: &MemoryStore,
    deliverer: &mut D,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> SweepReport {
    let mut report = SweepReport::default();

    for reminder in store.due_reminders(now) {
        if !store.claim_reminder(&reminder.id) {
            continue;
        }

        if let Err(e) = deliverer.deliver(&reminder.room_id, &reminder_text(&reminder.message)) {
            warn!(reminder_id = %reminder.id, room_id = %reminder.room_id, "{e}");
            store.release_reminder(&reminder.id);
            report.failed += 1;
            continue;
        }
        report.delivered += 1;

        match next_after(reminder.fire_at, reminder.cadence, now, offset) {
            Occurrence::Next(next) => {
                store.reschedule_reminder(&reminder.id, next);
                report.rescheduled += 1;
            }
            Occurrence::Finished => {
                store.complete_reminder(&reminder.id);
                report.completed += 1;
            }
        }
    }

    if report != SweepReport::default() {
        info!(
            delivered = report.delivered,
            rescheduled = report.rescheduled,
            completed = report.completed,
            failed = report.failed,
            "Delivery sweep finished"
        );
    }
    report
}

/// Remove completed reminders and lists untouched for `stale_after`, and
/// expired sessions.
pub fn purge_stale(
    store: &MemoryStore,
    sessions: &SessionStore,
    now: DateTime<Utc>,
    stale_after: Duration,
) -> CleanupReport {
    let cutoff = now - stale_after;
    let report = CleanupReport {
        reminders_removed: store.purge_completed_before(cutoff),
        lists_removed: store.purge_lists_idle_since(cutoff),
        sessions_expired: sessions.purge_expired(now),
    };
    info!(
        %cutoff,
        reminders_removed = report.reminders_removed,
        lists_removed = report.lists_removed,
        sessions_expired = report.sessions_expired,
        "Cleanup sweep finished"
    );
    report
}
