//! Reminder recurrence -- computes the next fire instant from the previous one.
//!
//! Daily and weekly cadences add whole civil days. Monthly adds one calendar
//! month in civil time, clamping to the month end when the source day does
//! not exist in the target month (Jan 31 → Feb 28). Clamping is sticky: the
//! following step starts from the clamped day.

use chrono::{DateTime, Days, FixedOffset, Months, NaiveDateTime, Utc};

use crate::cadence::Cadence;
use crate::civil::{self, from_civil, to_civil};

/// What happens after a reminder fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    /// Reschedule at this instant.
    Next(DateTime<Utc>),
    /// No more occurrences; the reminder is complete.
    Finished,
}

impl Occurrence {
    pub fn next(self) -> Option<DateTime<Utc>> {
        match self {
            Occurrence::Next(at) => Some(at),
            Occurrence::Finished => None,
        }
    }
}

/// Advance `previous` by one step of `cadence` in the default civil zone.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use yotei_engine::{advance, Cadence, Occurrence};
///
/// let fired = Utc.with_ymd_and_hms(2026, 1, 31, 0, 0, 0).unwrap();
/// let next = advance(fired, Cadence::Monthly);
/// assert_eq!(next, Occurrence::Next(Utc.with_ymd_and_hms(2026, 2, 28, 0, 0, 0).unwrap()));
/// assert_eq!(advance(fired, Cadence::None), Occurrence::Finished);
/// ```
pub fn advance(previous: DateTime<Utc>, cadence: Cadence) -> Occurrence {
    advance_with_offset(previous, cadence, civil::default_offset())
}

/// Advance `previous` by one step of `cadence`, doing calendar arithmetic in
/// the civil zone given by `offset`.
///
/// Hour, minute and second are preserved exactly. A result that would fall
/// outside chrono's calendar is treated as [`Occurrence::Finished`].
pub fn advance_with_offset(
    previous: DateTime<Utc>,
    cadence: Cadence,
    offset: FixedOffset,
) -> Occurrence {
    let civil = to_civil(previous, offset);
    let stepped: Option<NaiveDateTime> = match cadence {
        Cadence::None => return Occurrence::Finished,
        Cadence::Daily => civil.checked_add_days(Days::new(1)),
        Cadence::Weekly => civil.checked_add_days(Days::new(7)),
        Cadence::Monthly => civil.checked_add_months(Months::new(1)),
    };

    match stepped.and_then(|dt| from_civil(dt, offset)) {
        Some(next) => Occurrence::Next(next),
        None => Occurrence::Finished,
    }
}

/// Advance repeatedly until the occurrence is strictly after `now`.
///
/// Used after a delivery so that a reminder whose sweep was delayed for
/// several periods fires once, not once per missed period.
pub fn next_after(
    previous: DateTime<Utc>,
    cadence: Cadence,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Occurrence {
    let mut current = previous;
    loop {
        match advance_with_offset(current, cadence, offset) {
            Occurrence::Next(next) if next <= now => current = next,
            other => return other,
        }
    }
}
