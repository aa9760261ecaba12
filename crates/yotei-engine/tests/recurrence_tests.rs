//! Tests for reminder recurrence and cadence extraction.

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Timelike, Utc};
use yotei_engine::{
    advance, advance_with_offset, extract_cadence, next_after, Cadence, Occurrence,
};

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

// ---------------------------------------------------------------------------
// advance
// ---------------------------------------------------------------------------

#[test]
fn monthly_twelve_times_lands_one_year_later() {
    let start = utc(2026, 1, 15, 0, 0); // 09:00 civil on the 15th
    let mut current = start;
    for _ in 0..12 {
        current = advance(current, Cadence::Monthly)
            .next()
            .expect("monthly always has a next occurrence");
    }
    assert_eq!(current, utc(2027, 1, 15, 0, 0));
}

#[test]
fn monthly_from_31st_clamps_and_stays_clamped() {
    let mut current = utc(2026, 1, 31, 0, 0);
    let mut days = Vec::new();
    for _ in 0..3 {
        current = advance(current, Cadence::Monthly).next().unwrap();
        days.push(current.with_timezone(&jst()).day());
    }
    // Jan 31 -> Feb 28 -> Mar 28 -> Apr 28
    assert_eq!(days, vec![28, 28, 28]);
}

#[test]
fn monthly_leap_year_keeps_feb_29() {
    assert_eq!(
        advance(utc(2028, 1, 29, 0, 0), Cadence::Monthly),
        Occurrence::Next(utc(2028, 2, 29, 0, 0))
    );
}

#[test]
fn daily_and_weekly_preserve_time_of_day() {
    let fired = Utc.with_ymd_and_hms(2026, 3, 1, 13, 47, 12).unwrap();
    for cadence in [Cadence::Daily, Cadence::Weekly, Cadence::Monthly] {
        let next = advance(fired, cadence).next().unwrap();
        assert_eq!(
            (next.hour(), next.minute(), next.second()),
            (13, 47, 12),
            "{cadence}"
        );
    }
}

#[test]
fn none_never_reschedules() {
    for fired in [utc(2020, 1, 1, 0, 0), utc(2026, 10, 18, 3, 0), utc(2099, 12, 31, 23, 59)] {
        assert_eq!(advance(fired, Cadence::None), Occurrence::Finished);
    }
}

#[test]
fn unrecognized_tag_is_finished() {
    let cadence = Cadence::from_tag("fortnightly");
    assert_eq!(advance(utc(2026, 1, 1, 0, 0), cadence), Occurrence::Finished);
}

#[test]
fn other_offsets_use_their_own_civil_day() {
    // 2026-01-31 23:00 at -05:00 is 2026-02-01 04:00 UTC.
    let est = FixedOffset::west_opt(5 * 3600).unwrap();
    let fired = utc(2026, 2, 1, 4, 0);
    assert_eq!(
        advance_with_offset(fired, Cadence::Monthly, est),
        Occurrence::Next(utc(2026, 3, 1, 4, 0)) // Feb 28 23:00 at -05:00
    );
}

#[test]
fn next_after_catches_up_monthly() {
    let fired = utc(2026, 1, 10, 0, 0);
    let now = utc(2026, 4, 20, 0, 0);
    assert_eq!(
        next_after(fired, Cadence::Monthly, now, jst()),
        Occurrence::Next(utc(2026, 5, 10, 0, 0))
    );
}

// ---------------------------------------------------------------------------
// extract_cadence
// ---------------------------------------------------------------------------

#[test]
fn daily_beats_weekly_beats_monthly() {
    assert_eq!(extract_cadence("毎週 と 毎日 と 毎月"), Cadence::Daily);
    assert_eq!(extract_cadence("まいつき まいしゅう"), Cadence::Weekly);
    assert_eq!(extract_cadence("毎月 家賃"), Cadence::Monthly);
    assert_eq!(extract_cadence("家賃"), Cadence::None);
}
