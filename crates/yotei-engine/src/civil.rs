//! The fixed civil timezone and calendar helpers shared by the resolver and
//! the recurrence engine.
//!
//! Civil time is the wall clock of the bot's users. It is a fixed UTC offset
//! with no daylight saving, so every conversion is plain offset arithmetic.

use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};

/// Hours east of UTC for the default civil zone (Japan Standard Time).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

/// Build a fixed offset from whole hours east of UTC.
///
/// Returns `None` outside the ±23 hour range chrono accepts.
pub fn offset_from_hours(hours: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(hours.checked_mul(3600)?)
}

/// The default civil offset, `+09:00`.
pub fn default_offset() -> FixedOffset {
    offset_from_hours(DEFAULT_UTC_OFFSET_HOURS).unwrap_or_else(|| Utc.fix())
}

/// Convert a UTC instant to civil wall-clock time.
pub fn to_civil(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDateTime {
    instant.with_timezone(&offset).naive_local()
}

/// Convert civil wall-clock time back to a UTC instant.
///
/// A fixed offset has no gaps or folds, so the mapping is always unique.
pub fn from_civil(civil: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<Utc>> {
    offset
        .from_local_datetime(&civil)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some(last.day())
}

/// Build a date, clamping `day` to the last day of the month.
///
/// `day` must be in `1..=31` and `month` in `1..=12`; anything else is `None`.
/// This is the single day-of-month policy of the crate: a day that does not
/// exist in the target month becomes that month's last day.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !(1..=31).contains(&day) {
        return None;
    }
    let last = days_in_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, day.min(last))
}

/// Year and month that follow `(year, month)`.
pub fn next_month(year: i32, month: u32) -> Option<(i32, u32)> {
    if month >= 12 {
        Some((year.checked_add(1)?, 1))
    } else {
        Some((year, month + 1))
    }
}

/// Fold full-width digits and the full-width colon to ASCII, and trim.
pub fn normalize_phrase(s: &str) -> String {
    s.trim()
        .chars()
        .map(|ch| match ch {
            '０'..='９' => char::from(b'0' + (ch as u32 - '０' as u32) as u8),
            '：' => ':',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_offset_is_nine_hours() {
        assert_eq!(default_offset().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn offset_out_of_range_is_rejected() {
        assert!(offset_from_hours(24).is_none());
        assert!(offset_from_hours(-24).is_none());
        assert!(offset_from_hours(-5).is_some());
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2025, 2), Some(28));
        assert_eq!(days_in_month(2026, 4), Some(30));
        assert_eq!(days_in_month(2026, 12), Some(31));
        assert_eq!(days_in_month(2026, 13), None);
    }

    #[test]
    fn clamped_date_clamps_to_month_end() {
        assert_eq!(
            clamped_date(2026, 11, 31),
            NaiveDate::from_ymd_opt(2026, 11, 30)
        );
        assert_eq!(
            clamped_date(2027, 2, 30),
            NaiveDate::from_ymd_opt(2027, 2, 28)
        );
        assert_eq!(clamped_date(2026, 11, 0), None);
        assert_eq!(clamped_date(2026, 11, 32), None);
    }

    #[test]
    fn next_month_wraps_year() {
        assert_eq!(next_month(2026, 12), Some((2027, 1)));
        assert_eq!(next_month(2026, 3), Some((2026, 4)));
    }

    #[test]
    fn civil_round_trip_uses_fixed_offset() {
        let instant = Utc.with_ymd_and_hms(2026, 10, 18, 15, 30, 0).unwrap();
        let civil = to_civil(instant, default_offset());
        assert_eq!(civil.to_string(), "2026-10-19 00:30:00");
        assert_eq!(from_civil(civil, default_offset()), Some(instant));
    }

    #[test]
    fn normalize_folds_full_width() {
        assert_eq!(normalize_phrase(" １５日 "), "15日");
        assert_eq!(normalize_phrase("９：３０"), "9:30");
    }
}
