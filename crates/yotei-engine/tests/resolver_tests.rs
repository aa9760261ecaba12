//! Tests for date/time phrase resolution against a fixed reference instant.

use chrono::{DateTime, FixedOffset, NaiveTime, TimeZone, Timelike, Utc};
use yotei_engine::{
    resolve, resolve_with_options, try_resolve, ResolveError, ResolveOptions,
    PAST_DATETIME_MESSAGE, UNPARSABLE_FORMAT_MESSAGE,
};

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// 2026-10-18 05:00 civil (+09:00), early enough that "today 09:00" is ahead.
fn early_morning() -> DateTime<Utc> {
    utc(2026, 10, 17, 20, 0)
}

// ---------------------------------------------------------------------------
// Literal date phrases
// ---------------------------------------------------------------------------

#[test]
fn literal_phrases_resolve_to_offset_at_nine() {
    let cases = [
        ("今日", 18),
        ("きょう", 18),
        ("明日", 19),
        ("あした", 19),
        ("明後日", 20),
        ("あさって", 20),
        ("来週", 25),
        ("らいしゅう", 25),
    ];
    for (phrase, day) in cases {
        let result = resolve(phrase, None, early_morning());
        assert!(result.success, "{phrase} should succeed");
        // 09:00 civil == 00:00 UTC
        assert_eq!(result.instant, utc(2026, 10, day, 0, 0), "{phrase}");
        assert_eq!(result.error_message, None);
    }

    for phrase in ["再来週", "さらいしゅう"] {
        let result = resolve(phrase, None, early_morning());
        assert_eq!(result.instant, utc(2026, 11, 1, 0, 0), "{phrase}");
    }
}

#[test]
fn civil_today_differs_from_utc_today() {
    // 16:00 UTC on the 18th is already 01:00 on the 19th in civil time.
    let reference = utc(2026, 10, 18, 16, 0);
    let result = resolve("明日", None, reference);
    assert!(result.success);
    assert_eq!(result.instant, utc(2026, 10, 20, 0, 0));
}

// ---------------------------------------------------------------------------
// Numeric date patterns
// ---------------------------------------------------------------------------

#[test]
fn days_later_pattern() {
    let result = resolve("3日後", Some("夜"), early_morning());
    assert!(result.success);
    // Oct 21 18:00 civil
    assert_eq!(result.instant, utc(2026, 10, 21, 9, 0));
}

#[test]
fn day_of_month_in_the_past_rolls_to_next_month() {
    // Civil 2026-10-20 05:00
    let reference = utc(2026, 10, 19, 20, 0);
    let result = resolve("15日", None, reference);
    assert!(result.success);
    assert_eq!(result.instant, utc(2026, 11, 15, 0, 0));
}

#[test]
fn day_of_month_ahead_stays_in_current_month() {
    let result = resolve("25日", None, early_morning());
    assert!(result.success);
    assert_eq!(result.instant, utc(2026, 10, 25, 0, 0));
}

#[test]
fn month_day_after_date_rolls_to_next_year() {
    let reference = utc(2026, 12, 27, 3, 0);
    let result = resolve("12月25日", Some("9時"), reference);
    assert!(result.success);
    assert_eq!(result.instant, utc(2027, 12, 25, 0, 0));
}

#[test]
fn full_date_is_absolute_regardless_of_reference() {
    let expected = utc(2025, 12, 25, 6, 30);

    let before = resolve("2025年12月25日", Some("15時30分"), utc(2025, 1, 1, 0, 0));
    assert!(before.success);
    assert_eq!(before.instant, expected);

    // Same computed instant; only the status changes once it is in the past.
    let after = resolve("2025年12月25日", Some("15時30分"), early_morning());
    assert!(!after.success);
    assert_eq!(after.instant, expected);
}

#[test]
fn unknown_date_phrase_defaults_to_today() {
    let result = resolve("いつか", Some("22:15"), early_morning());
    assert!(result.success);
    assert_eq!(result.instant, utc(2026, 10, 18, 13, 15));
}

// ---------------------------------------------------------------------------
// Past-date rejection
// ---------------------------------------------------------------------------

#[test]
fn instant_equal_to_reference_is_rejected() {
    // Civil 09:00 on the 18th is exactly the reference.
    let reference = utc(2026, 10, 18, 0, 0);
    let result = resolve("今日", None, reference);
    assert!(!result.success);
    assert_eq!(result.error_message.as_deref(), Some(PAST_DATETIME_MESSAGE));
}

#[test]
fn earlier_today_is_rejected() {
    let reference = utc(2026, 10, 18, 3, 0); // 12:00 civil
    let result = resolve("今日", Some("朝"), reference);
    assert!(!result.success);
    assert_eq!(result.instant, utc(2026, 10, 18, 0, 0));

    let err = try_resolve("今日", Some("朝"), reference).unwrap_err();
    assert_eq!(
        err,
        ResolveError::PastDateTime {
            instant: utc(2026, 10, 18, 0, 0)
        }
    );
}

#[test]
fn one_minute_ahead_is_accepted() {
    let reference = utc(2026, 10, 18, 2, 59); // 11:59 civil
    let result = resolve("今日", Some("12:00"), reference);
    assert!(result.success);
    assert_eq!(result.instant, utc(2026, 10, 18, 3, 0));
}

// ---------------------------------------------------------------------------
// Unparsable input
// ---------------------------------------------------------------------------

#[test]
fn invalid_numbers_are_unparsable() {
    for (date, time) in [("13月1日", None), ("明日", Some("25時")), ("0日", None)] {
        let result = resolve(date, time, early_morning());
        assert!(!result.success, "{date} {time:?}");
        assert_eq!(
            result.error_message.as_deref(),
            Some(UNPARSABLE_FORMAT_MESSAGE)
        );
        assert_eq!(result.instant, early_morning());
    }
}

#[test]
fn unparsable_error_kind_is_reported() {
    let err = try_resolve("明日", Some("10時75分"), early_morning()).unwrap_err();
    assert!(matches!(err, ResolveError::UnparsableFormat(_)));
    assert_eq!(err.user_message(), UNPARSABLE_FORMAT_MESSAGE);
}

// ---------------------------------------------------------------------------
// Options and output shape
// ---------------------------------------------------------------------------

#[test]
fn seconds_are_truncated() {
    let reference = Utc.with_ymd_and_hms(2026, 10, 17, 20, 0, 45).unwrap();
    let result = resolve("明日", Some("7時45分"), reference);
    assert!(result.success);
    assert_eq!(result.instant.second(), 0);
    assert_eq!(result.instant.nanosecond(), 0);
}

#[test]
fn custom_offset_and_default_time() {
    let options = ResolveOptions {
        utc_offset: FixedOffset::east_opt(0).unwrap(),
        default_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
    };
    let result = resolve_with_options("明日", None, early_morning(), &options);
    assert!(result.success);
    // Reference is Oct 17 in UTC, so "tomorrow" is Oct 18 at 08:00 UTC.
    assert_eq!(result.instant, utc(2026, 10, 18, 8, 0));
}

#[test]
fn full_width_input_matches_ascii() {
    let ascii = resolve("12月25日", Some("15:30"), early_morning());
    let wide = resolve("１２月２５日", Some("１５：３０"), early_morning());
    assert_eq!(ascii, wide);
}

#[test]
fn result_serializes_to_json() {
    let result = resolve("明日", None, early_morning());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["instant"], "2026-10-19T00:00:00Z");
    assert!(json["error_message"].is_null());
}
