//! Japanese date/time phrase resolution.
//!
//! Turns a date phrase (`明日`, `3日後`, `12月25日`, ...) and an optional time
//! phrase (`朝`, `15時30分`, `9:00`, ...) into an absolute UTC instant. All
//! arithmetic happens in the fixed civil zone; the caller supplies the
//! reference "now", so nothing here reads the system clock.
//!
//! # Date phrases (first match wins)
//!
//! | phrase | result |
//! |--------|--------|
//! | `今日` / `きょう` | civil today |
//! | `明日` / `あした` | today + 1 day |
//! | `明後日` / `あさって` | today + 2 days |
//! | `来週` / `らいしゅう` | today + 7 days |
//! | `再来週` / `さらいしゅう` | today + 14 days |
//! | `<N>日後` | today + N days |
//! | `<N>日` | day N of this month, next month if already past |
//! | `<M>月<D>日` | this year, next year if already past |
//! | `<YYYY>年<M>月<D>日` | that exact date |
//! | anything else | civil today |
//!
//! # Time phrases (first match wins)
//!
//! `朝` 09:00, `昼` 12:00, `午後` 15:00, `夕方` 18:00, `夜` 18:00, `深夜` 22:00
//! (each with its phonetic spelling), then `<H>時`, `<H>時<M>分`, `<H>時半`
//! and `<H>:<M>`. Anything else falls back to the default time, 09:00.
//!
//! Days that do not exist in the target month are clamped to the month's
//! last day (see [`crate::civil::clamped_date`]).

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::civil::{self, clamped_date, from_civil, next_month, normalize_phrase, to_civil};
use crate::error::{ResolveError, Result};

/// Date literals and their offset in days from civil today.
const DATE_LITERALS: &[(&str, u64)] = &[
    ("今日", 0),
    ("きょう", 0),
    ("明日", 1),
    ("あした", 1),
    ("明後日", 2),
    ("あさって", 2),
    ("来週", 7),
    ("らいしゅう", 7),
    ("再来週", 14),
    ("さらいしゅう", 14),
];

/// Time literals and the civil hour they stand for.
const TIME_LITERALS: &[(&str, u32)] = &[
    ("朝", 9),
    ("あさ", 9),
    ("昼", 12),
    ("ひる", 12),
    ("お昼", 12),
    ("おひる", 12),
    ("午後", 15),
    ("ごご", 15),
    ("夕方", 18),
    ("ゆうがた", 18),
    ("夜", 18),
    ("よる", 18),
    ("深夜", 22),
    ("しんや", 22),
];

/// Options for [`resolve_with_options`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Offset of the civil zone. Defaults to `+09:00`.
    pub utc_offset: FixedOffset,
    /// Time of day used when no time phrase matches. Defaults to 09:00.
    pub default_time: NaiveTime,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            utc_offset: civil::default_offset(),
            default_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// The outcome of resolving a date/time phrase pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDateTime {
    /// The resolved instant in UTC. Only meaningful when `success` is true.
    pub instant: DateTime<Utc>,
    /// Whether the phrase resolved to a future instant.
    pub success: bool,
    /// Fixed user-facing message when `success` is false.
    pub error_message: Option<String>,
}

impl ResolvedDateTime {
    fn from_outcome(outcome: Result<DateTime<Utc>>, reference: DateTime<Utc>) -> Self {
        match outcome {
            Ok(instant) => Self {
                instant,
                success: true,
                error_message: None,
            },
            Err(err) => {
                let instant = match &err {
                    ResolveError::PastDateTime { instant } => *instant,
                    ResolveError::UnparsableFormat(_) => reference,
                };
                Self {
                    instant,
                    success: false,
                    error_message: Some(err.user_message().to_string()),
                }
            }
        }
    }
}

/// Resolve a date phrase and optional time phrase against `reference`,
/// in the default `+09:00` civil zone.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use yotei_engine::resolve;
///
/// let now = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
/// let result = resolve("2025年12月25日", Some("15時30分"), now);
/// assert!(result.success);
/// assert_eq!(result.instant, Utc.with_ymd_and_hms(2025, 12, 25, 6, 30, 0).unwrap());
/// ```
pub fn resolve(
    date_phrase: &str,
    time_phrase: Option<&str>,
    reference: DateTime<Utc>,
) -> ResolvedDateTime {
    resolve_with_options(
        date_phrase,
        time_phrase,
        reference,
        &ResolveOptions::default(),
    )
}

/// Resolve with explicit options. Never fails; failures are reported through
/// `success` and `error_message`.
pub fn resolve_with_options(
    date_phrase: &str,
    time_phrase: Option<&str>,
    reference: DateTime<Utc>,
    options: &ResolveOptions,
) -> ResolvedDateTime {
    let outcome = try_resolve_with_options(date_phrase, time_phrase, reference, options);
    ResolvedDateTime::from_outcome(outcome, reference)
}

/// Like [`resolve`], but returns the error kind instead of a status record.
pub fn try_resolve(
    date_phrase: &str,
    time_phrase: Option<&str>,
    reference: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    try_resolve_with_options(
        date_phrase,
        time_phrase,
        reference,
        &ResolveOptions::default(),
    )
}

/// Like [`resolve_with_options`], but returns the error kind.
///
/// # Errors
///
/// Returns [`ResolveError::UnparsableFormat`] when a recognized pattern carries
/// out-of-range numbers, and [`ResolveError::PastDateTime`] when the result is
/// not strictly after `reference`.
pub fn try_resolve_with_options(
    date_phrase: &str,
    time_phrase: Option<&str>,
    reference: DateTime<Utc>,
    options: &ResolveOptions,
) -> Result<DateTime<Utc>> {
    let today = to_civil(reference, options.utc_offset).date();

    let date = resolve_date(date_phrase, today)?;
    let time = resolve_time(time_phrase, options.default_time)?;

    let instant = from_civil(NaiveDateTime::new(date, time), options.utc_offset).ok_or_else(|| {
        ResolveError::UnparsableFormat(format!("{date} {time} has no UTC equivalent"))
    })?;

    if instant <= reference {
        return Err(ResolveError::PastDateTime { instant });
    }
    Ok(instant)
}

/// Resolve a date phrase to a civil date, relative to civil `today`.
///
/// Unrecognized phrases resolve to `today`.
pub fn resolve_date(phrase: &str, today: NaiveDate) -> Result<NaiveDate> {
    let phrase = normalize_phrase(phrase);
    let p = patterns();

    if let Some(&(_, days)) = DATE_LITERALS.iter().find(|(lit, _)| *lit == phrase) {
        return add_days(today, days);
    }

    if let Some(caps) = p.days_later.captures(&phrase) {
        let days: u64 = parse_number(&caps[1])?;
        return add_days(today, days);
    }

    if let Some(caps) = p.day_of_month.captures(&phrase) {
        let day: u32 = parse_number(&caps[1])?;
        let this_month = clamped_date(today.year(), today.month(), day)
            .ok_or_else(|| invalid_date(&phrase))?;
        if this_month >= today {
            return Ok(this_month);
        }
        let (year, month) = next_month(today.year(), today.month()).ok_or_else(|| invalid_date(&phrase))?;
        return clamped_date(year, month, day).ok_or_else(|| invalid_date(&phrase));
    }

    if let Some(caps) = p.month_day.captures(&phrase) {
        let month: u32 = parse_number(&caps[1])?;
        let day: u32 = parse_number(&caps[2])?;
        let this_year =
            clamped_date(today.year(), month, day).ok_or_else(|| invalid_date(&phrase))?;
        if this_year >= today {
            return Ok(this_year);
        }
        let year = today.year().checked_add(1).ok_or_else(|| invalid_date(&phrase))?;
        return clamped_date(year, month, day).ok_or_else(|| invalid_date(&phrase));
    }

    if let Some(caps) = p.full_date.captures(&phrase) {
        let year: i32 = parse_number(&caps[1])?;
        let month: u32 = parse_number(&caps[2])?;
        let day: u32 = parse_number(&caps[3])?;
        return clamped_date(year, month, day).ok_or_else(|| invalid_date(&phrase));
    }

    Ok(today)
}

/// Resolve an optional time phrase to a civil time of day.
///
/// Absent or unrecognized phrases resolve to `default`.
pub fn resolve_time(phrase: Option<&str>, default: NaiveTime) -> Result<NaiveTime> {
    let phrase = match phrase {
        Some(raw) => normalize_phrase(raw),
        None => return Ok(default),
    };
    let p = patterns();

    let (hour, minute): (u32, u32) =
        if let Some(&(_, hour)) = TIME_LITERALS.iter().find(|(lit, _)| *lit == phrase) {
            (hour, 0)
        } else if let Some(caps) = p.hour.captures(&phrase) {
            (parse_number(&caps[1])?, 0)
        } else if let Some(caps) = p.hour_minute.captures(&phrase) {
            (parse_number(&caps[1])?, parse_number(&caps[2])?)
        } else if let Some(caps) = p.hour_half.captures(&phrase) {
            (parse_number(&caps[1])?, 30)
        } else if let Some(caps) = p.clock.captures(&phrase) {
            (parse_number(&caps[1])?, parse_number(&caps[2])?)
        } else {
            return Ok(default);
        };

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
        ResolveError::UnparsableFormat(format!("'{phrase}' is not a valid time of day"))
    })
}

/// Whether `s` looks like a time phrase (literal or numeric pattern).
///
/// Range checks are not applied; `25時` still counts as a time phrase so the
/// resolver can reject it instead of treating it as message text.
pub fn is_time_phrase(s: &str) -> bool {
    let s = normalize_phrase(s);
    let p = patterns();
    TIME_LITERALS.iter().any(|(lit, _)| *lit == s)
        || p.hour.is_match(&s)
        || p.hour_minute.is_match(&s)
        || p.hour_half.is_match(&s)
        || p.clock.is_match(&s)
}

/// Whether `s` is a recognized date phrase (literal or numeric pattern).
pub fn is_date_phrase(s: &str) -> bool {
    let s = normalize_phrase(s);
    let p = patterns();
    DATE_LITERALS.iter().any(|(lit, _)| *lit == s)
        || p.days_later.is_match(&s)
        || p.day_of_month.is_match(&s)
        || p.month_day.is_match(&s)
        || p.full_date.is_match(&s)
}

// ── Patterns ────────────────────────────────────────────────────────────────

struct Patterns {
    days_later: Regex,
    day_of_month: Regex,
    month_day: Regex,
    full_date: Regex,
    hour: Regex,
    hour_minute: Regex,
    hour_half: Regex,
    clock: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        days_later: compile(r"^([0-9]+)日後$"),
        day_of_month: compile(r"^([0-9]+)日$"),
        month_day: compile(r"^([0-9]+)月([0-9]+)日$"),
        full_date: compile(r"^([0-9]+)年([0-9]+)月([0-9]+)日$"),
        hour: compile(r"^([0-9]+)時$"),
        hour_minute: compile(r"^([0-9]+)時([0-9]+)分$"),
        hour_half: compile(r"^([0-9]+)時半$"),
        clock: compile(r"^([0-9]+):([0-9]+)$"),
    })
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn parse_number<T: std::str::FromStr>(digits: &str) -> Result<T> {
    digits
        .parse()
        .map_err(|_| ResolveError::UnparsableFormat(format!("number out of range: '{digits}'")))
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| ResolveError::UnparsableFormat(format!("{date} + {days} days overflows")))
}

fn invalid_date(phrase: &str) -> ResolveError {
    ResolveError::UnparsableFormat(format!("'{phrase}' is not a valid date"))
}

// ── Tests ───────────────────────────────────────────────────────────────────
