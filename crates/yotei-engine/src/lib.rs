//! # yotei-engine
//!
//! Deterministic date/time normalization and reminder scheduling for a
//! Japanese-language reminder bot.
//!
//! Every function here is pure: the caller provides the reference "now", and
//! all calendar arithmetic happens in a fixed civil timezone (UTC+9 by
//! default, no daylight saving). Timestamps leave the crate in UTC.
//!
//! ## Modules
//!
//! - [`resolver`]: date phrase + time phrase → UTC instant, rejecting the past
//! - [`recurrence`]: previous fire instant + cadence → next instant or finished
//! - [`cadence`]: cadence tags and keyword extraction from free text
//! - [`civil`]: the fixed civil zone and month-end clamping
//! - [`error`]: error types and the fixed user-facing messages

pub mod cadence;
pub mod civil;
pub mod error;
pub mod recurrence;
pub mod resolver;

pub use cadence::{extract_cadence, strip_cadence_keywords, Cadence};
pub use civil::DEFAULT_UTC_OFFSET_HOURS;
pub use error::{ResolveError, PAST_DATETIME_MESSAGE, UNPARSABLE_FORMAT_MESSAGE};
pub use recurrence::{advance, advance_with_offset, next_after, Occurrence};
pub use resolver::{
    is_date_phrase, is_time_phrase, resolve, resolve_with_options, try_resolve,
    try_resolve_with_options, ResolveOptions, ResolvedDateTime,
};
