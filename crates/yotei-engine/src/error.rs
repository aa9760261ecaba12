//! Error types for yotei-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Shown to the user when the resolved date/time is not in the future.
pub const PAST_DATETIME_MESSAGE: &str =
    "過去の日時は指定できません。未来の日時を指定してください。(The date and time must be in the future.)";

/// Shown to the user when the date/time phrase cannot be interpreted.
pub const UNPARSABLE_FORMAT_MESSAGE: &str =
    "日時の形式が正しくありません。例: 「明日 9時」「12月25日 15時30分」「3日後 夜」(Invalid date format, e.g. 明日 9時)";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Resolved datetime is not in the future: {instant}")]
    PastDateTime { instant: DateTime<Utc> },

    #[error("Unparsable format: {0}")]
    UnparsableFormat(String),
}

impl ResolveError {
    /// The fixed message to relay back to the chat user.
    pub fn user_message(&self) -> &'static str {
        match self {
            ResolveError::PastDateTime { .. } => PAST_DATETIME_MESSAGE,
            ResolveError::UnparsableFormat(_) => UNPARSABLE_FORMAT_MESSAGE,
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
