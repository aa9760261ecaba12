//! Command-token parsing for chat messages.
//!
//! A message is a command when its first whitespace-separated token is one of
//! the keywords below. Tokens are split on ASCII and ideographic spaces.

use thiserror::Error;
use yotei_engine::{extract_cadence, is_date_phrase, is_time_phrase, strip_cadence_keywords, Cadence};

pub const REMIND: &str = "リマインド";
pub const REMIND_LIST: &str = "リマインド一覧";
pub const REMIND_DELETE: &str = "リマインド削除";
pub const LIST_CREATE: &str = "リスト作成";
pub const LIST_ADD: &str = "リスト追加";
pub const LIST_SHOW: &str = "リスト";
pub const LIST_DELETE: &str = "リスト削除";
pub const LIST_REMOVE_ITEM: &str = "リスト消去";
pub const LIST_INDEX: &str = "リスト一覧";
pub const END_INPUT: &str = "終了";
pub const HELP: &[&str] = &["ヘルプ", "help"];

pub const REMIND_USAGE: &str = "使い方: リマインド <日付> [時刻] <内容> [毎日|毎週|毎月]\n例: リマインド 明日 9時 ゴミ出し";
pub const REMIND_DELETE_USAGE: &str = "使い方: リマインド削除 <内容>";
pub const LIST_CREATE_USAGE: &str = "使い方: リスト作成 <リスト名>";
pub const LIST_ADD_USAGE: &str = "使い方: リスト追加 <リスト名> [アイテム...]";
pub const LIST_SHOW_USAGE: &str = "使い方: リスト <リスト名>";
pub const LIST_DELETE_USAGE: &str = "使い方: リスト削除 <リスト名>";
pub const LIST_REMOVE_ITEM_USAGE: &str = "使い方: リスト消去 <リスト名> <アイテム>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Schedule a reminder. `date` is empty when the message named no date.
    Remind {
        date: String,
        time: Option<String>,
        body: String,
        cadence: Cadence,
    },
    ListReminders,
    DeleteReminder { name: String },
    CreateList { name: String },
    /// Add items; with no items the bot waits for them in follow-up messages.
    AddItems { list: String, items: Vec<String> },
    ShowList { name: String },
    DeleteList { name: String },
    RemoveItem { list: String, item: String },
    ListLists,
    EndInput,
    Help,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("not a command")]
    NotACommand,
    /// A keyword was given without its required arguments.
    #[error("{0}")]
    Usage(&'static str),
}

/// Split on any whitespace, including the ideographic space U+3000.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Parse a chat message into a [`Command`].
///
/// # Errors
///
/// [`CommandError::NotACommand`] when the first token is not a keyword, and
/// [`CommandError::Usage`] when a keyword lacks required arguments.
pub fn parse_command(text: &str) -> Result<Command, CommandError> {
    let tokens = tokenize(text);
    let Some((&keyword, args)) = tokens.split_first() else {
        return Err(CommandError::NotACommand);
    };

    match keyword {
        REMIND => parse_remind(args),
        REMIND_LIST => Ok(Command::ListReminders),
        REMIND_DELETE => Ok(Command::DeleteReminder {
            name: joined(args, REMIND_DELETE_USAGE)?,
        }),
        LIST_CREATE => Ok(Command::CreateList {
            name: first(args, LIST_CREATE_USAGE)?,
        }),
        LIST_ADD => Ok(Command::AddItems {
            list: first(args, LIST_ADD_USAGE)?,
            items: args.iter().skip(1).map(|s| s.to_string()).collect(),
        }),
        LIST_SHOW => Ok(Command::ShowList {
            name: first(args, LIST_SHOW_USAGE)?,
        }),
        LIST_DELETE => Ok(Command::DeleteList {
            name: first(args, LIST_DELETE_USAGE)?,
        }),
        LIST_REMOVE_ITEM => {
            if args.len() < 2 {
                return Err(CommandError::Usage(LIST_REMOVE_ITEM_USAGE));
            }
            Ok(Command::RemoveItem {
                list: args[0].to_string(),
                item: args[1..].join(" "),
            })
        }
        LIST_INDEX => Ok(Command::ListLists),
        END_INPUT if args.is_empty() => Ok(Command::EndInput),
        k if HELP.contains(&k) => Ok(Command::Help),
        _ => Err(CommandError::NotACommand),
    }
}

/// `リマインド [cadence...] [date] [time] body...`
///
/// Tokens made only of cadence keywords are skipped wherever they appear.
/// The first remaining token is the date phrase if it is one, the next is the
/// time phrase if it is one, and the rest is the body.
fn parse_remind(args: &[&str]) -> Result<Command, CommandError> {
    let cadence = extract_cadence(&args.join(" "));
    let mut rest: Vec<&str> = args
        .iter()
        .copied()
        .filter(|t| !strip_cadence_keywords(t).is_empty())
        .collect();

    let date = match rest.first() {
        Some(t) if is_date_phrase(t) => rest.remove(0).to_string(),
        _ => String::new(),
    };
    let time = match rest.first() {
        Some(t) if is_time_phrase(t) => Some(rest.remove(0).to_string()),
        _ => None,
    };

    let body = strip_cadence_keywords(&rest.join(" "));
    if body.is_empty() {
        return Err(CommandError::Usage(REMIND_USAGE));
    }
    Ok(Command::Remind {
        date,
        time,
        body,
        cadence,
    })
}

fn first(args: &[&str], usage: &'static str) -> Result<String, CommandError> {
    args.first()
        .map(|s| s.to_string())
        .ok_or(CommandError::Usage(usage))
}

fn joined(args: &[&str], usage: &'static str) -> Result<String, CommandError> {
    if args.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    Ok(args.join(" "))
}
