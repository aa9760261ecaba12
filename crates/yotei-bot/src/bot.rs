//! Message dispatch: turns one chat message into store operations and a reply.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use yotei_engine::{resolve_with_options, Cadence, ResolveOptions};

use crate::command::{parse_command, tokenize, Command, CommandError, REMIND_USAGE};
use crate::session::{PendingInput, SessionStore};
use crate::store::{MemoryStore, ReminderRecord, RemoveItem};

pub const HELP_TEXT: &str = "\
リマインド <日付> [時刻] <内容> [毎日|毎週|毎月]
リマインド一覧 / リマインド削除 <内容>
リスト作成 <名前> / リスト追加 <名前> [アイテム...]
リスト <名前> / リスト消去 <名前> <アイテム> / リスト削除 <名前> / リスト一覧
日付: 今日 明日 明後日 来週 再来週 N日後 N日 M月D日 YYYY年M月D日
時刻: 朝 昼 午後 夕方 夜 深夜 H時 H時M分 H:M";

/// Render a UTC instant as civil wall-clock text, e.g. `2026/10/19 09:00`.
pub fn format_civil(instant: DateTime<Utc>, options: &ResolveOptions) -> String {
    instant
        .with_timezone(&options.utc_offset)
        .format("%Y/%m/%d %H:%M")
        .to_string()
}

fn cadence_suffix(cadence: Cadence) -> String {
    if cadence.repeats() {
        format!("（{}）", cadence.label())
    } else {
        String::new()
    }
}

/// The chat bot. Cheap to share; all state lives in the stores.
pub struct Bot {
    store: Arc<MemoryStore>,
    sessions: Arc<SessionStore>,
    options: ResolveOptions,
}

impl Bot {
    pub fn new(store: Arc<MemoryStore>, sessions: Arc<SessionStore>, options: ResolveOptions) -> Self {
        Self {
            store,
            sessions,
            options,
        }
    }

    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Handle one message from `room_id`. Returns the reply, if any.
    ///
    /// Commands always take precedence over a pending session; other text is
    /// fed to the session, and ignored when there is none.
    pub fn handle(&self, room_id: &str, text: &str, now: DateTime<Utc>) -> Option<String> {
        match parse_command(text) {
            Ok(command) => {
                debug!(room_id, ?command, "Dispatching command");
                Some(self.dispatch(room_id, command, now))
            }
            Err(CommandError::Usage(usage)) => Some(usage.to_string()),
            Err(CommandError::NotACommand) => self.continue_session(room_id, text, now),
        }
    }

    fn dispatch(&self, room_id: &str, command: Command, now: DateTime<Utc>) -> String {
        match command {
            Command::Remind {
                date,
                time,
                body,
                cadence,
            } => self.remind(room_id, &date, time.as_deref(), body, cadence, now),
            Command::ListReminders => self.list_reminders(room_id),
            Command::DeleteReminder { name } => {
                match self.store.delete_reminders_named(room_id, &name) {
                    0 => format!("「{name}」というリマインドはありません"),
                    _ => format!("「{name}」のリマインドを削除しました"),
                }
            }
            Command::CreateList { name } => {
                if self.store.create_list(room_id, &name, now) {
                    format!("リスト「{name}」を作成しました")
                } else {
                    format!("リスト「{name}」はすでにあります")
                }
            }
            Command::AddItems { list, items } if items.is_empty() => {
                self.sessions
                    .open(room_id, PendingInput::ListItems { list: list.clone() }, now);
                format!("リスト「{list}」に追加するアイテムを送ってください。終わったら「終了」と送ってください")
            }
            Command::AddItems { list, items } => {
                let total = self.store.add_items(room_id, &list, &items, now);
                format!("リスト「{list}」に{}件追加しました（全{total}件）", items.len())
            }
            Command::ShowList { name } => match self.store.list(room_id, &name) {
                None => format!("リスト「{name}」はありません"),
                Some(list) if list.items.is_empty() => format!("リスト「{name}」は空です"),
                Some(list) => {
                    let mut out = format!("リスト「{name}」");
                    for item in &list.items {
                        out.push_str("\n・");
                        out.push_str(item);
                    }
                    out
                }
            },
            Command::DeleteList { name } => {
                if self.store.delete_list(room_id, &name) {
                    format!("リスト「{name}」を削除しました")
                } else {
                    format!("リスト「{name}」はありません")
                }
            }
            Command::RemoveItem { list, item } => {
                match self.store.remove_item(room_id, &list, &item, now) {
                    RemoveItem::Removed => format!("リスト「{list}」から「{item}」を消しました"),
                    RemoveItem::NoSuchItem => format!("リスト「{list}」に「{item}」はありません"),
                    RemoveItem::NoSuchList => format!("リスト「{list}」はありません"),
                }
            }
            Command::ListLists => {
                let names = self.store.list_names(room_id);
                if names.is_empty() {
                    "リストはありません".to_string()
                } else {
                    format!("リスト一覧\n・{}", names.join("\n・"))
                }
            }
            Command::EndInput => match self.sessions.close(room_id, now) {
                Some(PendingInput::ListItems { list }) => {
                    format!("リスト「{list}」への追加を終了しました")
                }
                None => "追加中のリストはありません".to_string(),
            },
            Command::Help => HELP_TEXT.to_string(),
        }
    }

    fn remind(
        &self,
        room_id: &str,
        date: &str,
        time: Option<&str>,
        body: String,
        cadence: Cadence,
        now: DateTime<Utc>,
    ) -> String {
        let resolved = resolve_with_options(date, time, now, &self.options);
        if !resolved.success {
            debug!(room_id, date, ?time, "Date/time rejected");
            return resolved
                .error_message
                .unwrap_or_else(|| REMIND_USAGE.to_string());
        }

        let when = format_civil(resolved.instant, &self.options);
        let reply = format!("{when} に「{body}」をリマインドします{}", cadence_suffix(cadence));
        self.store
            .insert_reminder(ReminderRecord::new(room_id, body, resolved.instant, cadence, now));
        reply
    }

    fn list_reminders(&self, room_id: &str) -> String {
        let reminders = self.store.reminders_for_room(room_id);
        if reminders.is_empty() {
            return "リマインドはありません".to_string();
        }
        let mut out = String::from("リマインド一覧");
        for r in &reminders {
            out.push_str(&format!(
                "\n・{} {}{}",
                format_civil(r.fire_at, &self.options),
                r.message,
                cadence_suffix(r.cadence)
            ));
        }
        out
    }

    fn continue_session(&self, room_id: &str, text: &str, now: DateTime<Utc>) -> Option<String> {
        match self.sessions.get(room_id, now)? {
            PendingInput::ListItems { list } => {
                let items: Vec<String> = tokenize(text).into_iter().map(String::from).collect();
                if items.is_empty() {
                    return None;
                }
                self.sessions.touch(room_id, now);
                let total = self.store.add_items(room_id, &list, &items, now);
                Some(format!(
                    "リスト「{list}」に{}件追加しました（全{total}件）",
                    items.len()
                ))
            }
        }
    }
}
