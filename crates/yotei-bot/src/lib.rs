//! # yotei-bot
//!
//! Chat-side glue around [`yotei_engine`]: a command parser for list and
//! reminder messages, an in-memory store with JSON snapshots, per-room
//! sessions, the delivery and cleanup sweeps, and webhook signature checks.
//!
//! ## Modules
//!
//! - [`command`]: message text → [`Command`]
//! - [`bot`]: [`Bot::handle`] dispatches a message and builds the reply
//! - [`store`]: reminders and lists keyed by room
//! - [`session`]: "waiting for list items" state with expiry
//! - [`sweep`]: due-reminder delivery and stale-data cleanup
//! - [`signature`]: HMAC-SHA256 webhook signatures
//! - [`config`]: TOML configuration

pub mod bot;
pub mod command;
pub mod config;
pub mod session;
pub mod signature;
pub mod store;
pub mod sweep;

pub use bot::{format_civil, Bot};
pub use command::{parse_command, Command, CommandError};
pub use config::{load_config_from, Config, ConfigError};
pub use session::{PendingInput, SessionStore};
pub use signature::{sign, verify_signature};
pub use store::{ListRecord, MemoryStore, ReminderRecord, ReminderStatus, StoreError};
pub use sweep::{deliver_due, purge_stale, CleanupReport, Deliverer, DeliveryError, SweepReport};
