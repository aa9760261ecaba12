//! `yotei` CLI: resolve date phrases, drive the reminder bot, and run sweeps.
//!
//! ## Usage
//!
//! ```sh
//! # Resolve a date/time phrase (prints JSON, exit 1 when rejected)
//! yotei resolve 明日 9時 --now 2026-10-18T03:00:00Z
//!
//! # Next occurrence of a repeating reminder
//! yotei next 2026-01-31T00:00:00Z monthly
//!
//! # Cadence named in free text
//! yotei cadence "ゴミ出し 毎週"
//!
//! # Send one message to the bot as a room; state persists in --state
//! yotei say --room r1 リマインド 明日 朝 ゴミ出し 毎週
//!
//! # Interactive: one message per stdin line
//! yotei chat --room r1
//!
//! # Deliver due reminders (cron this every minute) and purge stale data
//! yotei sweep
//! yotei cleanup
//!
//! # Verify a webhook body against its signature header
//! yotei verify --signature "$SIG" -i body.json
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use yotei_bot::{
    deliver_due, load_config_from, purge_stale, verify_signature, Bot, Config, DeliveryError,
    MemoryStore, SessionStore,
};
use yotei_engine::{
    advance_with_offset, extract_cadence, resolve_with_options, Cadence, Occurrence,
};

#[derive(Parser)]
#[command(
    name = "yotei",
    version,
    about = "Japanese reminder and list bot CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (defaults are used if it does not exist)
    #[arg(long, global = true, default_value = "yotei.toml")]
    config: PathBuf,

    /// JSON state file for reminders and lists
    #[arg(long, global = true, default_value = "yotei-state.json")]
    state: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a date phrase and optional time phrase to a UTC instant
    Resolve {
        /// Date phrase, e.g. 明日, 3日後, 12月25日
        date: String,
        /// Time phrase, e.g. 朝, 15時30分, 9:00
        time: Option<String>,
        /// Reference instant (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<String>,
    },
    /// Compute the next occurrence of a repeating reminder
    Next {
        /// Previous fire instant (RFC 3339)
        fire_at: String,
        /// Cadence tag: none, daily, weekly, monthly
        cadence: String,
    },
    /// Print the cadence named in free text
    Cadence {
        /// Free text, e.g. "ゴミ出し 毎週"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Send one message to the bot as a room
    Say {
        /// Room ID the message comes from
        #[arg(long)]
        room: String,
        /// Reference instant (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<String>,
        /// Message text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Read messages from stdin, one per line, and print the replies
    Chat {
        /// Room ID the messages come from
        #[arg(long)]
        room: String,
    },
    /// Deliver due reminders to stdout and reschedule repeating ones
    Sweep {
        /// Reference instant (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<String>,
    },
    /// Purge completed reminders and idle lists older than the configured age
    ///
    /// List-item sessions only live inside a single `chat` process, so the
    /// reported `sessions_expired` is always 0 here.
    Cleanup {
        /// Reference instant (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<String>,
    },
    /// Verify a webhook body against its base64 HMAC-SHA256 signature
    Verify {
        /// Signature header value
        #[arg(long)]
        signature: String,
        /// Body file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config_from(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    let options = config.resolve_options()?;
    tracing::debug!(
        config = %cli.config.display(),
        state = %cli.state.display(),
        utc_offset = %options.utc_offset,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Resolve { date, time, now } => {
            let now = parse_now(now.as_deref())?;
            let result = resolve_with_options(&date, time.as_deref(), now, &options);
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.success {
                process::exit(1);
            }
        }
        Commands::Next { fire_at, cadence } => {
            let fire_at = parse_instant(&fire_at)?;
            match advance_with_offset(fire_at, Cadence::from_tag(&cadence), options.utc_offset) {
                Occurrence::Next(next) => println!("{}", next.to_rfc3339()),
                Occurrence::Finished => println!("finished"),
            }
        }
        Commands::Cadence { text } => {
            println!("{}", extract_cadence(&text.join(" ")));
        }
        Commands::Say { room, now, text } => {
            let now = parse_now(now.as_deref())?;
            let bot = open_bot(&config, &cli.state)?;
            if let Some(reply) = bot.handle(&room, &text.join(" "), now) {
                println!("{reply}");
            }
            save_state(bot.store(), &cli.state)?;
        }
        Commands::Chat { room } => {
            let bot = open_bot(&config, &cli.state)?;
            let stdin = io::stdin();
            let mut stdout = io::stdout().lock();
            for line in stdin.lock().lines() {
                let line = line.context("Failed to read from stdin")?;
                if let Some(reply) = bot.handle(&room, &line, Utc::now()) {
                    writeln!(stdout, "{reply}")?;
                }
            }
            save_state(bot.store(), &cli.state)?;
        }
        Commands::Sweep { now } => {
            let now = parse_now(now.as_deref())?;
            let store = load_state(&cli.state)?;
            let mut print = |room: &str, text: &str| -> Result<(), DeliveryError> {
                println!("[{room}] {text}");
                Ok(())
            };
            let report = deliver_due(&store, &mut print, now, options.utc_offset);
            eprintln!(
                "delivered: {}, rescheduled: {}, completed: {}, failed: {}",
                report.delivered, report.rescheduled, report.completed, report.failed
            );
            save_state(&store, &cli.state)?;
        }
        Commands::Cleanup { now } => {
            let now = parse_now(now.as_deref())?;
            let store = load_state(&cli.state)?;
            let sessions = SessionStore::new(config.session_ttl());
            let report = purge_stale(&store, &sessions, now, config.stale_after());
            println!("{}", serde_json::to_string_pretty(&report)?);
            save_state(&store, &cli.state)?;
        }
        Commands::Verify { signature, input } => {
            let secret = config.channel_secret.as_deref().with_context(|| {
                format!(
                    "No channel_secret configured (set it in {} or {})",
                    cli.config.display(),
                    yotei_bot::config::CHANNEL_SECRET_ENV
                )
            })?;
            let body = read_input(input.as_deref())?;
            if verify_signature(secret, &body, &signature) {
                println!("valid");
            } else {
                println!("invalid");
                process::exit(1);
            }
        }
    }

    Ok(())
}

fn open_bot(config: &Config, state: &Path) -> Result<Bot> {
    let store = load_state(state)?;
    Ok(Bot::new(
        Arc::new(store),
        Arc::new(SessionStore::new(config.session_ttl())),
        config.resolve_options()?,
    ))
}

fn load_state(path: &Path) -> Result<MemoryStore> {
    MemoryStore::load(path).with_context(|| format!("Failed to load state: {}", path.display()))
}

fn save_state(store: &MemoryStore, path: &Path) -> Result<()> {
    store
        .save(path)
        .with_context(|| format!("Failed to write state: {}", path.display()))
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid RFC 3339 datetime: '{s}'"))
}

fn parse_now(s: Option<&str>) -> Result<DateTime<Utc>> {
    match s {
        Some(s) => parse_instant(s),
        None => Ok(Utc::now()),
    }
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).with_context(|| format!("Failed to read file: {}", path)),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
