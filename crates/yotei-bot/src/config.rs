//! Bot configuration, loaded from a TOML file with every field defaulted.

use std::path::Path;

use chrono::{Duration, FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use yotei_engine::civil::offset_from_hours;
use yotei_engine::{ResolveOptions, DEFAULT_UTC_OFFSET_HOURS};

/// Environment variable that overrides `channel_secret`.
pub const CHANNEL_SECRET_ENV: &str = "YOTEI_CHANNEL_SECRET";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Civil timezone as whole hours east of UTC.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    /// Hour used when a reminder names no time.
    #[serde(default = "default_hour")]
    pub default_hour: u32,
    /// Completed reminders and idle lists older than this are purged.
    #[serde(default = "default_stale_after_days")]
    pub stale_after_days: i64,
    /// How long a room may stay in "waiting for list items" mode.
    #[serde(default = "default_session_ttl_minutes")]
    pub session_ttl_minutes: i64,
    /// Webhook signing secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_secret: Option<String>,
}

fn default_utc_offset_hours() -> i32 {
    DEFAULT_UTC_OFFSET_HOURS
}

fn default_hour() -> u32 {
    9
}

fn default_stale_after_days() -> i64 {
    30
}

fn default_session_ttl_minutes() -> i64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
            default_hour: default_hour(),
            stale_after_days: default_stale_after_days(),
            session_ttl_minutes: default_session_ttl_minutes(),
            channel_secret: None,
        }
    }
}

impl Config {
    /// Check value ranges. Called by the loaders.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.utc_offset()?;
        if self.default_hour > 23 {
            return Err(ConfigError::Invalid(format!(
                "default_hour must be 0-23, got {}",
                self.default_hour
            )));
        }
        if self.stale_after_days < 1 {
            return Err(ConfigError::Invalid(format!(
                "stale_after_days must be positive, got {}",
                self.stale_after_days
            )));
        }
        if self.session_ttl_minutes < 1 {
            return Err(ConfigError::Invalid(format!(
                "session_ttl_minutes must be positive, got {}",
                self.session_ttl_minutes
            )));
        }
        Ok(())
    }

    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        offset_from_hours(self.utc_offset_hours).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "utc_offset_hours must be within ±23, got {}",
                self.utc_offset_hours
            ))
        })
    }

    pub fn resolve_options(&self) -> Result<ResolveOptions, ConfigError> {
        let default_time = NaiveTime::from_hms_opt(self.default_hour, 0, 0).ok_or_else(|| {
            ConfigError::Invalid(format!("default_hour must be 0-23, got {}", self.default_hour))
        })?;
        Ok(ResolveOptions {
            utc_offset: self.utc_offset()?,
            default_time,
        })
    }

    pub fn stale_after(&self) -> Duration {
        Duration::days(self.stale_after_days)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::minutes(self.session_ttl_minutes)
    }
}

/// Parse and validate a TOML document.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from `path`, falling back to defaults if not found.
///
/// `YOTEI_CHANNEL_SECRET`, when set, overrides the file's `channel_secret`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        parse_config(&content)?
    } else {
        debug!("Config file not found at {}, using defaults", path.display());
        Config::default()
    };

    if let Ok(secret) = std::env::var(CHANNEL_SECRET_ENV) {
        if !secret.is_empty() {
            config.channel_secret = Some(secret);
        }
    }
    Ok(config)
}
