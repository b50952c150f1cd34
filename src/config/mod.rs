use std::env;
use std::fmt::Display;
use std::str::FromStr;

use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::info;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;
const DEFAULT_REMINDER_WINDOW_DAYS: i64 = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. Without it the server keeps data in memory.
    pub database_url: Option<String>,
    pub port: u16,
    pub max_connections: u32,
    pub session_ttl: Duration,
    /// How far ahead upcoming-event reminders look.
    pub reminder_window: Duration,
    pub cors_allowed_origins: Option<String>,
    pub production: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            port: DEFAULT_PORT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            reminder_window: Duration::days(DEFAULT_REMINDER_WINDOW_DAYS),
            cors_allowed_origins: None,
            production: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let session_ttl_hours =
            parse_or(&lookup, "SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS)?;
        let reminder_window_days =
            parse_or(&lookup, "REMINDER_WINDOW_DAYS", DEFAULT_REMINDER_WINDOW_DAYS)?;

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                defaults.max_connections,
            )?,
            session_ttl: span(session_ttl_hours, "SESSION_TTL_HOURS", Duration::try_hours)?,
            reminder_window: span(
                reminder_window_days,
                "REMINDER_WINDOW_DAYS",
                Duration::try_days,
            )?,
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS"),
            production: lookup("RUST_ENV")
                .map(|v| v.to_lowercase() == "production")
                .unwrap_or(false),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

/// A positive span that can still be added to the current time.
fn span(
    value: i64,
    key: &'static str,
    unit: fn(i64) -> Option<Duration>,
) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if value <= 0 {
        return Err(invalid("must be greater than zero"));
    }

    unit(value)
        .filter(|span| Utc::now().checked_add_signed(*span).is_some())
        .ok_or_else(|| invalid("is too large"))
}
