//! Application configuration loaded from environment variables.

use std::time::Duration;

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Orchestration settings with sensible defaults.
///
/// Reads from environment variables:
/// - `LODGING_BOOKING_HORIZON_DAYS`: bookings starting within this many days
///   block deletion (default: `30`)
/// - `LODGING_LOCK_TIMEOUT_MS`: how long to wait for an entity lock
///   (default: `5000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LODGING_LOG_FORMAT`: `pretty` or `json` (default: `pretty`)
///
/// Unparseable values fall back to the default.
#[derive(Debug, Clone)]
pub struct Config {
    pub booking_horizon_days: u32,
    pub lock_timeout: Duration,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            booking_horizon_days: lookup("LODGING_BOOKING_HORIZON_DAYS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.booking_horizon_days),
            lock_timeout: lookup("LODGING_LOCK_TIMEOUT_MS")
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.lock_timeout),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: lookup("LODGING_LOG_FORMAT")
                .and_then(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.log_format),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            booking_horizon_days: 30,
            lock_timeout: Duration::from_millis(5000),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
