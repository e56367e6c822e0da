//! Logging options.

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

/// Layout applied to every log line unless overridden.
pub const DEFAULT_LOG_LAYOUT: &str = "[${longdate}] ${level}: ${logger} - ${message}";

/// Minimum severity written to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    /// Kept for existing settings files; treated as `error`.
    Fatal,
    Off,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Fatal => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,

    /// Line layout; see [`crate::logging::Layout`] for the placeholders.
    pub layout: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            layout: DEFAULT_LOG_LAYOUT.to_string(),
        }
    }
}
