//! Logging configuration

use crate::error::{RedcapError, RedcapResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = RedcapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(RedcapError::config(format!("Unknown log format: {}", other))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        };
        write!(f, "{}", name)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error, off)
    pub level: String,
    /// Log format (pretty, compact, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl LoggingConfig {
    /// Merge with another logging config
    pub fn merge(&mut self, other: LoggingConfig) {
        let default = LoggingConfig::default();
        if !other.level.is_empty() && other.level != default.level {
            self.level = other.level;
        }
        if other.format != default.format {
            self.format = other.format;
        }
    }

    pub fn validate(&self) -> RedcapResult<()> {
        if LEVELS.contains(&self.level.to_lowercase().as_str()) {
            Ok(())
        } else {
            Err(RedcapError::config(format!(
                "Unknown log level '{}', expected one of: {}",
                self.level,
                LEVELS.join(", ")
            )))
        }
    }
}
