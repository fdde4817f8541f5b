//! Telemetry configuration.
//!
//! Selects the log verbosity and the shape of emitted log lines.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendering of log lines.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, multi-line records.
    #[default]
    Pretty,
    /// One JSON object per record.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Telemetry configuration settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct TelemetrySettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log line format.
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}
