use anyhow::{Context, Result};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use super::config::LogFormat;

/// Builder for the process-wide tracing subscriber.
pub struct TelemetryBuilder {
    service_name: String,
    service_version: String,
    log_level: String,
    format: LogFormat,
}

impl TelemetryBuilder {
    /// Creates a builder logging at `info` in the pretty format.
    pub fn new(service_name: impl Into<String>, service_version: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            service_version: service_version.into(),
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }

    /// Sets the default filter directive. `RUST_LOG` still wins when set.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Sets the log line format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Filter built from `RUST_LOG`, falling back to the configured level.
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level))
    }

    /// Installs the subscriber as the global default.
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed.
    pub fn init(self) -> Result<()> {
        let env_filter = self.env_filter();

        let fmt_layer = match self.format {
            LogFormat::Json => fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .boxed(),
            LogFormat::Pretty => fmt::layer()
                .pretty()
                .with_span_events(FmtSpan::CLOSE)
                .boxed(),
        };

        Registry::default()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .context("Failed to init subscriber")?;

        tracing::debug!(
            service = %self.service_name,
            version = %self.service_version,
            format = %self.format,
            "telemetry initialized"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_records_level_and_format() {
        let builder = TelemetryBuilder::new("grove", "0.1.0")
            .with_log_level("debug")
            .with_format(LogFormat::Json);
        assert_eq!(builder.log_level, "debug");
        assert_eq!(builder.format, LogFormat::Json);
    }

    #[test]
    fn second_init_fails() {
        let _ = TelemetryBuilder::new("grove", "0.1.0").init();
        assert!(TelemetryBuilder::new("grove", "0.1.0").init().is_err());
    }
}
