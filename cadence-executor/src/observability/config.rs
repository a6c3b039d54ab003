//! Configuration types for logging.

use std::env;
use std::str::FromStr;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON lines.
    Json,
    /// Multi-line human-readable output.
    Pretty,
    /// Single-line output.
    #[default]
    Compact,
}

impl FromStr for LogFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        })
    }
}

/// Configuration for the tracing subscriber.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// `EnvFilter` directive string (e.g. "info,cadence_executor=trace").
    log_filter: String,
    /// Output format.
    log_format: LogFormat,
    /// Whether to print event targets.
    include_target: bool,
    /// Whether to print file and line.
    include_location: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            log_format: LogFormat::default(),
            include_target: true,
            include_location: false,
        }
    }
}

impl TracingConfig {
    /// Create a new builder.
    pub fn builder() -> TracingConfigBuilder {
        TracingConfigBuilder::default()
    }

    /// Create configuration from environment variables.
    ///
    /// - `CADENCE_LOG_FORMAT`: "json", "pretty", or "compact"
    /// - `CADENCE_LOG` or `RUST_LOG`: filter string
    /// - `CADENCE_LOG_LOCATION`: "true" or "1" to print file and line
    pub fn from_env() -> Self {
        let log_format = env::var("CADENCE_LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse::<LogFormat>().ok())
            .unwrap_or_default();

        let log_filter = env::var("CADENCE_LOG")
            .or_else(|_| env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());

        Self {
            log_filter,
            log_format,
            include_target: true,
            include_location: env::var("CADENCE_LOG_LOCATION")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(false),
        }
    }

    /// Get the log filter.
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Get the log format.
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Check if targets should be included.
    pub fn include_target(&self) -> bool {
        self.include_target
    }

    /// Check if source location should be included.
    pub fn include_location(&self) -> bool {
        self.include_location
    }
}

/// Builder for [`TracingConfig`].
#[derive(Debug, Clone, Default)]
pub struct TracingConfigBuilder {
    log_filter: Option<String>,
    log_format: Option<LogFormat>,
    include_target: Option<bool>,
    include_location: Option<bool>,
}

impl TracingConfigBuilder {
    /// Set the filter string.
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Set the output format.
    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = Some(format);
        self
    }

    /// Print event targets.
    pub fn include_target(mut self, include: bool) -> Self {
        self.include_target = Some(include);
        self
    }

    /// Print file and line.
    pub fn include_location(mut self, include: bool) -> Self {
        self.include_location = Some(include);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> TracingConfig {
        let defaults = TracingConfig::default();
        TracingConfig {
            log_filter: self.log_filter.unwrap_or(defaults.log_filter),
            log_format: self.log_format.unwrap_or(defaults.log_format),
            include_target: self.include_target.unwrap_or(defaults.include_target),
            include_location: self.include_location.unwrap_or(defaults.include_location),
        }
    }
}
