//! Loop harness settings.

use cadence_core::error::{CadenceError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Settings for a [`LoopDriver`](super::LoopDriver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Minimum loop period in milliseconds. Zero runs unregulated.
    #[serde(default = "default_target_period_ms")]
    pub target_period_ms: u64,

    /// Stop after this many loops. `None` runs until a stop is requested.
    #[serde(default)]
    pub max_loops: Option<u64>,
}

fn default_target_period_ms() -> u64 {
    10
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_period_ms: default_target_period_ms(),
            max_loops: None,
        }
    }
}

impl LoopConfig {
    /// Parse from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| CadenceError::YamlParse {
            cause: e.to_string(),
        })
    }

    /// Read from `CADENCE_LOOP_PERIOD_MS` and `CADENCE_MAX_LOOPS`.
    ///
    /// Unset variables keep their defaults; unparsable ones are errors.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(raw) = env::var("CADENCE_LOOP_PERIOD_MS") {
            config.target_period_ms = parse_env("CADENCE_LOOP_PERIOD_MS", &raw)?;
        }
        if let Ok(raw) = env::var("CADENCE_MAX_LOOPS") {
            config.max_loops = Some(parse_env("CADENCE_MAX_LOOPS", &raw)?);
        }
        Ok(config)
    }

    /// Minimum loop period.
    pub fn target_period(&self) -> Duration {
        Duration::from_millis(self.target_period_ms)
    }
}

fn parse_env(field: &str, raw: &str) -> Result<u64> {
    raw.trim().parse().map_err(|e| CadenceError::ConfigValue {
        field: field.to_string(),
        cause: format!("'{}': {}", raw, e),
    })
}
