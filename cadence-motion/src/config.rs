//! Tuning knobs for reparameterization and profile generation.

use cadence_core::error::{CadenceError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Settings for arc-length reparameterization of parametric curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReparamConfig {
    /// Largest arc length covered by one mapping sample.
    #[serde(default = "default_max_segment_length")]
    pub max_segment_length: f64,

    /// Largest tangent turn, in radians, within one mapping sample.
    #[serde(default = "default_max_angle_change")]
    pub max_angle_change: f64,

    /// Subdivision depth limit; each level halves the parameter interval.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

fn default_max_segment_length() -> f64 {
    0.02
}
fn default_max_angle_change() -> f64 {
    0.02
}
fn default_max_depth() -> u32 {
    16
}

impl Default for ReparamConfig {
    fn default() -> Self {
        Self {
            max_segment_length: default_max_segment_length(),
            max_angle_change: default_max_angle_change(),
            max_depth: default_max_depth(),
        }
    }
}

impl ReparamConfig {
    /// Parse from a YAML document and validate.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = parse_yaml(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject non-positive tolerances.
    pub fn validate(&self) -> Result<()> {
        require_positive("max_segment_length", self.max_segment_length)?;
        require_positive("max_angle_change", self.max_angle_change)
    }
}

/// Settings for the motion profile generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileGenConfig {
    /// Largest arc length between two profile samples.
    #[serde(default = "default_max_segment_size")]
    pub max_segment_size: f64,

    /// Velocity resolution when searching for the largest feasible
    /// velocity at a sample.
    #[serde(default = "default_velocity_search_tolerance")]
    pub velocity_search_tolerance: f64,

    /// Iteration cap for that search.
    #[serde(default = "default_velocity_search_iterations")]
    pub velocity_search_iterations: u32,

    /// Largest number of samples a single profile may use.
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,
}

fn default_max_segment_size() -> f64 {
    0.01
}
fn default_velocity_search_tolerance() -> f64 {
    1e-6
}
fn default_velocity_search_iterations() -> u32 {
    64
}
fn default_max_samples() -> usize {
    1_000_000
}

impl Default for ProfileGenConfig {
    fn default() -> Self {
        Self {
            max_segment_size: default_max_segment_size(),
            velocity_search_tolerance: default_velocity_search_tolerance(),
            velocity_search_iterations: default_velocity_search_iterations(),
            max_samples: default_max_samples(),
        }
    }
}

impl ProfileGenConfig {
    /// Parse from a YAML document and validate.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = parse_yaml(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject non-positive sizes and counts.
    pub fn validate(&self) -> Result<()> {
        require_positive("max_segment_size", self.max_segment_size)?;
        require_positive("velocity_search_tolerance", self.velocity_search_tolerance)?;
        if self.velocity_search_iterations == 0 {
            return Err(CadenceError::ConfigValue {
                field: "velocity_search_iterations".to_string(),
                cause: "must be at least 1".to_string(),
            });
        }
        if self.max_samples < 2 {
            return Err(CadenceError::ConfigValue {
                field: "max_samples".to_string(),
                cause: format!("must be at least 2, got {}", self.max_samples),
            });
        }
        Ok(())
    }
}

fn parse_yaml<T: DeserializeOwned>(yaml: &str) -> Result<T> {
    serde_yaml::from_str(yaml).map_err(|e| CadenceError::YamlParse {
        cause: e.to_string(),
    })
}

fn require_positive(field: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(CadenceError::ConfigValue {
            field: field.to_string(),
            cause: format!("must be positive and finite, got {}", value),
        })
    }
}
