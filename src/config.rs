use chrono::Duration;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use thiserror::Error;

use crate::normalize::fixed::MAX_PRECISION;
use crate::normalize::speed;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub columns: ColumnsConfig,
    #[serde(default)]
    pub sprint: SprintConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnsConfig {
    #[serde(default = "default_timestamp_column")]
    pub timestamp: String,
    #[serde(default = "default_speed_column")]
    pub speed: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            timestamp: default_timestamp_column(),
            speed: default_speed_column(),
        }
    }
}

fn default_timestamp_column() -> String {
    "Excel Timestamp".to_string()
}

fn default_speed_column() -> String {
    "Speed".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SprintConfig {
    #[serde(default = "default_speed_threshold")]
    pub speed_threshold_kmh: f64,
    #[serde(
        default = "default_gap_threshold",
        deserialize_with = "deserialize_duration"
    )]
    pub gap_threshold: Duration,
    #[serde(
        default = "default_min_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub min_duration: Duration,
    #[serde(default = "default_precision")]
    pub precision: u32,
}

impl Default for SprintConfig {
    fn default() -> Self {
        Self {
            speed_threshold_kmh: default_speed_threshold(),
            gap_threshold: default_gap_threshold(),
            min_duration: default_min_duration(),
            precision: default_precision(),
        }
    }
}

fn default_speed_threshold() -> f64 {
    25.2
}

fn default_gap_threshold() -> Duration {
    Duration::seconds(5)
}

fn default_min_duration() -> Duration {
    Duration::seconds(1)
}

fn default_precision() -> u32 {
    3
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sprint = &self.sprint;
        let max_kmh = speed::to_kmh(speed::MAX_SPEED_MS);
        if !(0.0..=max_kmh).contains(&sprint.speed_threshold_kmh) {
            return Err(invalid(
                "speed_threshold_kmh",
                format!(
                    "expected a number between 0 and {}, got {}",
                    max_kmh, sprint.speed_threshold_kmh
                ),
            ));
        }
        if sprint.precision > MAX_PRECISION {
            return Err(invalid(
                "precision",
                format!("at most {} digits are supported", MAX_PRECISION),
            ));
        }
        if self.columns.timestamp.trim().is_empty() || self.columns.speed.trim().is_empty() {
            return Err(invalid("columns", "column names must not be empty".to_string()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, message: String) -> ConfigError {
    ConfigError::Invalid { field, message }
}

/// Parses a human readable duration such as `5s` or `1s 500ms`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| Duration::from_std(d).map_err(|e| e.to_string()))
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw).map_err(serde::de::Error::custom)
}
