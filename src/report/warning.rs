use serde::Serialize;
use thiserror::Error;

/// A recoverable problem met while building the report. The run continues
/// and the warning is stored with the output.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    #[error("column '{column}' not found, views depending on it are skipped")]
    MissingColumn { column: String },
    #[error("row {row}: cannot convert {column} value '{value}': {reason}")]
    Conversion {
        row: usize,
        column: String,
        value: String,
        reason: String,
    },
    #[error("{count} samples above the speed threshold have no timestamp and were dropped")]
    UntimedSamples { count: usize },
    #[error("no samples reach {threshold_kmh} km/h, sprint views are empty")]
    EmptyResult { threshold_kmh: f64 },
}

impl Warning {
    /// Whether the warning means data present in the input is missing from
    /// the derived views.
    pub fn degrades_output(&self) -> bool {
        !matches!(self, Warning::EmptyResult { .. })
    }
}
