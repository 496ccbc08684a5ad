use thiserror::Error;

use crate::config::ConfigError;
use crate::input::InputError;
use crate::report::SinkError;

/// Errors that abort the run. Everything else is a report warning.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("input: {0}")]
    Input(#[from] InputError),
    #[error("output: {0}")]
    Sink(#[from] SinkError),
}
