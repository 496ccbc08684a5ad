use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("'{0}' is not a number")]
    NotNumeric(String),
    #[error("{0} is not a finite value")]
    NonFinite(f64),
    #[error("{0} days is outside the supported date range")]
    OutOfRange(f64),
    #[error("speed {0} m/s is negative")]
    NegativeSpeed(f64),
    #[error("speed {0} m/s is above the supported maximum")]
    SpeedTooLarge(f64),
}
