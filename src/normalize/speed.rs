use super::error::ConversionError;
use super::fixed;

pub const MS_TO_KMH: f64 = 3.6;

/// Upper bound for a speed cell. Keeps every derived km/h value exactly
/// representable in fixed point at any supported precision.
pub const MAX_SPEED_MS: f64 = 1_000_000.0;

pub fn to_kmh(speed_ms: f64) -> f64 {
    speed_ms * MS_TO_KMH
}

/// Parses a speed cell in meters per second. Speeds are non-negative and at
/// most [`MAX_SPEED_MS`].
pub fn parse_speed_ms(raw: &str) -> Result<f64, ConversionError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConversionError::NotNumeric(raw.to_string()))?;
    if !value.is_finite() {
        return Err(ConversionError::NonFinite(value));
    }
    if value < 0.0 {
        return Err(ConversionError::NegativeSpeed(value));
    }
    if value > MAX_SPEED_MS {
        return Err(ConversionError::SpeedTooLarge(value));
    }
    Ok(value)
}

pub fn display_kmh(speed_kmh: f64, precision: u32) -> String {
    fixed::display(speed_kmh, precision)
}

/// Inclusive threshold test, evaluated on the displayed digits.
pub fn meets_threshold(speed_kmh: f64, threshold_kmh: f64, precision: u32) -> bool {
    fixed::quantize(speed_kmh, precision) >= fixed::quantize(threshold_kmh, precision)
}
