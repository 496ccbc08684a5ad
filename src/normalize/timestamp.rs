//! Spreadsheet serial dates.
//!
//! A serial date counts days since 1899-12-30 00:00:00, the origin used by
//! spreadsheet applications. Fractions of a day carry the time of day.
//!
//! Exported serial values carry about ten decimals, which is a few
//! microseconds of noise. Instants are therefore rounded to the nearest
//! millisecond, the resolution the report displays, before any gap or
//! duration is computed from them.

use chrono::{DateTime, Duration, NaiveDateTime};

use super::error::ConversionError;

pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const MILLIS_PER_DAY: f64 = 86_400_000.0;
const UNIX_EPOCH_SERIAL_DAYS: i64 = 25_569;

pub fn spreadsheet_epoch() -> NaiveDateTime {
    DateTime::UNIX_EPOCH.naive_utc() - Duration::days(UNIX_EPOCH_SERIAL_DAYS)
}

/// Converts a serial day count to an instant, rounded to the nearest
/// millisecond.
pub fn from_serial_days(days: f64) -> Result<NaiveDateTime, ConversionError> {
    if !days.is_finite() {
        return Err(ConversionError::NonFinite(days));
    }
    let millis = (days * MILLIS_PER_DAY).round();
    if millis.abs() >= i64::MAX as f64 {
        return Err(ConversionError::OutOfRange(days));
    }
    spreadsheet_epoch()
        .checked_add_signed(Duration::milliseconds(millis as i64))
        .ok_or(ConversionError::OutOfRange(days))
}

pub fn parse_serial_days(raw: &str) -> Result<NaiveDateTime, ConversionError> {
    let days: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConversionError::NotNumeric(raw.to_string()))?;
    from_serial_days(days)
}

/// `YYYY-MM-DD HH:MM:SS.mmm`, milliseconds truncated.
pub fn display(timestamp: &NaiveDateTime) -> String {
    timestamp.format(DISPLAY_FORMAT).to_string()
}
