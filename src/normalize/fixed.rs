//! Fixed-point helpers shared by every numeric column of the report.
//!
//! Values are scaled to an integer count of `10^-precision` units before they
//! are compared or printed, so a threshold test and the digits shown next to
//! it can never disagree. Rounding is half away from zero everywhere.

use chrono::Duration;

/// Largest precision the report accepts.
pub const MAX_PRECISION: u32 = 6;

const MICROS_PRECISION: u32 = 6;

/// Scales `value` to `10^-precision` units, rounding half away from zero.
pub fn quantize(value: f64, precision: u32) -> i64 {
    (value * 10f64.powi(precision as i32)).round() as i64
}

/// Formats an integer count of `10^-precision` units as a decimal string
/// with exactly `precision` fractional digits.
pub fn format_fixed(units: i64, precision: u32) -> String {
    if precision == 0 {
        return units.to_string();
    }
    let scale = 10u64.pow(precision);
    let sign = if units < 0 { "-" } else { "" };
    let abs = units.unsigned_abs();
    format!(
        "{}{}.{:0width$}",
        sign,
        abs / scale,
        abs % scale,
        width = precision as usize
    )
}

pub fn display(value: f64, precision: u32) -> String {
    format_fixed(quantize(value, precision), precision)
}

/// Seconds of `duration` in `10^-precision` units.
pub fn quantize_seconds(duration: Duration, precision: u32) -> i64 {
    match duration.num_microseconds() {
        Some(micros) => rescale(micros, MICROS_PRECISION, precision),
        None => quantize(duration.num_milliseconds() as f64 / 1000.0, precision),
    }
}

pub fn display_seconds(duration: Duration, precision: u32) -> String {
    format_fixed(quantize_seconds(duration, precision), precision)
}

fn rescale(value: i64, from: u32, to: u32) -> i64 {
    if to >= from {
        return value.saturating_mul(10i64.pow(to - from));
    }
    let divisor = 10i64.pow(from - to);
    let quotient = value / divisor;
    let remainder = value % divisor;
    if remainder.abs() * 2 >= divisor {
        quotient + value.signum()
    } else {
        quotient
    }
}
