//! # Numeric Normalization
//!
//! Numbers are the easiest place for two platforms to disagree on a hash, so
//! every number passes through [`normalize`] before it is encoded:
//!
//! 1. NaN and infinities are rejected (`InvalidNumber`).
//! 2. Values outside `[min_num, max_num]` are rejected when
//!    `throw_on_range_error` is set (`RangeExceeded`).
//! 3. The configured [`NumberPolicy`] is applied:
//!    - `Truncate { digits }` drops decimal digits beyond `digits`, working on
//!      the shortest decimal form of the value. No rounding.
//!    - `Step { step }` rejects values that are not a multiple of `step`
//!      (`PrecisionExceeded`) and leaves accepted values untouched.
//!
//! [`format_number`] renders the normalized value the way ECMAScript's
//! `Number#toString` does, which is the rendering every peer implementation
//! agrees on.

use crate::config::{NumberConfig, NumberPolicy};
use crate::error::NumberError;

/// Largest residual, in units of the step, still accepted by the step policy.
const STEP_EPSILON: f64 = 1e-6;

/// Validate and normalize a number under the given configuration.
pub fn normalize(value: f64, config: &NumberConfig) -> Result<f64, NumberError> {
    if !value.is_finite() {
        return Err(NumberError::InvalidNumber(value));
    }
    if config.throw_on_range_error && (value < config.min_num || value > config.max_num) {
        return Err(NumberError::RangeExceeded {
            value,
            min: config.min_num,
            max: config.max_num,
        });
    }
    match config.policy {
        NumberPolicy::Truncate { digits } => Ok(truncate(value, digits)),
        NumberPolicy::Step { step } => {
            check_step(value, step)?;
            Ok(value)
        }
    }
}

/// Drop decimal digits beyond `precision` without rounding.
///
/// Integers are returned unchanged. If nothing remains after the decimal
/// point the result is an integer.
pub fn truncate(value: f64, precision: u32) -> f64 {
    if !value.is_finite() || value.fract() == 0.0 {
        return value;
    }
    let decimal = Decimal::of(value);
    let keep = i64::from(decimal.point) + i64::from(precision);
    if keep >= decimal.digits.len() as i64 {
        return value;
    }
    if keep <= 0 {
        return 0.0;
    }
    let kept = decimal.digits[..keep as usize].trim_end_matches('0');
    if kept.is_empty() {
        return 0.0;
    }
    let sign = if decimal.negative { "-" } else { "" };
    // Parsing the shortened digit string yields the nearest double, whose
    // shortest form is exactly those digits.
    format!("{sign}0.{kept}e{}", decimal.point)
        .parse()
        .unwrap_or(value)
}

/// Reject values that are not a multiple of `step`.
fn check_step(value: f64, step: f64) -> Result<(), NumberError> {
    if value.fract() == 0.0 {
        return Ok(());
    }
    let steps = value / step;
    if (steps - steps.round()).abs() > STEP_EPSILON {
        return Err(NumberError::PrecisionExceeded { value, step });
    }
    Ok(())
}

/// Render a finite number like ECMAScript `Number#toString`.
///
/// Integers carry no decimal point, non-integers use the shortest digit
/// string that round-trips, and magnitudes outside `[1e-7, 1e21)` switch to
/// exponent notation (`1e+21`, `1.5e-7`). Negative zero renders as `0`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let Decimal {
        negative,
        digits,
        point,
    } = Decimal::of(value);
    let k = digits.len() as i32;
    let n = point;

    let mut out = String::with_capacity(k as usize + 8);
    if negative {
        out.push('-');
    }
    if k <= n && n <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat('0').take((n - k) as usize));
    } else if 0 < n && n <= 21 {
        out.push_str(&digits[..n as usize]);
        out.push('.');
        out.push_str(&digits[n as usize..]);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-n) as usize));
        out.push_str(&digits);
    } else {
        let exponent = n - 1;
        out.push_str(&digits[..1]);
        if k > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('e');
        out.push(if exponent >= 0 { '+' } else { '-' });
        out.push_str(&exponent.abs().to_string());
    }
    out
}

/// Shortest decimal form of a finite, non-zero double:
/// `value = ±0.d1d2…dk × 10^point`.
struct Decimal {
    negative: bool,
    digits: String,
    point: i32,
}

impl Decimal {
    fn of(value: f64) -> Self {
        // `{:e}` yields the shortest round-tripping digits, e.g. `1.2345e-7`.
        let scientific = format!("{:e}", value.abs());
        let (mantissa, exponent) = scientific
            .split_once('e')
            .unwrap_or((scientific.as_str(), "0"));
        let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
        let exponent: i32 = exponent.parse().unwrap_or(0);
        Self {
            negative: value.is_sign_negative(),
            digits,
            point: exponent + 1,
        }
    }
}
