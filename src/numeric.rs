//! Numeric coercion and rounding helpers for host-provided screen values.
//!
//! Hosts are not trusted to hand back proper numbers: some report screen
//! dimensions as strings, others as null. Everything is funnelled through
//! [`to_float`], which yields NaN for anything it cannot read.

use serde_json::Value;

/// Coerces an arbitrary host value into a float, or NaN when it cannot be read.
///
/// Strings are parsed by their leading numeric prefix, so `"1200"` and
/// `"1200px"` both give `1200.0`.
pub fn to_float(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_float(s),
        _ => f64::NAN,
    }
}

/// Keeps `value` only when it is a finite number.
///
/// NaN from unreadable input and the infinities that arithmetic on them can
/// produce both collapse to `None`.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Snaps `value` to a multiple of `base`.
///
/// With `|base| >= 1` the value is rounded to the nearest multiple of `base`
/// (`round(1439.0, 10.0) == 1440.0`). A fractional base rounds to decimal
/// places instead (`round(1.234, 0.01) == 1.23`). Ties go toward positive
/// infinity.
///
/// A base without a finite reciprocal (zero, subnormal, NaN, infinite) cannot
/// snap anything, and `value` is returned as is.
pub fn round(value: f64, base: f64) -> f64 {
    if !base.is_finite() || !(1.0 / base).is_finite() {
        return value;
    }
    let rounded = if base.abs() >= 1.0 {
        round_half_up(value / base) * base
    } else {
        let counter_base = 1.0 / base;
        round_half_up(value * counter_base) / counter_base
    };
    // -0.0 → 0.0
    rounded + 0.0
}

fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Parses the longest leading float literal of `input`, ignoring leading
/// whitespace. Returns NaN when no digits are found.
fn parse_float(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return f64::NAN;
    }

    // Exponent only counts when followed by at least one digit.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}
