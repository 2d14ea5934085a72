//! Field value coercions shared by filtering and sorting.
//!
//! Missing-field policy, applied uniformly:
//! - text coercion: missing or `null` becomes the empty string
//! - numeric coercion: missing or unparsable becomes `0`
//! - strict equality: a missing field never equals anything
//! - raw ordering: missing sorts with `null`, before every other type

use serde_json::Value;
use std::cmp::Ordering;

/// Stringify a field value the way text filters and text sorts see it.
pub fn stringify(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Lower-cased [`stringify`].
pub fn lowercase(value: Option<&Value>) -> String {
    stringify(value).to_lowercase()
}

/// Coerce a field value to `f64`.
///
/// Strings are parsed by their longest leading numeric prefix (`"12px"` is 12).
/// Everything that does not parse is `0`.
pub fn parse_number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_float_prefix(s),
        _ => None,
    };
    match parsed {
        Some(n) if !n.is_nan() => n,
        _ => 0.0,
    }
}

/// Strict equality with no type coercion, except that all JSON numbers are
/// compared by numeric value.
pub fn strict_equals(field: Option<&Value>, expected: &Value) -> bool {
    match (field, expected) {
        (None, _) => false,
        (Some(Value::Number(a)), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Some(actual), expected) => actual == expected,
    }
}

/// Raw ordering of two field values.
///
/// Same-typed scalars compare naturally (numbers numerically, strings by code
/// point, `false < true`). Arrays and objects tie with each other. Different
/// types are ranked `missing/null < bool < number < string < array < object`,
/// which keeps the relation a total preorder.
pub fn compare_raw(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => compare_f64(x, y),
            _ => Ordering::Equal,
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Compare two floats; NaN (never produced by [`parse_number`]) ties.
pub fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Parse the longest leading float literal of `raw`, after leading whitespace.
fn parse_float_prefix(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let (sign, body) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1.0, &trimmed[1..]),
        Some(b'+') => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };

    if body.starts_with("Infinity") {
        return Some(sign * f64::INFINITY);
    }

    let bytes = body.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }

    // Optional exponent, only kept when it has at least one digit.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    body[..end].parse::<f64>().ok().map(|n| sign * n)
}
