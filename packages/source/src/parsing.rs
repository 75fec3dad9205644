//! Field-level parsing helpers for loosely-typed upstream records.
//!
//! Socrata serves most columns as strings even when they hold numbers, and
//! occasionally as real JSON numbers. These helpers accept either and never
//! fail loudly: an unusable value is simply `None`.

use serde_json::Value;

/// Returns a trimmed, non-empty string field.
#[must_use]
pub fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parses the leading integer of a string the way lenient form parsers do:
/// optional sign, then digits, ignoring any trailing text.
///
/// `"35"` and `"35 yrs"` both yield 35; `"n/a"` yields `None`.
#[must_use]
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parses an integer from a JSON number or a numeric string.
#[must_use]
pub fn int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(truncate_f64)),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

/// Parses a finite float from a JSON number or a numeric string.
#[must_use]
pub fn f64_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Parses a non-negative integer that fits in `u32`.
#[must_use]
pub fn parse_u32(s: &str) -> Option<u32> {
    parse_leading_int(s).and_then(|n| u32::try_from(n).ok())
}

/// Splits a delimited multi-value field into trimmed entries.
///
/// Empty entries are kept so positional indexes stay aligned with the
/// other fields of the record.
#[must_use]
pub fn split_entries(s: &str, delimiter: char) -> Vec<&str> {
    s.split(delimiter).map(str::trim).collect()
}

/// Whether a free-text flag field reads as "yes" (case-insensitive
/// substring match, so `"Yes - fatal"` counts).
#[must_use]
pub fn contains_yes(s: &str) -> bool {
    s.to_lowercase().contains("yes")
}

/// Name of the JSON type of `value`, for error messages.
#[must_use]
pub const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Returns at most `max_chars` characters of `text`.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(idx, _)| &text[..idx])
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_f64(f: f64) -> i64 {
    f as i64
}
