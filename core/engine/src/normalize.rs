//! FILENAME: core/engine/src/normalize.rs
//! PURPOSE: Field Normalizer - coerces raw values to canonical labels and numbers.
//! CONTEXT: Every label and metric the pivot engine sees has passed through
//! these functions exactly once, at ingestion. They never fail: malformed input
//! degrades to `UNSPECIFIED` or `0.0`.

use crate::cell::RawValue;

/// Label used for absent, null, or blank fields.
pub const UNSPECIFIED: &str = "Unspecified";

/// Normalizes a raw value to a label: trimmed text, or `UNSPECIFIED` when blank.
pub fn normalize_label(value: &RawValue) -> String {
    match value {
        RawValue::Empty => UNSPECIFIED.to_string(),
        RawValue::Text(s) => normalize_label_str(s),
        other => normalize_label_str(&other.display_value()),
    }
}

/// Normalizes a text label. Whitespace-only input becomes `UNSPECIFIED`.
pub fn normalize_label_str(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNSPECIFIED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Normalizes a raw value to a number.
///
/// Finite numbers pass through. Text is stripped of everything except ASCII
/// digits, `.` and `-`, and the longest leading decimal is parsed. Anything
/// that does not yield a finite number is `0.0`.
pub fn normalize_number(value: &RawValue) -> f64 {
    match value {
        RawValue::Number(n) if n.is_finite() => *n,
        RawValue::Text(s) => normalize_number_str(s),
        _ => 0.0,
    }
}

/// Parses a loosely formatted numeric string such as `"$1,234.5abc"`.
pub fn normalize_number_str(value: &str) -> f64 {
    let stripped: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    parse_leading_decimal(&stripped)
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Parses the longest `-?digits[.digits]` prefix. Trailing garbage is ignored,
/// so `"1.2.3"` is 1.2 and `"12-3"` is 12. Returns None when no digit leads.
fn parse_leading_decimal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = bytes.first() == Some(&b'-');
    if negative {
        pos += 1;
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &s[int_start..pos];

    let mut frac_digits = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        frac_digits = &s[frac_start..end];
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut canonical = String::with_capacity(int_digits.len() + frac_digits.len() + 3);
    if negative {
        canonical.push('-');
    }
    canonical.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        canonical.push('.');
        canonical.push_str(frac_digits);
    }

    canonical.parse::<f64>().ok()
}
