//! FILENAME: core/engine/src/number_format.rs
//! PURPOSE: Number formatting utilities for KPI cards, tables and exports.
//! CONTEXT: Savings are shown with fixed decimals and `,` thousands separators
//! (en-US grouping). Each metric has its own conventional precision.

use crate::record::Metric;

/// Format a number with fixed decimal places and thousands separators.
pub fn format_number(value: f64, decimal_places: usize) -> String {
    let rounded = format!("{:.prec$}", value, prec = decimal_places);
    add_thousands_separator(&rounded)
}

/// Format an integral count with thousands separators.
pub fn format_count(count: u64) -> String {
    add_thousands_separator(&count.to_string())
}

/// Format a metric using its display precision.
pub fn format_metric(metric: Metric, value: f64) -> String {
    match metric {
        Metric::Count => format_count(value.max(0.0).round() as u64),
        _ => format_number(value, metric_decimals(metric)),
    }
}

/// Display precision per metric: SMV 3, OH and Other 1, Total 2.
pub fn metric_decimals(metric: Metric) -> usize {
    match metric {
        Metric::Count => 0,
        Metric::Smv => 3,
        Metric::Oh | Metric::Other => 1,
        Metric::Total => 2,
    }
}

/// Add thousands separators to a numeric string.
fn add_thousands_separator(s: &str) -> String {
    let mut parts = s.splitn(2, '.');
    let integer_part = parts.next().unwrap_or_default();
    let decimal_part = parts.next();

    let negative = integer_part.starts_with('-');
    let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = String::new();
    let len = digits.len();

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    if negative {
        result = format!("-{}", result);
    }

    if let Some(decimal) = decimal_part {
        result.push('.');
        result.push_str(decimal);
    }

    result
}
