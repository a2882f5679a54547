//! FILENAME: core/engine/src/cell.rs
//! PURPOSE: Defines the untyped value a source loader hands to the engine.
//! CONTEXT: A spreadsheet row arrives as header -> RawValue. Nothing downstream
//! reads a RawValue directly; it goes through `normalize` first.

use serde::{Deserialize, Serialize};

/// Represents the raw content of one field of one source row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl RawValue {
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }

    /// Returns the display value as a String.
    /// Integral numbers are shown without a decimal point.
    pub fn display_value(&self) -> String {
        match self {
            RawValue::Empty => String::new(),
            RawValue::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            RawValue::Text(s) => s.clone(),
            RawValue::Boolean(b) => {
                if *b { "true" } else { "false" }.to_string()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawValue::Empty)
    }
}

impl Default for RawValue {
    fn default() -> Self {
        RawValue::Empty
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Boolean(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Empty)
    }
}
