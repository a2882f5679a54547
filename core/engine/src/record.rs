//! FILENAME: core/engine/src/record.rs
//! PURPOSE: The canonical record and the single ingestion boundary that builds it.
//! CONTEXT: Source loaders produce `RawRecord`s keyed by spreadsheet header.
//! `Record::from_raw` resolves the configured headers once, normalizing every
//! field, so the pivot engine only ever works with typed canonical values.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cell::RawValue;
use crate::normalize::{normalize_label, normalize_number};

// ============================================================================
// FIELD / METRIC SELECTORS
// ============================================================================

/// A label field that records can be grouped and filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Division,
    Name,
    FocusArea,
    Stage,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Division, Field::Name, Field::FocusArea, Field::Stage];

    /// Display name used in table headers.
    pub fn display_name(&self) -> &'static str {
        match self {
            Field::Division => "Division",
            Field::Name => "Solution Name",
            Field::FocusArea => "Focus Area",
            Field::Stage => "Stage",
        }
    }
}

/// A numeric quantity of a record or group, used to rank and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Count,
    Smv,
    Oh,
    Other,
    Total,
}

impl Metric {
    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::Count => "Count",
            Metric::Smv => "SMV Unlock",
            Metric::Oh => "OH Reduction",
            Metric::Other => "Other Savings",
            Metric::Total => "Total",
        }
    }
}

impl Default for Metric {
    fn default() -> Self {
        Metric::Total
    }
}

// ============================================================================
// COLUMN KEYS
// ============================================================================

/// Maps canonical fields to the header names used by the source workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnKeys {
    pub division: String,
    pub name: String,
    pub focus_area: String,
    pub stage: String,
    pub smv: String,
    pub oh: String,
    pub other: String,
}

impl Default for ColumnKeys {
    fn default() -> Self {
        ColumnKeys {
            division: "Division".to_string(),
            name: "Solution Name".to_string(),
            focus_area: "Focus Area".to_string(),
            stage: "Stage".to_string(),
            smv: "SMV Unlock".to_string(),
            oh: "OH Reduction".to_string(),
            other: "Other Savings".to_string(),
        }
    }
}

// ============================================================================
// RAW RECORD
// ============================================================================

static EMPTY: RawValue = RawValue::Empty;

/// One source row as delivered by a loader: header name -> untyped value.
/// Header keys are trimmed on insert so `" Stage "` and `"Stage"` collide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: FxHashMap<String, RawValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        RawRecord {
            fields: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, key: &str, value: impl Into<RawValue>) {
        self.fields.insert(key.trim().to_string(), value.into());
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, key: &str, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the value under `key`, or `RawValue::Empty` when absent.
    pub fn get(&self, key: &str) -> &RawValue {
        self.fields.get(key.trim()).unwrap_or(&EMPTY)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(RawValue::is_empty)
    }
}

// ============================================================================
// CANONICAL RECORD
// ============================================================================

/// A normalized solution record. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Position in the source snapshot (0-based, excluding header).
    pub source_row: u32,
    pub division: String,
    pub name: String,
    pub focus_area: String,
    pub stage: String,
    pub smv: f64,
    pub oh: f64,
    pub other: f64,
}

impl Record {
    /// Normalizes one raw row using the configured header names.
    pub fn from_raw(raw: &RawRecord, keys: &ColumnKeys, source_row: u32) -> Self {
        Record {
            source_row,
            division: normalize_label(raw.get(&keys.division)),
            name: normalize_label(raw.get(&keys.name)),
            focus_area: normalize_label(raw.get(&keys.focus_area)),
            stage: normalize_label(raw.get(&keys.stage)),
            smv: normalize_number(raw.get(&keys.smv)),
            oh: normalize_number(raw.get(&keys.oh)),
            other: normalize_number(raw.get(&keys.other)),
        }
    }

    pub fn label(&self, field: Field) -> &str {
        match field {
            Field::Division => &self.division,
            Field::Name => &self.name,
            Field::FocusArea => &self.focus_area,
            Field::Stage => &self.stage,
        }
    }

    /// Sum of the three savings metrics. Always derived.
    pub fn total(&self) -> f64 {
        self.smv + self.oh + self.other
    }

    /// A single record counts as 1 for `Metric::Count`.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Count => 1.0,
            Metric::Smv => self.smv,
            Metric::Oh => self.oh,
            Metric::Other => self.other,
            Metric::Total => self.total(),
        }
    }
}

/// Normalizes a whole snapshot, numbering rows in source order.
pub fn canonicalize(raw: &[RawRecord], keys: &ColumnKeys) -> Vec<Record> {
    raw.iter()
        .enumerate()
        .map(|(i, r)| Record::from_raw(r, keys, i as u32))
        .collect()
}
