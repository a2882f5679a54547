//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the record model.
//! CONTEXT: Raw values, the Field Normalizer and the canonical `Record`.
//! Everything the pivot engine aggregates is built here.

pub mod cell;
pub mod normalize;
pub mod number_format;
pub mod record;

// Re-export commonly used types at the crate root
pub use cell::RawValue;
pub use normalize::{
    normalize_label, normalize_label_str, normalize_number, normalize_number_str, UNSPECIFIED,
};
pub use number_format::{format_count, format_metric, format_number, metric_decimals};
pub use record::{canonicalize, ColumnKeys, Field, Metric, RawRecord, Record};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integration_test_ingestion_workflow() {
        let keys = ColumnKeys::default();
        let rows = vec![
            RawRecord::new()
                .with("Division", "Ops")
                .with("Solution Name", "Line balancing")
                .with("SMV Unlock", RawValue::Number(2.0)),
            RawRecord::new().with("Division", "").with("OH Reduction", "n/a"),
        ];

        let records = canonicalize(&rows, &keys);

        assert_eq!(records[0].division, "Ops");
        assert_eq!(records[0].name, "Line balancing");
        assert_eq!(records[0].total(), 2.0);
        assert_eq!(records[1].division, UNSPECIFIED);
        assert_eq!(records[1].oh, 0.0);
    }
}
