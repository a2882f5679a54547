//! FILENAME: core/pivot-engine/src/filter.rs
//! Filter Engine - derives the working set from the full snapshot.
//!
//! A record passes iff every set constraint matches its normalized field
//! exactly (the name search is a case-insensitive substring). Constraints
//! only ever compose with AND. The result borrows the input records.

use engine::{Field, Record};
use serde::{Deserialize, Serialize};

use crate::cache::unique_values;
use crate::definition::{Constraints, FilterPredicate};

/// Returns the records that satisfy `predicate`, in input order.
pub fn apply_filters<'a, I>(records: I, predicate: &FilterPredicate) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let constraints = predicate.constraints();
    let search = predicate.search_term();

    records
        .into_iter()
        .filter(|record| passes(record, &constraints, search.as_deref()))
        .collect()
}

/// True when `record` matches a single predicate.
pub fn record_matches(record: &Record, predicate: &FilterPredicate) -> bool {
    passes(
        record,
        &predicate.constraints(),
        predicate.search_term().as_deref(),
    )
}

fn passes(record: &Record, constraints: &Constraints<'_>, search: Option<&str>) -> bool {
    matches_constraints(record, constraints)
        && search.map_or(true, |term| record.name.to_lowercase().contains(term))
}

/// Exact normalized equality on every (field, label) pair.
pub(crate) fn matches_constraints(record: &Record, constraints: &Constraints<'_>) -> bool {
    constraints
        .iter()
        .all(|(field, label)| record.label(*field) == *label)
}

// ============================================================================
// FILTER OPTIONS
// ============================================================================

/// Distinct values offered by each filter drop-down.
/// Always computed from the full snapshot, never from the working set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub divisions: Vec<String>,
    pub stages: Vec<String>,
    pub focus_areas: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[Record]) -> Self {
        FilterOptions {
            divisions: unique_values(records, Field::Division),
            stages: unique_values(records, Field::Stage),
            focus_areas: unique_values(records, Field::FocusArea),
        }
    }
}

// ============================================================================
// FILTER SUMMARY
// ============================================================================

/// How much of the snapshot the working set covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSummary {
    pub shown: usize,
    pub total: usize,
}

impl FilterSummary {
    pub fn new(shown: usize, total: usize) -> Self {
        FilterSummary { shown, total }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.shown == self.total
    }

    pub fn message(&self) -> String {
        if self.is_unfiltered() {
            "Showing all solutions".to_string()
        } else {
            format!("Showing {} of {}", self.shown, self.total)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{canonicalize, ColumnKeys, RawRecord};

    fn records() -> Vec<Record> {
        let rows = vec![
            RawRecord::new()
                .with("Division", "Ops")
                .with("Stage", "Pilot")
                .with("Focus Area", "Cost")
                .with("Solution Name", "Line Balancing"),
            RawRecord::new()
                .with("Division", "Ops")
                .with("Stage", "R&D")
                .with("Focus Area", "Quality")
                .with("Solution Name", "Defect Vision"),
            RawRecord::new()
                .with("Division", "IT")
                .with("Stage", "Pilot")
                .with("Solution Name", "Ticket Bot"),
        ];
        canonicalize(&rows, &ColumnKeys::default())
    }

    #[test]
    fn test_empty_predicate_passes_everything() {
        let records = records();
        assert_eq!(apply_filters(&records, &FilterPredicate::new()).len(), 3);
    }

    #[test]
    fn test_constraints_are_conjunctive() {
        let records = records();
        let p = FilterPredicate::new()
            .with_division(Some("Ops"))
            .with_stage(Some("Pilot"));
        let out = apply_filters(&records, &p);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Line Balancing");
    }

    #[test]
    fn test_unspecified_is_matchable() {
        let records = records();
        let p = FilterPredicate::new().with_focus_area(Some("Unspecified"));
        let out = apply_filters(&records, &p);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].division, "IT");
    }

    #[test]
    fn test_name_search_is_case_insensitive_substring() {
        let records = records();
        let p = FilterPredicate::new().with_name_contains(Some("VISION"));
        let out = apply_filters(&records, &p);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].source_row, 1);
    }

    #[test]
    fn test_exact_match_is_case_sensitive() {
        let records = records();
        let p = FilterPredicate::new().with_division(Some("ops"));
        assert!(apply_filters(&records, &p).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let records = records();
        let p = FilterPredicate::new().with_stage(Some("Pilot"));
        let once = apply_filters(&records, &p);
        let twice = apply_filters(once.iter().copied(), &p);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_result_references_input_records() {
        let records = records();
        let out = apply_filters(&records, &FilterPredicate::new());
        assert!(std::ptr::eq(out[0], &records[0]));
    }

    #[test]
    fn test_record_matches() {
        let records = records();
        let p = FilterPredicate::new().with_division(Some("IT"));
        assert!(record_matches(&records[2], &p));
        assert!(!record_matches(&records[0], &p));
    }

    #[test]
    fn test_filter_options_and_summary() {
        let records = records();
        let options = FilterOptions::from_records(&records);
        assert_eq!(options.divisions, vec!["IT", "Ops"]);
        assert_eq!(options.stages, vec!["Pilot", "R&D"]);
        assert_eq!(options.focus_areas, vec!["Cost", "Quality", "Unspecified"]);

        assert_eq!(FilterSummary::new(3, 3).message(), "Showing all solutions");
        assert_eq!(FilterSummary::new(1, 3).message(), "Showing 1 of 3");
    }
}
