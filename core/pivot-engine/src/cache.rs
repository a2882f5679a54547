//! FILENAME: core/pivot-engine/src/cache.rs
//! Aggregation Cache - Group accumulators keyed by normalized label.
//!
//! A `Group` is the running aggregate for one label of one field: a record
//! count and three metric sums. The total is never stored; it is always the
//! sum of the three running sums, so it cannot drift from them.
//!
//! Groups are created lazily on first encounter. `GroupMap` has no order of
//! its own; presentation order is chosen by the view layer.

use engine::{Field, Metric, Record};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

// ============================================================================
// GROUP
// ============================================================================

/// Count and metric sums for one group of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Group {
    pub count: u64,
    pub smv: f64,
    pub oh: f64,
    pub other: f64,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one record to the running sums.
    pub fn add_record(&mut self, record: &Record) {
        self.count += 1;
        self.smv += record.smv;
        self.oh += record.oh;
        self.other += record.other;
    }

    /// Folds another group into this one, componentwise.
    pub fn merge(&mut self, other: &Group) {
        self.count += other.count;
        self.smv += other.smv;
        self.oh += other.oh;
        self.other += other.other;
    }

    /// Sum of the three running metric sums.
    pub fn total(&self) -> f64 {
        self.smv + self.oh + self.other
    }

    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Count => self.count as f64,
            Metric::Smv => self.smv,
            Metric::Oh => self.oh,
            Metric::Other => self.other,
            Metric::Total => self.total(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Serialize for Group {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Group", 5)?;
        s.serialize_field("count", &self.count)?;
        s.serialize_field("smv", &self.smv)?;
        s.serialize_field("oh", &self.oh)?;
        s.serialize_field("other", &self.other)?;
        s.serialize_field("total", &self.total())?;
        s.end()
    }
}

// ============================================================================
// GROUPING
// ============================================================================

/// Label -> Group. Unordered.
pub type GroupMap = FxHashMap<String, Group>;

/// Groups records by the normalized value of `field` and sums their metrics.
pub fn group_by<'a, I>(records: I, field: Field) -> GroupMap
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut groups = GroupMap::default();
    for record in records {
        groups
            .entry(record.label(field).to_string())
            .or_default()
            .add_record(record);
    }
    groups
}

/// Sums every record into one group (the KPI row).
pub fn sum_records<'a, I>(records: I) -> Group
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut group = Group::new();
    for record in records {
        group.add_record(record);
    }
    group
}

/// Distinct normalized values of `field`, sorted ascending.
pub fn unique_values<'a, I>(records: I, field: Field) -> Vec<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let seen: FxHashSet<&'a str> = records.into_iter().map(|r| r.label(field)).collect();
    let mut values: Vec<String> = seen.into_iter().map(str::to_string).collect();
    values.sort();
    values
}

/// Labels of a group map, sorted ascending.
pub fn sorted_labels(groups: &GroupMap) -> Vec<&str> {
    let mut labels: Vec<&str> = groups.keys().map(String::as_str).collect();
    labels.sort_unstable();
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{canonicalize, ColumnKeys, RawRecord};

    fn records() -> Vec<Record> {
        let rows = vec![
            RawRecord::new()
                .with("Division", "Ops")
                .with("SMV Unlock", "2")
                .with("OH Reduction", "1")
                .with("Other Savings", "0"),
            RawRecord::new()
                .with("Division", "Ops")
                .with("SMV Unlock", "3")
                .with("OH Reduction", "0")
                .with("Other Savings", "1"),
            RawRecord::new()
                .with("Division", "IT")
                .with("SMV Unlock", "")
                .with("OH Reduction", "5")
                .with("Other Savings", "0"),
        ];
        canonicalize(&rows, &ColumnKeys::default())
    }

    #[test]
    fn test_group_by_division() {
        let records = records();
        let groups = group_by(&records, Field::Division);

        let ops = groups["Ops"];
        assert_eq!(ops.count, 2);
        assert_eq!(ops.smv, 5.0);
        assert_eq!(ops.oh, 1.0);
        assert_eq!(ops.other, 1.0);
        assert_eq!(ops.total(), 7.0);

        let it = groups["IT"];
        assert_eq!(it.count, 1);
        assert_eq!(it.smv, 0.0);
        assert_eq!(it.total(), 5.0);
    }

    #[test]
    fn test_group_by_missing_field_is_unspecified() {
        let records = records();
        let groups = group_by(&records, Field::Stage);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["Unspecified"].count, 3);
    }

    #[test]
    fn test_group_totals_match_record_totals() {
        let records = records();
        let groups = group_by(&records, Field::Division);
        let group_sum: f64 = groups.values().map(Group::total).sum();
        let record_sum: f64 = records.iter().map(Record::total).sum();
        assert!((group_sum - record_sum).abs() < 1e-9);
    }

    #[test]
    fn test_group_by_is_order_insensitive() {
        let records = records();
        let forward = group_by(&records, Field::Division);
        let backward = group_by(records.iter().rev(), Field::Division);
        for (label, group) in &forward {
            let other = backward[label];
            assert_eq!(group.count, other.count);
            assert!((group.total() - other.total()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_merge_and_metric() {
        let records = records();
        let mut a = sum_records(&records[..1]);
        let b = sum_records(&records[1..]);
        a.merge(&b);
        assert_eq!(a, sum_records(&records));
        assert_eq!(a.metric(Metric::Count), 3.0);
        assert_eq!(a.metric(Metric::Total), 12.0);
    }

    #[test]
    fn test_unique_values_sorted() {
        let records = records();
        assert_eq!(unique_values(&records, Field::Division), vec!["IT", "Ops"]);
        let groups = group_by(&records, Field::Division);
        assert_eq!(sorted_labels(&groups), vec!["IT", "Ops"]);
    }

    #[test]
    fn test_group_serializes_total() {
        let g = Group { count: 1, smv: 1.0, oh: 2.0, other: 3.0 };
        let json = serde_json::to_value(g).unwrap();
        assert_eq!(json["total"], 6.0);
    }
}
