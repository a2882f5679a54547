//! FILENAME: core/pivot-engine/src/lib.rs
//! Aggregation and cross-filtering engine for the savings dashboard.
//!
//! This crate turns a snapshot of canonical records plus the caller's filter
//! and drill state into every derived view. It is pure: no I/O, no interior
//! state, no locking. It depends on `engine` only for the record model.
//!
//! Layers:
//! - `definition`: Serializable inputs (what the caller WANTS)
//! - `cache`: Group accumulators (HOW we aggregate)
//! - `filter`: Working-set derivation
//! - `engine`: Crosstab and drill-through (HOW we cross-tabulate)
//! - `ranking` / `insight`: Orderings and superlatives
//! - `view`: Renderable output for the presentation layer (WHAT we display)

pub mod definition;
pub mod cache;
pub mod filter;
pub mod engine;
pub mod ranking;
pub mod insight;
pub mod view;

pub use definition::*;
pub use cache::*;
pub use filter::{apply_filters, record_matches, FilterOptions, FilterSummary};
pub use self::engine::{build_crosstab, drill_through, Crosstab};
pub use ranking::{rank, RankedGroup, TOP_RANKS};
pub use insight::{
    count_stage, extract_insights, superlative, Insights, Superlative,
    STAGE_COMMERCIALIZED, STAGE_RND,
};
pub use view::{ChartSeries, DashboardView, DrillView};

#[cfg(test)]
mod tests {
    use super::*;
    use ::engine::{canonicalize, ColumnKeys, Field, Metric, RawRecord, Record};

    /// The three-record walkthrough: group, rank, drill.
    #[test]
    fn end_to_end_group_and_rank() {
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
        let records = canonicalize(&rows, &ColumnKeys::default());

        let working = apply_filters(&records, &FilterPredicate::new());
        let groups = group_by(working.iter().copied(), Field::Division);

        let ops = groups["Ops"];
        assert_eq!(
            (ops.count, ops.smv, ops.oh, ops.other, ops.total()),
            (2, 5.0, 1.0, 1.0, 7.0)
        );
        let it = groups["IT"];
        assert_eq!(
            (it.count, it.smv, it.oh, it.other, it.total()),
            (1, 0.0, 5.0, 0.0, 5.0)
        );

        let ranked = rank(&groups, Metric::Total);
        let order: Vec<(&str, usize)> = ranked.iter().map(|r| (r.label.as_str(), r.rank)).collect();
        assert_eq!(order, vec![("Ops", 1), ("IT", 2)]);

        // Drilling into a ranking row feeds the same aggregator again.
        let drilled: Vec<&Record> = drill_through(&working, &DrillSelection::division("Ops"));
        let regrouped = group_by(drilled.iter().copied(), Field::Division);
        assert_eq!(regrouped.len(), 1);
        assert_eq!(regrouped["Ops"], ops);
    }
}
