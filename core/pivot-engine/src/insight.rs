//! FILENAME: core/pivot-engine/src/insight.rs
//! Insight Extractor - superlatives and narrow categorical counts.

use engine::{Field, Metric, Record};
use serde::{Deserialize, Serialize};

use crate::cache::{group_by, GroupMap};
use crate::ranking::rank;

/// Stage literal counted as commercialized.
pub const STAGE_COMMERCIALIZED: &str = "commercialized";

/// Stage literal counted as research.
pub const STAGE_RND: &str = "r&d";

/// The winning label for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Superlative {
    pub label: String,
    pub value: f64,
}

/// Headline facts about the working set. All superlatives are None when the
/// working set is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    /// Division with the largest total savings.
    pub top_division: Option<Superlative>,
    /// Division with the largest SMV unlock.
    pub best_smv: Option<Superlative>,
    /// Division with the largest OH reduction.
    pub best_oh: Option<Superlative>,
    /// Division with the most solutions.
    pub most_solutions: Option<Superlative>,
    pub commercialized: usize,
    pub r_and_d: usize,
}

impl Insights {
    pub fn has_data(&self) -> bool {
        self.top_division.is_some()
    }
}

/// Highest `metric` in `groups`; exact ties go to the smaller label.
pub fn superlative(groups: &GroupMap, metric: Metric) -> Option<Superlative> {
    rank(groups, metric).into_iter().next().map(|top| Superlative {
        value: top.group.metric(metric),
        label: top.label,
    })
}

/// Records whose normalized stage equals `literal`, ignoring case.
pub fn count_stage(records: &[&Record], literal: &str) -> usize {
    let literal = literal.to_lowercase();
    records
        .iter()
        .filter(|r| r.stage.to_lowercase() == literal)
        .count()
}

/// Computes the insight panel over a working set.
pub fn extract_insights(working_set: &[&Record]) -> Insights {
    let groups = group_by(working_set.iter().copied(), Field::Division);

    Insights {
        top_division: superlative(&groups, Metric::Total),
        best_smv: superlative(&groups, Metric::Smv),
        best_oh: superlative(&groups, Metric::Oh),
        most_solutions: superlative(&groups, Metric::Count),
        commercialized: count_stage(working_set, STAGE_COMMERCIALIZED),
        r_and_d: count_stage(working_set, STAGE_RND),
    }
}
