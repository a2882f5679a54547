//! FILENAME: core/pivot-engine/src/ranking.rs
//! Ranking Engine - orders grouped aggregates by a metric.
//!
//! Descending by metric; exactly equal metrics order by label ascending, so
//! the sequence is deterministic. Rank is the 1-based position in that
//! sequence: ties do not share a rank.

use std::cmp::Ordering;

use engine::Metric;
use serde::{Deserialize, Serialize};

use crate::cache::{Group, GroupMap};

/// Number of leading ranks flagged for podium presentation.
pub const TOP_RANKS: usize = 3;

/// One row of a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedGroup {
    pub label: String,
    pub group: Group,
    /// 1-based position.
    pub rank: usize,
    /// True for the first `TOP_RANKS` positions.
    pub is_top: bool,
}

/// Ranks every group in `groups` by `metric`.
pub fn rank(groups: &GroupMap, metric: Metric) -> Vec<RankedGroup> {
    let mut entries: Vec<(&String, &Group)> = groups.iter().collect();
    entries.sort_by(|a, b| {
        compare_desc(a.1.metric(metric), b.1.metric(metric)).then_with(|| a.0.cmp(b.0))
    });

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (label, group))| RankedGroup {
            label: label.clone(),
            group: *group,
            rank: i + 1,
            is_top: i < TOP_RANKS,
        })
        .collect()
}

/// Descending comparison of two metric values. Total: NaN (an overflowed
/// group, `inf - inf`) sorts below everything, and `-0.0` equals `0.0`.
fn compare_desc(a: f64, b: f64) -> Ordering {
    sort_key(b).total_cmp(&sort_key(a))
}

fn sort_key(value: f64) -> f64 {
    if value.is_nan() {
        f64::NEG_INFINITY
    } else if value == 0.0 {
        0.0
    } else {
        value
    }
}
