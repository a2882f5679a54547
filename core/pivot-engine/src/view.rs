//! FILENAME: core/pivot-engine/src/view.rs
//! Dashboard View - Renderable output for the presentation layer.
//!
//! Everything here is recomputed in full from one record snapshot plus the
//! caller's filter and drill state. Nothing is patched incrementally.

use engine::{Field, Metric, Record};
use serde::{Deserialize, Serialize};

use crate::cache::{group_by, sorted_labels, sum_records, Group, GroupMap};
use crate::definition::{CrosstabAxes, DrillSelection, FilterPredicate, SortOrder};
use crate::engine::{build_crosstab, drill_through, Crosstab};
use crate::filter::{apply_filters, FilterSummary};
use crate::insight::{extract_insights, Insights};
use crate::ranking::{rank, RankedGroup};

// ============================================================================
// CHART SERIES
// ============================================================================

/// Parallel label / aggregate arrays, ready to feed a chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub field: Option<Field>,
    pub labels: Vec<String>,
    pub groups: Vec<Group>,
}

impl ChartSeries {
    /// Orders `groups` for display.
    pub fn from_groups(field: Field, groups: &GroupMap, order: SortOrder) -> Self {
        let (labels, groups): (Vec<String>, Vec<Group>) = match order {
            SortOrder::LabelAscending => sorted_labels(groups)
                .into_iter()
                .map(|label| (label.to_string(), groups[label]))
                .unzip(),
            SortOrder::MetricDescending(metric) => rank(groups, metric)
                .into_iter()
                .map(|r| (r.label, r.group))
                .unzip(),
        };
        ChartSeries {
            field: Some(field),
            labels,
            groups,
        }
    }

    /// Groups `records` by `field` and orders the result.
    pub fn build(records: &[&Record], field: Field, order: SortOrder) -> Self {
        Self::from_groups(field, &group_by(records.iter().copied(), field), order)
    }

    /// One value per label for `metric`.
    pub fn values(&self, metric: Metric) -> Vec<f64> {
        self.groups.iter().map(|g| g.metric(metric)).collect()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ============================================================================
// DRILL VIEW
// ============================================================================

/// The drill-through page: a record subset plus its own aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillView {
    pub selection: DrillSelection,
    pub title: String,
    pub subtitle: String,
    /// Records displayed (the true drill result, or the working set on fallback).
    pub records: Vec<Record>,
    /// Number of records the resolver actually matched.
    pub matched_count: usize,
    /// True when the resolver matched nothing and the working set is shown instead.
    pub fell_back: bool,
    pub totals: Group,
    pub by_division: ChartSeries,
    pub by_stage: ChartSeries,
}

impl DrillView {
    /// Resolves `selection` against the working set. No selection means the
    /// whole working set. An empty match falls back to the working set for
    /// display; `matched_count` still reports zero.
    pub fn build(working_set: &[&Record], selection: Option<&DrillSelection>) -> Self {
        let selection = selection.cloned().unwrap_or(DrillSelection::All);
        let matched = drill_through(working_set, &selection);
        let matched_count = matched.len();

        let fell_back = matched.is_empty() && !working_set.is_empty();
        let shown: Vec<&Record> = if fell_back {
            working_set.to_vec()
        } else {
            matched
        };

        DrillView {
            title: selection.title(),
            subtitle: selection.subtitle(),
            selection,
            matched_count,
            fell_back,
            totals: sum_records(shown.iter().copied()),
            by_division: ChartSeries::build(&shown, Field::Division, SortOrder::LabelAscending),
            by_stage: ChartSeries::build(&shown, Field::Stage, SortOrder::LabelAscending),
            records: shown.into_iter().cloned().collect(),
        }
    }
}

// ============================================================================
// DASHBOARD VIEW
// ============================================================================

/// Every derived view of one recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub filter_summary: FilterSummary,
    /// Count and metric sums over the working set.
    pub kpis: Group,
    pub by_division: ChartSeries,
    pub by_stage: ChartSeries,
    pub by_focus_area: ChartSeries,
    /// Stage x focus area matrix.
    pub matrix: Crosstab,
    /// Divisions ranked by total.
    pub rankings: Vec<RankedGroup>,
    pub insights: Insights,
    pub drill: DrillView,
}

impl DashboardView {
    /// Recomputes everything from `records` and the caller's state.
    pub fn compute(
        records: &[Record],
        predicate: &FilterPredicate,
        drill: Option<&DrillSelection>,
    ) -> Self {
        let working_set = apply_filters(records, predicate);
        let axes = CrosstabAxes::default();
        let division_groups = group_by(working_set.iter().copied(), Field::Division);

        DashboardView {
            filter_summary: FilterSummary::new(working_set.len(), records.len()),
            kpis: sum_records(working_set.iter().copied()),
            by_division: ChartSeries::from_groups(
                Field::Division,
                &division_groups,
                SortOrder::LabelAscending,
            ),
            by_stage: ChartSeries::build(&working_set, Field::Stage, SortOrder::LabelAscending),
            by_focus_area: ChartSeries::build(
                &working_set,
                Field::FocusArea,
                SortOrder::LabelAscending,
            ),
            matrix: build_crosstab(&working_set, axes.row_field, axes.col_field),
            rankings: rank(&division_groups, Metric::Total),
            insights: extract_insights(&working_set),
            drill: DrillView::build(&working_set, drill),
        }
    }

    /// Divisions in ranking order, for the summary bar chart.
    pub fn summary_series(&self) -> ChartSeries {
        ChartSeries {
            field: Some(Field::Division),
            labels: self.rankings.iter().map(|r| r.label.clone()).collect(),
            groups: self.rankings.iter().map(|r| r.group).collect(),
        }
    }
}
