//! FILENAME: app/src/commands/views.rs
// PURPOSE: Read-only view commands. Each one recomputes from a single snapshot.

use engine::{Field, Metric, Record};
use pivot_engine::{
    build_crosstab, extract_insights, group_by, rank, sum_records, ChartSeries, Crosstab,
    CrosstabAxes, DashboardView, Group, Insights, RankedGroup, SortOrder,
};

use crate::api_types::DashboardResponse;
use crate::commands::data::seconds_until_refresh;
use crate::{log_debug, AppState};

/// Runs `f` over the current working set (snapshot filtered by the active predicate).
pub(crate) fn with_working_set<T>(
    state: &AppState,
    f: impl FnOnce(&[&Record]) -> T,
) -> Result<T, String> {
    let snapshot = state.snapshot()?;
    let predicate = state.filters()?;
    let working_set = pivot_engine::apply_filters(&snapshot.records, &predicate);
    Ok(f(&working_set))
}

/// Full recomputation of every panel.
pub fn get_dashboard(state: &AppState) -> Result<DashboardResponse, String> {
    let snapshot = state.snapshot()?;
    let predicate = state.filters()?;
    let drill = state.drill_selection()?;

    let view = DashboardView::compute(&snapshot.records, &predicate, drill.as_ref());
    log_debug!(
        "VIEW",
        "Recomputed dashboard: {} of {} records",
        view.filter_summary.shown,
        view.filter_summary.total
    );

    Ok(DashboardResponse {
        filter_message: view.filter_summary.message(),
        view,
        options: snapshot.options.clone(),
        filters: predicate,
        connected: state.is_connected()?,
        last_refresh: snapshot.loaded_at_display(),
        seconds_until_refresh: seconds_until_refresh(state)?,
    })
}

/// Count and metric sums over the working set.
pub fn get_kpis(state: &AppState) -> Result<Group, String> {
    with_working_set(state, |working| sum_records(working.iter().copied()))
}

pub fn get_matrix(state: &AppState, axes: CrosstabAxes) -> Result<Crosstab, String> {
    with_working_set(state, |working| {
        build_crosstab(working, axes.row_field, axes.col_field)
    })
}

/// Groups by `field` and ranks by `metric`, largest first.
pub fn get_rankings(
    state: &AppState,
    field: Field,
    metric: Metric,
) -> Result<Vec<RankedGroup>, String> {
    with_working_set(state, |working| {
        rank(&group_by(working.iter().copied(), field), metric)
    })
}

pub fn get_series(state: &AppState, field: Field, order: SortOrder) -> Result<ChartSeries, String> {
    with_working_set(state, |working| ChartSeries::build(working, field, order))
}

pub fn get_insights(state: &AppState) -> Result<Insights, String> {
    with_working_set(state, extract_insights)
}
