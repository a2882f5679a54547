//! FILENAME: app/src/commands/filters.rs
// PURPOSE: Filter state commands.

use pivot_engine::{FilterOptions, FilterPredicate};

use crate::api_types::{DashboardResponse, FilterRequest};
use crate::commands::views::get_dashboard;
use crate::{lock, log_info, AppState};

/// Replaces the active predicate and recomputes.
/// The drill selection is kept; it resolves against the new working set.
pub fn apply_filters(state: &AppState, request: FilterRequest) -> Result<DashboardResponse, String> {
    let predicate = request.to_predicate();
    log_info!("FILTER", "Applying filters {:?}", predicate);
    *lock(&state.filters)? = predicate;
    get_dashboard(state)
}

/// Back to "All" on every dropdown and an empty search.
pub fn clear_filters(state: &AppState) -> Result<DashboardResponse, String> {
    log_info!("FILTER", "Clearing filters");
    *lock(&state.filters)? = FilterPredicate::new();
    get_dashboard(state)
}

/// Dropdown values from the full snapshot.
pub fn get_filter_options(state: &AppState) -> Result<FilterOptions, String> {
    Ok(state.snapshot()?.options.clone())
}
