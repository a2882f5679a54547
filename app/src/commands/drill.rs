//! FILENAME: app/src/commands/drill.rs
// PURPOSE: Drill-through commands.

use pivot_engine::DrillView;

use crate::api_types::DrillRequest;
use crate::commands::views::with_working_set;
use crate::{lock, log_info, log_warn, AppState};

/// Stores the selection and resolves it against the current working set.
pub fn drill_through(state: &AppState, request: DrillRequest) -> Result<DrillView, String> {
    let selection = request.to_selection();
    log_info!("DRILL", "Drill through {}", selection.title());
    *lock(&state.drill)? = Some(selection);
    get_drill_view(state)
}

/// Returns to the whole working set.
pub fn clear_drill(state: &AppState) -> Result<DrillView, String> {
    log_info!("DRILL", "Clearing drill selection");
    *lock(&state.drill)? = None;
    get_drill_view(state)
}

pub fn get_drill_view(state: &AppState) -> Result<DrillView, String> {
    let selection = state.drill_selection()?;
    let view = with_working_set(state, |working| DrillView::build(working, selection.as_ref()))?;
    if view.fell_back {
        log_warn!(
            "DRILL",
            "No records match {}; showing the working set",
            view.title
        );
    }
    Ok(view)
}
