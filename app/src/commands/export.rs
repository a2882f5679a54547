//! FILENAME: app/src/commands/export.rs
// PURPOSE: Export of the active record set.

use std::path::{Path, PathBuf};

use engine::Record;
use persistence::{export_records, ExportFormat};
use pivot_engine::DrillView;

use crate::api_types::{ExportResponse, ExportScope};
use crate::commands::views::with_working_set;
use crate::{log_enter, log_error, log_info, AppState};

/// Exports what is on screen: the drill page's records when a drill is
/// active (the working set when that drill matched nothing), the working set
/// otherwise.
/// `path` defaults to the configured file name; `format` defaults from the
/// path extension.
pub fn export_active(
    state: &AppState,
    path: Option<&Path>,
    format: Option<ExportFormat>,
) -> Result<ExportResponse, String> {
    let path: PathBuf = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&state.config.export_file_name));
    let format = format.unwrap_or_else(|| ExportFormat::from_path(&path));
    log_enter!("EXPORT", "export_active", "{:?} as {:?}", path, format);

    let selection = state.drill_selection()?;
    let (scope, records): (ExportScope, Vec<Record>) = with_working_set(state, |working| {
        match &selection {
            // The drill page's records, including its fallback to the working set
            Some(selection) => (
                ExportScope::Drill,
                DrillView::build(working, Some(selection)).records,
            ),
            None => (
                ExportScope::WorkingSet,
                working.iter().map(|r| (*r).clone()).collect(),
            ),
        }
    })?;

    let rows = export_records(&path, format, &records).map_err(|e| {
        let message = format!("Failed to export {:?}: {}", path, e);
        log_error!("EXPORT", "{}", message);
        message
    })?;

    log_info!("EXPORT", "Exported {} rows to {:?}", rows, path);
    Ok(ExportResponse {
        path: path.display().to_string(),
        format,
        scope,
        rows,
    })
}
