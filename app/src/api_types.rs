//! FILENAME: app/src/api_types.rs
// PURPOSE: Request/response types for the dashboard command layer.
// CONTEXT: All structs use camelCase serialization for JSON output.

use persistence::ExportFormat;
use pivot_engine::{CrosstabAxes, DashboardView, DrillSelection, FilterOptions, FilterPredicate};
use serde::{Deserialize, Serialize};

/// Result of a (re)load of the source workbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResponse {
    pub record_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Local timestamp of the load, "YYYY-MM-DD HH:MM:SS".
    pub loaded_at: String,
    pub options: FilterOptions,
    /// True when a retained filter value vanished from the new data and was reset.
    pub filters_reset: bool,
}

/// Dropdown/search filter values. Blank or None means "All".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterRequest {
    pub division: Option<String>,
    pub stage: Option<String>,
    pub focus_area: Option<String>,
    pub search: Option<String>,
}

impl FilterRequest {
    pub fn to_predicate(&self) -> FilterPredicate {
        FilterPredicate::new()
            .with_division(self.division.as_deref())
            .with_stage(self.stage.as_deref())
            .with_focus_area(self.focus_area.as_deref())
            .with_name_contains(self.search.as_deref())
    }
}

/// What the user clicked to drill through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum DrillRequest {
    /// A matrix cell, row total, column total or the grand total.
    Matrix {
        #[serde(default)]
        axes: CrosstabAxes,
        row: Option<String>,
        col: Option<String>,
    },
    /// A division row of the rankings table.
    Division { label: String },
    /// A fully-specified selection.
    Selection { selection: DrillSelection },
}

impl DrillRequest {
    pub fn to_selection(&self) -> DrillSelection {
        match self {
            DrillRequest::Matrix { axes, row, col } => {
                DrillSelection::from_matrix(*axes, row.as_deref(), col.as_deref())
            }
            DrillRequest::Division { label } => DrillSelection::division(label),
            DrillRequest::Selection { selection } => selection.clone().normalized(),
        }
    }
}

/// A full recomputation plus the state it was computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub view: DashboardView,
    pub options: FilterOptions,
    pub filters: FilterPredicate,
    pub filter_message: String,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_refresh: Option<String>,
    pub seconds_until_refresh: u64,
}

/// Which records an export contained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportScope {
    WorkingSet,
    Drill,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub path: String,
    pub format: ExportFormat,
    pub scope: ExportScope,
    pub rows: usize,
}

/// Connection/refresh status for the header bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub connected: bool,
    pub record_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_refresh: Option<String>,
    pub seconds_until_refresh: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}
