//! FILENAME: app/src/lib.rs
// PURPOSE: Dashboard library entry point: state, commands and CLI.
// CONTEXT: The pivot engine is pure. All mutable state (snapshot, filters,
// drill selection, refresh clock) lives here and is passed in per call.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use chrono::{DateTime, Local};
use engine::Record;
use pivot_engine::{DrillSelection, FilterOptions, FilterPredicate};

pub mod api_types;
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod render;

pub use api_types::{
    DashboardResponse, DrillRequest, ExportResponse, ExportScope, FilterRequest, LoadResponse,
    StatusResponse,
};
pub use config::DashboardConfig;
pub use logging::{get_log_path, init_log_file, init_logger, next_seq, write_log};

// Re-exported for the logging macros.
pub use log;

/// Timestamp format used for "last refresh" displays.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// DATASET
// ============================================================================

/// One immutable record snapshot. Replaced wholesale on every load.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    /// Filter drop-down values, computed once per snapshot.
    pub options: FilterOptions,
    pub loaded_at: Option<DateTime<Local>>,
    pub source: Option<PathBuf>,
}

impl Dataset {
    pub fn new(records: Vec<Record>, source: Option<PathBuf>) -> Self {
        Dataset {
            options: FilterOptions::from_records(&records),
            records,
            loaded_at: Some(Local::now()),
            source,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    pub fn loaded_at_display(&self) -> Option<String> {
        self.loaded_at
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
    }
}

// ============================================================================
// APP STATE
// ============================================================================

pub struct AppState {
    pub config: DashboardConfig,
    /// Current snapshot. Readers clone the Arc and never see a partial swap.
    pub dataset: Mutex<Arc<Dataset>>,
    pub filters: Mutex<FilterPredicate>,
    pub drill: Mutex<Option<DrillSelection>>,
    /// When the last load attempt (successful or not) finished.
    pub last_refresh: Mutex<Option<Instant>>,
    /// Message of the last failed load; cleared by a successful one.
    pub last_error: Mutex<Option<String>>,
}

pub fn create_app_state(config: DashboardConfig) -> AppState {
    log_info!("SYS", "Creating AppState (source {:?})", config.source_path);
    AppState {
        config,
        dataset: Mutex::new(Arc::new(Dataset::default())),
        filters: Mutex::new(FilterPredicate::new()),
        drill: Mutex::new(None),
        last_refresh: Mutex::new(None),
        last_error: Mutex::new(None),
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, String> {
    mutex.lock().map_err(|e| format!("Lock error: {}", e))
}

impl AppState {
    /// The current snapshot.
    pub fn snapshot(&self) -> Result<Arc<Dataset>, String> {
        Ok(Arc::clone(&*lock(&self.dataset)?))
    }

    pub fn filters(&self) -> Result<FilterPredicate, String> {
        Ok(lock(&self.filters)?.clone())
    }

    pub fn drill_selection(&self) -> Result<Option<DrillSelection>, String> {
        Ok(lock(&self.drill)?.clone())
    }

    /// Connected means a snapshot exists and the most recent load succeeded.
    pub fn is_connected(&self) -> Result<bool, String> {
        let loaded = self.snapshot()?.is_loaded();
        Ok(loaded && lock(&self.last_error)?.is_none())
    }
}
