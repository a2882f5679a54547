//! FILENAME: app/src/config.rs
// PURPOSE: Dashboard configuration, read from an optional JSON file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use engine::ColumnKeys;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOURCE_PATH: &str = "Solution List.xlsx";
pub const DEFAULT_EXPORT_FILE_NAME: &str = "solution_savings_export.csv";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;

/// Missing keys take their defaults, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source_path: PathBuf,
    /// Worksheet to read; the first sheet when None.
    pub sheet_name: Option<String>,
    pub column_keys: ColumnKeys,
    pub refresh_interval_secs: u64,
    pub export_file_name: String,
    pub log_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            sheet_name: None,
            column_keys: ColumnKeys::default(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            log_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: DashboardConfig =
            serde_json::from_str(json).map_err(|e| format!("Invalid config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {:?}: {}", path, e))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.refresh_interval_secs == 0 {
            return Err("refresh_interval_secs must be at least 1".to_string());
        }
        if self.export_file_name.trim().is_empty() {
            return Err("export_file_name must not be empty".to_string());
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}
