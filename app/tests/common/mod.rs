//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for dashboard integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use dashboard_lib::commands::{load_data, replace_raw_records};
use dashboard_lib::{create_app_state, AppState, DashboardConfig};
use engine::RawRecord;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

/// One fixture row: name, division, focus area, stage, smv, oh, other.
pub type SolutionRow = (&'static str, &'static str, &'static str, &'static str, f64, f64, f64);

/// Test harness owning an AppState and a scratch directory.
pub struct TestHarness {
    pub state: AppState,
    pub dir: TempDir,
}

impl TestHarness {
    /// Empty state; the source path points at a workbook in the scratch dir
    /// that does not exist yet.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let config = DashboardConfig {
            source_path: dir.path().join("Solution List.xlsx"),
            ..DashboardConfig::default()
        };
        TestHarness {
            state: create_app_state(config),
            dir,
        }
    }

    /// Harness with the sample solutions installed in memory.
    pub fn with_sample_data() -> Self {
        let harness = Self::new();
        harness.install_rows(&SolutionFixture::data());
        harness
    }

    /// Harness whose source workbook holds the sample solutions, already loaded.
    pub fn with_workbook() -> Self {
        let harness = Self::new();
        harness.write_workbook(&SolutionFixture::data());
        load_data(&harness.state).expect("initial load");
        harness
    }

    pub fn install_rows(&self, rows: &[SolutionRow]) {
        let raw: Vec<RawRecord> = rows.iter().map(raw_record).collect();
        replace_raw_records(&self.state, &raw, None).expect("install rows");
    }

    /// (Re)writes the configured source workbook.
    pub fn write_workbook(&self, rows: &[SolutionRow]) {
        write_workbook(&self.state.config.source_path, rows);
    }

    pub fn source_path(&self) -> &Path {
        &self.state.config.source_path
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.path().join(file_name)
    }
}

fn raw_record(row: &SolutionRow) -> RawRecord {
    let (name, division, focus, stage, smv, oh, other) = *row;
    RawRecord::new()
        .with("Solution Name", name)
        .with("Division", division)
        .with("Focus Area", focus)
        .with("Stage", stage)
        .with("SMV Unlock", smv)
        .with("OH Reduction", oh)
        .with("Other Savings", other)
}

/// Writes a solution list workbook with the default headers.
pub fn write_workbook(path: &Path, rows: &[SolutionRow]) {
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Solutions").unwrap();
        for (col, header) in SolutionFixture::headers().iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        for (i, (name, division, focus, stage, smv, oh, other)) in rows.iter().enumerate() {
            let row = (i + 1) as u32;
            for (col, text) in [name, division, focus, stage].iter().enumerate() {
                if !text.is_empty() {
                    sheet.write_string(row, col as u16, **text).unwrap();
                }
            }
            sheet.write_number(row, 4, *smv).unwrap();
            sheet.write_number(row, 5, *oh).unwrap();
            sheet.write_number(row, 6, *other).unwrap();
        }
    }
    workbook.save(path).unwrap();
}

/// Sample solution list.
///
/// Division totals: IT 11.0 (2), Ops 8.5 (3), Finance 4.5 (1), Unspecified 3.0 (1).
/// Grand total 27.0 over 7 solutions.
pub struct SolutionFixture;

impl SolutionFixture {
    pub fn headers() -> Vec<&'static str> {
        vec![
            "Solution Name",
            "Division",
            "Focus Area",
            "Stage",
            "SMV Unlock",
            "OH Reduction",
            "Other Savings",
        ]
    }

    pub fn data() -> Vec<SolutionRow> {
        vec![
            ("Line Balancer", "Ops", "Cost", "Pilot", 2.0, 1.0, 0.0),
            ("Smart Scheduler", "Ops", "Quality", "Commercialized", 3.0, 0.0, 1.0),
            ("Vision QC", "IT", "Quality", "R&D", 0.0, 5.0, 0.0),
            ("Energy Monitor", "Finance", "Cost", "Commercialized", 1.5, 2.5, 0.5),
            ("Yield Tracker", "IT", "Cost", "Pilot", 4.0, 0.0, 2.0),
            ("Cut Planner", "Ops", "Cost", "R&D", 0.5, 0.5, 0.5),
            ("Dock Router", "", "Speed", "Pilot", 1.0, 1.0, 1.0),
        ]
    }

    pub fn count() -> usize {
        Self::data().len()
    }
}
