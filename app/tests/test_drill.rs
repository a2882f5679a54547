//! FILENAME: tests/test_drill.rs
//! Integration tests for drill-through from the matrix and the rankings.

mod common;

use common::TestHarness;
use dashboard_lib::commands::{apply_filters, clear_drill, drill_through, get_dashboard};
use dashboard_lib::{DrillRequest, FilterRequest};
use pivot_engine::{CrosstabAxes, DrillSelection};

fn matrix(row: Option<&str>, col: Option<&str>) -> DrillRequest {
    DrillRequest::Matrix {
        axes: CrosstabAxes::default(),
        row: row.map(str::to_string),
        col: col.map(str::to_string),
    }
}

fn names(view: &pivot_engine::DrillView) -> Vec<&str> {
    let mut names: Vec<&str> = view.records.iter().map(|r| r.name.as_str()).collect();
    names.sort();
    names
}

#[test]
fn test_drill_matrix_cell() {
    let harness = TestHarness::with_sample_data();
    let view = drill_through(&harness.state, matrix(Some("Pilot"), Some("Cost"))).unwrap();

    assert_eq!(view.matched_count, 2);
    assert!(!view.fell_back);
    assert_eq!(names(&view), vec!["Line Balancer", "Yield Tracker"]);
    assert_eq!(view.totals.total(), 9.0);
    assert_eq!(view.title, "Pilot - Cost");
    assert_eq!(view.subtitle, "Solutions in Pilot stage with Cost focus area");
}

#[test]
fn test_drill_row_total() {
    let harness = TestHarness::with_sample_data();
    let view = drill_through(&harness.state, matrix(Some("Pilot"), None)).unwrap();
    assert_eq!(view.matched_count, 3);
    assert_eq!(view.totals.total(), 12.0);
}

#[test]
fn test_drill_column_total() {
    let harness = TestHarness::with_sample_data();
    let view = drill_through(&harness.state, matrix(None, Some("Cost"))).unwrap();
    assert_eq!(view.matched_count, 4);
    assert_eq!(view.totals.total(), 15.0);
}

#[test]
fn test_drill_grand_total_is_working_set() {
    let harness = TestHarness::with_sample_data();
    let view = drill_through(&harness.state, matrix(None, None)).unwrap();
    assert_eq!(view.selection, DrillSelection::All);
    assert_eq!(view.matched_count, 7);
    assert_eq!(view.totals.total(), 27.0);
}

#[test]
fn test_drill_division_from_rankings() {
    let harness = TestHarness::with_sample_data();
    let request = DrillRequest::Division {
        label: "IT".to_string(),
    };
    let view = drill_through(&harness.state, request).unwrap();

    assert_eq!(view.matched_count, 2);
    assert_eq!(names(&view), vec!["Vision QC", "Yield Tracker"]);
    assert_eq!(view.by_stage.labels, vec!["Pilot", "R&D"]);
}

#[test]
fn test_drill_empty_cell_falls_back_for_display() {
    let harness = TestHarness::with_sample_data();
    let view =
        drill_through(&harness.state, matrix(Some("Commercialized"), Some("Speed"))).unwrap();

    assert_eq!(view.matched_count, 0);
    assert!(view.fell_back);
    assert_eq!(view.records.len(), 7);
}

#[test]
fn test_drill_respects_filters() {
    let harness = TestHarness::with_sample_data();
    let request = FilterRequest {
        division: Some("Ops".to_string()),
        ..FilterRequest::default()
    };
    apply_filters(&harness.state, request).unwrap();

    let view = drill_through(&harness.state, matrix(Some("Pilot"), None)).unwrap();
    assert_eq!(view.matched_count, 1);
    assert_eq!(names(&view), vec!["Line Balancer"]);
}

#[test]
fn test_drill_selection_survives_filter_change() {
    let harness = TestHarness::with_sample_data();
    drill_through(&harness.state, matrix(None, Some("Cost"))).unwrap();

    let request = FilterRequest {
        division: Some("IT".to_string()),
        ..FilterRequest::default()
    };
    let dashboard = apply_filters(&harness.state, request).unwrap();
    assert_eq!(dashboard.view.drill.matched_count, 1);
    assert_eq!(dashboard.view.drill.records[0].name, "Yield Tracker");
}

#[test]
fn test_clear_drill() {
    let harness = TestHarness::with_sample_data();
    drill_through(&harness.state, matrix(Some("Pilot"), Some("Cost"))).unwrap();
    let view = clear_drill(&harness.state).unwrap();

    assert_eq!(view.selection, DrillSelection::All);
    assert_eq!(view.title, "All Solutions");
    assert_eq!(harness.state.drill_selection().unwrap(), None);

    let dashboard = get_dashboard(&harness.state).unwrap();
    assert_eq!(dashboard.view.drill.matched_count, 7);
}
