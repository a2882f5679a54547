//! FILENAME: core/pivot-engine/src/engine.rs
//! Crosstab Engine - cross-tabulates the working set and resolves drill-throughs.
//!
//! Algorithm:
//! 1. Collect the distinct row and column labels of the CURRENT input, sorted
//! 2. Allocate a dense grid: every row label x every column label gets a Group
//! 3. Single pass over the records, accumulating into the cell, its row total,
//!    its column total and the grand total
//!
//! Labels are never taken from a fixed vocabulary. New data can add labels or
//! make old ones vanish, so the axes are rebuilt on every call.

use engine::{Field, Record};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cache::{unique_values, Group};
use crate::definition::{CrosstabAxes, DrillSelection};
use crate::filter::matches_constraints;

// ============================================================================
// CROSSTAB
// ============================================================================

/// A dense two-dimensional grid of Groups with row, column and grand totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crosstab {
    pub axes: CrosstabAxes,

    /// Distinct row-field labels, ascending.
    pub row_labels: Vec<String>,

    /// Distinct column-field labels, ascending.
    pub col_labels: Vec<String>,

    /// `cells[r][c]` aggregates records with `row_labels[r]` and `col_labels[c]`.
    /// Combinations with no records hold a zero Group.
    pub cells: Vec<Vec<Group>>,

    /// One per row label.
    pub row_totals: Vec<Group>,

    /// One per column label.
    pub col_totals: Vec<Group>,

    pub grand_total: Group,
}

impl Crosstab {
    /// An all-zero crosstab with no labels.
    pub fn empty(axes: CrosstabAxes) -> Self {
        Crosstab {
            axes,
            row_labels: Vec::new(),
            col_labels: Vec::new(),
            cells: Vec::new(),
            row_totals: Vec::new(),
            col_totals: Vec::new(),
            grand_total: Group::new(),
        }
    }

    pub fn row_index(&self, row: &str) -> Option<usize> {
        self.row_labels.binary_search_by(|l| l.as_str().cmp(row)).ok()
    }

    pub fn col_index(&self, col: &str) -> Option<usize> {
        self.col_labels.binary_search_by(|l| l.as_str().cmp(col)).ok()
    }

    /// The cell for a (row, column) label pair, if both labels exist.
    pub fn cell(&self, row: &str, col: &str) -> Option<&Group> {
        let r = self.row_index(row)?;
        let c = self.col_index(col)?;
        self.cells.get(r).and_then(|cells| cells.get(c))
    }

    pub fn row_total(&self, row: &str) -> Option<&Group> {
        self.row_index(row).and_then(|r| self.row_totals.get(r))
    }

    pub fn col_total(&self, col: &str) -> Option<&Group> {
        self.col_index(col).and_then(|c| self.col_totals.get(c))
    }

    /// Drill selection for clicking a cell.
    pub fn select_cell(&self, row: &str, col: &str) -> DrillSelection {
        DrillSelection::Cell {
            axes: self.axes,
            row: row.to_string(),
            col: col.to_string(),
        }
    }

    /// Drill selection for clicking a row total.
    pub fn select_row(&self, row: &str) -> DrillSelection {
        DrillSelection::RowTotal {
            axes: self.axes,
            row: row.to_string(),
        }
    }

    /// Drill selection for clicking a column total.
    pub fn select_column(&self, col: &str) -> DrillSelection {
        DrillSelection::ColumnTotal {
            axes: self.axes,
            col: col.to_string(),
        }
    }

    /// Drill selection for clicking the grand total.
    pub fn select_grand_total(&self) -> DrillSelection {
        DrillSelection::All
    }
}

/// Cross-tabulates `records` by `row_field` x `col_field`.
pub fn build_crosstab(records: &[&Record], row_field: Field, col_field: Field) -> Crosstab {
    let axes = CrosstabAxes::new(row_field, col_field);
    let row_labels = unique_values(records.iter().copied(), row_field);
    let col_labels = unique_values(records.iter().copied(), col_field);

    let mut crosstab = Crosstab {
        axes,
        cells: vec![vec![Group::new(); col_labels.len()]; row_labels.len()],
        row_totals: vec![Group::new(); row_labels.len()],
        col_totals: vec![Group::new(); col_labels.len()],
        grand_total: Group::new(),
        row_labels,
        col_labels,
    };

    let row_lookup: FxHashMap<&str, usize> = crosstab
        .row_labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();
    let col_lookup: FxHashMap<&str, usize> = crosstab
        .col_labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();

    for record in records {
        // Both labels are present: the axes came from these same records.
        let (Some(&r), Some(&c)) = (
            row_lookup.get(record.label(row_field)),
            col_lookup.get(record.label(col_field)),
        ) else {
            continue;
        };

        crosstab.cells[r][c].add_record(record);
        crosstab.row_totals[r].add_record(record);
        crosstab.col_totals[c].add_record(record);
        crosstab.grand_total.add_record(record);
    }

    crosstab
}

// ============================================================================
// DRILL-THROUGH
// ============================================================================

/// Returns the working-set records matching `selection`, in working-set order.
///
/// An empty result is reported as empty. Falling back to the working set for
/// display is the caller's decision, see `DrillView`.
pub fn drill_through<'a>(working_set: &[&'a Record], selection: &DrillSelection) -> Vec<&'a Record> {
    let constraints = selection.constraints();
    working_set
        .iter()
        .copied()
        .filter(|record| matches_constraints(record, &constraints))
        .collect()
}
