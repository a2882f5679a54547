//! FILENAME: core/pivot-engine/src/definition.rs
//! Dashboard Definitions - The serializable inputs to every recomputation.
//!
//! These types DESCRIBE what the caller wants to see:
//! - which records are in the working set (`FilterPredicate`)
//! - which two fields span the matrix (`CrosstabAxes`)
//! - which slice of the working set is drilled into (`DrillSelection`)
//!
//! They are plain values owned by the caller. The engine never stores them.

use engine::{normalize_label_str, Field, Metric};
use serde::{Deserialize, Deserializer, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::filter::FilterOptions;

/// Equality constraints a selection or predicate imposes, as (field, label).
pub type Constraints<'a> = SmallVec<[(Field, &'a str); 4]>;

// ============================================================================
// FILTER PREDICATE
// ============================================================================

/// Conjunctive filter over normalized record fields.
/// An unset constraint imposes no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPredicate {
    /// Exact match on the normalized division.
    #[serde(deserialize_with = "deserialize_non_blank")]
    pub division: Option<String>,
    /// Exact match on the normalized stage.
    #[serde(deserialize_with = "deserialize_non_blank")]
    pub stage: Option<String>,
    /// Exact match on the normalized focus area.
    #[serde(deserialize_with = "deserialize_non_blank")]
    pub focus_area: Option<String>,
    /// Case-insensitive substring of the normalized name.
    #[serde(deserialize_with = "deserialize_non_blank")]
    pub name_contains: Option<String>,
}

/// Blank selections mean "All" in the filter bar.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Deserialized predicates get the same trimming as the builders.
fn deserialize_non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(non_blank(value.as_deref()))
}

impl FilterPredicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_division(mut self, value: Option<&str>) -> Self {
        self.division = non_blank(value);
        self
    }

    pub fn with_stage(mut self, value: Option<&str>) -> Self {
        self.stage = non_blank(value);
        self
    }

    pub fn with_focus_area(mut self, value: Option<&str>) -> Self {
        self.focus_area = non_blank(value);
        self
    }

    pub fn with_name_contains(mut self, value: Option<&str>) -> Self {
        self.name_contains = non_blank(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.division.is_none()
            && self.stage.is_none()
            && self.focus_area.is_none()
            && self.name_contains.is_none()
    }

    /// The exact-match constraints, excluding the name search.
    pub fn constraints(&self) -> Constraints<'_> {
        let mut out = Constraints::new();
        if let Some(v) = &self.division {
            out.push((Field::Division, v.as_str()));
        }
        if let Some(v) = &self.stage {
            out.push((Field::Stage, v.as_str()));
        }
        if let Some(v) = &self.focus_area {
            out.push((Field::FocusArea, v.as_str()));
        }
        out
    }

    /// The name search, lowercased and trimmed, if any.
    pub fn search_term(&self) -> Option<String> {
        self.name_contains
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
    }

    /// Clears selections that no longer exist in a freshly loaded snapshot.
    /// Returns true if anything was cleared.
    pub fn retain_available(&mut self, options: &FilterOptions) -> bool {
        let mut changed = false;
        for (slot, available) in [
            (&mut self.division, &options.divisions),
            (&mut self.stage, &options.stages),
            (&mut self.focus_area, &options.focus_areas),
        ] {
            let stale = slot
                .as_deref()
                .map(|v| !available.iter().any(|a| a == v))
                .unwrap_or(false);
            if stale {
                *slot = None;
                changed = true;
            }
        }
        changed
    }
}

// ============================================================================
// CROSSTAB AXES
// ============================================================================

/// The row and column fields of a crosstab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrosstabAxes {
    pub row_field: Field,
    pub col_field: Field,
}

impl CrosstabAxes {
    pub fn new(row_field: Field, col_field: Field) -> Self {
        CrosstabAxes { row_field, col_field }
    }
}

impl Default for CrosstabAxes {
    /// Stage down the side, focus area across the top.
    fn default() -> Self {
        CrosstabAxes::new(Field::Stage, Field::FocusArea)
    }
}

// ============================================================================
// SORT ORDER
// ============================================================================

/// Presentation order for grouped aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Alphabetical by label.
    LabelAscending,
    /// Largest metric first; exact ties by label ascending.
    MetricDescending(Metric),
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::LabelAscending
    }
}

// ============================================================================
// DRILL SELECTION
// ============================================================================

/// A slice of the working set picked from the matrix or the rankings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrillSelection {
    /// The grand-total cell: the whole working set.
    All,
    /// One matrix cell.
    Cell {
        axes: CrosstabAxes,
        row: String,
        col: String,
    },
    /// A row total ("any column").
    RowTotal { axes: CrosstabAxes, row: String },
    /// A column total ("any row").
    ColumnTotal { axes: CrosstabAxes, col: String },
    /// A single label of one field, e.g. a division from the rankings.
    Label { field: Field, label: String },
}

impl DrillSelection {
    /// Selects one division, as a click in the rankings table does.
    pub fn division(label: &str) -> Self {
        DrillSelection::Label {
            field: Field::Division,
            label: normalize_label_str(label),
        }
    }

    /// Builds a matrix selection from optional row/column labels.
    /// Both None is the grand total.
    pub fn from_matrix(axes: CrosstabAxes, row: Option<&str>, col: Option<&str>) -> Self {
        match (non_blank(row), non_blank(col)) {
            (Some(row), Some(col)) => DrillSelection::Cell { axes, row, col },
            (Some(row), None) => DrillSelection::RowTotal { axes, row },
            (None, Some(col)) => DrillSelection::ColumnTotal { axes, col },
            (None, None) => DrillSelection::All,
        }
    }

    /// Normalizes every label the way records are normalized, so a selection
    /// built outside the builders (e.g. deserialized) still matches.
    pub fn normalized(self) -> Self {
        match self {
            DrillSelection::All => DrillSelection::All,
            DrillSelection::Cell { axes, row, col } => DrillSelection::Cell {
                axes,
                row: normalize_label_str(&row),
                col: normalize_label_str(&col),
            },
            DrillSelection::RowTotal { axes, row } => DrillSelection::RowTotal {
                axes,
                row: normalize_label_str(&row),
            },
            DrillSelection::ColumnTotal { axes, col } => DrillSelection::ColumnTotal {
                axes,
                col: normalize_label_str(&col),
            },
            DrillSelection::Label { field, label } => DrillSelection::Label {
                field,
                label: normalize_label_str(&label),
            },
        }
    }

    /// The equality constraints this selection imposes on the working set.
    pub fn constraints(&self) -> Constraints<'_> {
        match self {
            DrillSelection::All => Constraints::new(),
            DrillSelection::Cell { axes, row, col } => smallvec![
                (axes.row_field, row.as_str()),
                (axes.col_field, col.as_str()),
            ],
            DrillSelection::RowTotal { axes, row } => smallvec![(axes.row_field, row.as_str())],
            DrillSelection::ColumnTotal { axes, col } => smallvec![(axes.col_field, col.as_str())],
            DrillSelection::Label { field, label } => smallvec![(*field, label.as_str())],
        }
    }

    /// Heading shown above the drill-through table.
    pub fn title(&self) -> String {
        match self {
            DrillSelection::All => "All Solutions".to_string(),
            DrillSelection::Cell { row, col, .. } => format!("{} - {}", row, col),
            DrillSelection::RowTotal { axes, row } => single_title(axes.row_field, row),
            DrillSelection::ColumnTotal { axes, col } => single_title(axes.col_field, col),
            DrillSelection::Label { field, label } => single_title(*field, label),
        }
    }

    /// One-line description under the title.
    pub fn subtitle(&self) -> String {
        match self {
            DrillSelection::All => String::new(),
            DrillSelection::Cell { axes, row, col } => format!(
                "Solutions {} {}",
                phrase(axes.row_field, row),
                phrase(axes.col_field, col)
            ),
            DrillSelection::RowTotal { axes, row } => {
                format!("All solutions {}", phrase(axes.row_field, row))
            }
            DrillSelection::ColumnTotal { axes, col } => {
                format!("All solutions {}", phrase(axes.col_field, col))
            }
            DrillSelection::Label { field, label } => {
                format!("All solutions {}", phrase(*field, label))
            }
        }
    }
}

fn single_title(field: Field, label: &str) -> String {
    match field {
        Field::Stage => format!("{} Stage", label),
        _ => label.to_string(),
    }
}

fn phrase(field: Field, label: &str) -> String {
    match field {
        Field::Stage => format!("in {} stage", label),
        Field::FocusArea => format!("with {} focus area", label),
        Field::Division => format!("in {} division", label),
        Field::Name => format!("named {}", label),
    }
}
