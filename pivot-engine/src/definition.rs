//! FILENAME: pivot-engine/src/definition.rs
//! Pivot Request - The configuration of one projection.
//!
//! Describes which dimensions go on which axis and which measures are
//! selected. Immutable snapshot of caller intent; the engine does not
//! keep it beyond one build.

use serde::{Deserialize, Serialize};

/// Sentinel dimension key marking where measures are inserted into the
/// row or column axis.
pub const VALUES_KEY: &str = "@values";

/// The caller-facing specification of one pivot build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PivotRequest {
    /// Dimension keys assigned to the row axis, outer to inner. May
    /// contain `@values`. Empty = derived (every dimension not assigned
    /// to columns, in tree order).
    #[serde(default)]
    pub rows: Vec<String>,

    /// Dimension keys assigned to the column axis ("pivoted dimensions"),
    /// outer to inner. May contain `@values`.
    pub columns: Vec<String>,

    /// Selected measure keys. Empty = every measure present in the tree,
    /// in first-seen order.
    #[serde(default)]
    pub measures: Vec<String>,

    /// Append a grand-total footer row.
    #[serde(default)]
    pub totals: bool,
}

impl PivotRequest {
    /// A request pivoting the given dimensions to columns; rows derived.
    pub fn columns(columns: Vec<String>) -> Self {
        PivotRequest {
            rows: Vec::new(),
            columns,
            measures: Vec::new(),
            totals: false,
        }
    }

    /// Explicit row-axis order (must cover exactly the non-column
    /// dimensions, plus optionally `@values`).
    pub fn with_rows(mut self, rows: Vec<String>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_measures(mut self, measures: Vec<String>) -> Self {
        self.measures = measures;
        self
    }

    pub fn with_totals(mut self, totals: bool) -> Self {
        self.totals = totals;
        self
    }
}
