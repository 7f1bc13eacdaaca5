//! Types for missing-data imputation.

use serde::{Deserialize, Serialize};

/// Missing-cell statistics of one column, taken before imputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    /// Missing cells in this column.
    pub missing: usize,
    /// Share of the aggregate missing count (0-100).
    pub share_percent: f64,
}

/// Diagnostics produced by an imputation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingDataReport {
    /// Per-column counts, in column order.
    pub columns: Vec<ColumnMissing>,
    /// Missing cells across the whole table.
    pub total_missing: usize,
    /// Rows x columns before imputation.
    pub total_cells: usize,
    /// `total_missing / total_cells`, as a percentage.
    pub missing_percent: f64,
    /// Columns whose gaps were filled with a placeholder.
    pub sentineled_columns: Vec<String>,
    /// Cells filled with a placeholder.
    pub cells_filled: usize,
    /// Rows removed because they still had gaps.
    pub rows_dropped: usize,
    /// Missing cells left after cleaning (always 0).
    pub remaining_missing: usize,
}

impl MissingDataReport {
    /// Missing count of a named column.
    pub fn missing_in(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.missing)
    }
}
