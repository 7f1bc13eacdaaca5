//! Missing-data imputation.
//!
//! Columns that account for a large enough share of all missing cells get
//! their gaps filled with a `"<column> Unavailable"` placeholder. Any row
//! that still has a gap afterwards is dropped.
//!
//! Gaps in `title_id` and `ratings` are always filled whatever their share:
//! there they mean "not looked up yet", and the placeholder reads back as
//! an unresolved row.

mod types;

pub use types::*;

use tracing::info;

use crate::catalog::{columns, sentinel_for, Catalog};

/// Default share of the aggregate missing count that makes a column sparse.
pub const DEFAULT_SENTINEL_THRESHOLD_PERCENT: f64 = 5.0;

/// Columns filled by enrichment; their gaps never cause a row to be dropped.
const ENRICHMENT_COLUMNS: [&str; 2] = [columns::TITLE_ID, columns::RATINGS];

/// Missing-data imputer.
#[derive(Debug, Clone)]
pub struct Imputer {
    threshold_percent: f64,
}

impl Default for Imputer {
    fn default() -> Self {
        Self::new(DEFAULT_SENTINEL_THRESHOLD_PERCENT)
    }
}

impl Imputer {
    /// Create an imputer with the given sparse-column threshold (0-100).
    pub fn new(threshold_percent: f64) -> Self {
        Self { threshold_percent }
    }

    pub fn threshold_percent(&self) -> f64 {
        self.threshold_percent
    }

    /// Clean the catalog. The returned catalog has no missing cells.
    pub fn impute(&self, mut catalog: Catalog) -> (Catalog, MissingDataReport) {
        let per_column = catalog.missing_per_column();
        let total_missing: usize = per_column.iter().sum();
        let total_cells = catalog.total_cells();
        let missing_percent = percent(total_missing, total_cells);

        let columns: Vec<ColumnMissing> = catalog
            .columns()
            .iter()
            .zip(&per_column)
            .map(|(column, &missing)| ColumnMissing {
                column: column.clone(),
                missing,
                share_percent: percent(missing, total_missing),
            })
            .collect();

        for column in &columns {
            info!("Missing values in '{}': {}", column.column, column.missing);
        }
        info!("Missing values in total: {}", total_missing);
        info!("Percentage of missing data: {:.2}%", missing_percent);

        let mut sentineled_columns = Vec::new();
        let mut cells_filled = 0;
        for (index, column) in columns.iter().enumerate() {
            let enrichment =
                column.missing > 0 && ENRICHMENT_COLUMNS.contains(&column.column.as_str());
            if enrichment || self.is_sparse(column.missing, total_missing) {
                cells_filled += catalog.fill_missing(index, &sentinel_for(&column.column));
                sentineled_columns.push(column.column.clone());
            }
        }

        let rows_dropped = catalog.retain_complete_rows();
        let remaining_missing: usize = catalog.missing_per_column().iter().sum();

        info!(
            "Imputation filled {} cells in {:?}, dropped {} incomplete rows, {} missing values remain",
            cells_filled, sentineled_columns, rows_dropped, remaining_missing
        );

        let report = MissingDataReport {
            columns,
            total_missing,
            total_cells,
            missing_percent,
            sentineled_columns,
            cells_filled,
            rows_dropped,
            remaining_missing,
        };
        (catalog, report)
    }

    /// Inclusive threshold against the aggregate missing count.
    fn is_sparse(&self, missing: usize, total_missing: usize) -> bool {
        missing > 0 && (missing as f64) * 100.0 >= self.threshold_percent * total_missing as f64
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
