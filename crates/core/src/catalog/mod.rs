//! Media catalog - the table shared by every pipeline stage.
//!
//! The catalog is loaded once, cleaned and enriched in memory, and written
//! back to the same backing location after each enrichment stage.

mod csv_store;
mod types;

pub use csv_store::CsvCatalogStore;
pub use types::*;

/// Trait for catalog persistence.
pub trait CatalogStore: Send + Sync {
    /// Load the whole catalog.
    fn load(&self) -> Result<Catalog, CatalogError>;

    /// Overwrite the backing location with the full catalog.
    fn save(&self, catalog: &Catalog) -> Result<(), CatalogError>;

    /// Human-readable location used in logs.
    fn location(&self) -> String;

    /// Column-level "already filled in" heuristic: the column holds more
    /// than one distinct present value.
    fn column_is_populated(&self, catalog: &Catalog, column: &str) -> Result<bool, CatalogError> {
        Ok(catalog.distinct_count(column)? > 1)
    }
}
