//! CSV-backed catalog store.

use std::fs;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tracing::debug;

use super::types::{Catalog, CatalogError};
use super::CatalogStore;

/// Catalog stored as a CSV file with a header row.
///
/// Empty fields load as missing cells. Saving writes a sibling temporary
/// file and renames it over the original.
#[derive(Debug, Clone)]
pub struct CsvCatalogStore {
    path: PathBuf,
    delimiter: u8,
}

impl CsvCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_error(&self, err: impl ToString) -> CatalogError {
        CatalogError::Read {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
    }

    fn write_error(&self, err: impl ToString) -> CatalogError {
        CatalogError::Write {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CatalogStore for CsvCatalogStore {
    fn load(&self) -> Result<Catalog, CatalogError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_path(&self.path)
            .map_err(|e| self.read_error(e))?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| self.read_error(e))?
            .iter()
            .map(|h| h.to_string())
            .collect();
        let width = columns.len();

        let mut records = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| self.read_error(e))?;
            if record.len() > width {
                return Err(CatalogError::RaggedRow {
                    row: index,
                    expected: width,
                    found: record.len(),
                });
            }

            let mut cells: Vec<Option<String>> = record
                .iter()
                .map(|field| (!field.is_empty()).then(|| field.to_string()))
                .collect();
            // Short rows are padded with missing cells.
            cells.resize(width, None);
            records.push(cells);
        }

        debug!(
            "Loaded {} rows x {} columns from {}",
            records.len(),
            width,
            self.path.display()
        );

        Catalog::from_records(columns, records)
    }

    fn save(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        let temp_path = self.temp_path();

        {
            let mut writer = WriterBuilder::new()
                .delimiter(self.delimiter)
                .from_path(&temp_path)
                .map_err(|e| self.write_error(e))?;

            writer
                .write_record(catalog.columns())
                .map_err(|e| self.write_error(e))?;
            for row in catalog.rows() {
                writer
                    .write_record(row.cells().iter().map(|c| c.as_deref().unwrap_or("")))
                    .map_err(|e| self.write_error(e))?;
            }
            writer.flush().map_err(|e| self.write_error(e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| self.write_error(e))?;

        debug!(
            "Saved {} rows to {}",
            catalog.len(),
            self.path.display()
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
