//! Types for the media catalog table.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Well-known catalog column names.
pub mod columns {
    pub const TITLE: &str = "title";
    pub const TYPE: &str = "type";
    pub const RELEASE_YEAR: &str = "release_year";
    pub const DATE_ADDED: &str = "date_added";
    pub const LISTED_IN: &str = "listed_in";
    pub const DIRECTOR: &str = "director";
    pub const TITLE_ID: &str = "title_id";
    pub const RATINGS: &str = "ratings";
}

/// Marker written to `title_id` when the search found no identifier.
pub const UNRESOLVED_TITLE_ID: &str = "NotFound/Unavailable";

/// Marker written to `ratings` when no rating could be extracted.
pub const UNRATED: &str = "NaN";

const SENTINEL_SUFFIX: &str = " Unavailable";

/// Placeholder substituted for missing cells of a sparse column.
pub fn sentinel_for(column: &str) -> String {
    format!("{}{}", column, SENTINEL_SUFFIX)
}

/// Whether `value` is the imputation placeholder of `column`.
pub fn is_sentinel_for(column: &str, value: &str) -> bool {
    value.strip_suffix(SENTINEL_SUFFIX) == Some(column)
}

/// External title identifier (`tt` followed by digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TitleId(String);

impl TitleId {
    /// Parse an identifier, accepting surrounding whitespace only.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix("tt")?;
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(trimmed.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TitleId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid title identifier: {}", value))
    }
}

impl From<TitleId> for String {
    fn from(id: TitleId) -> Self {
        id.0
    }
}

/// Per-row enrichment state of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    /// Not attempted yet (empty, placeholder or malformed cell).
    #[default]
    Unresolved,
    /// Holds a usable value.
    Resolved,
    /// Attempted; the external service had nothing to offer.
    Unresolvable,
}

impl EnrichmentStatus {
    /// Derive the status of a `title_id` cell.
    pub fn of_title_id(cell: Option<&str>) -> Self {
        match cell {
            Some(UNRESOLVED_TITLE_ID) => Self::Unresolvable,
            Some(value) if TitleId::parse(value).is_some() => Self::Resolved,
            _ => Self::Unresolved,
        }
    }

    /// Derive the status of a `ratings` cell.
    pub fn of_rating(cell: Option<&str>) -> Self {
        match cell {
            Some(value) if value.trim().eq_ignore_ascii_case(UNRATED) => Self::Unresolvable,
            Some(value) if parse_rating(value).is_some() => Self::Resolved,
            _ => Self::Unresolved,
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

/// Lowest rating accepted from the detail page.
pub const MIN_RATING: f64 = 0.0;
/// Highest rating accepted from the detail page.
pub const MAX_RATING: f64 = 10.0;

/// Parse a rating cell, rejecting non-finite or out-of-range values.
pub fn parse_rating(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && (MIN_RATING..=MAX_RATING).contains(&value)).then_some(value)
}

/// Parse a release year cell; tolerates a trailing ".0".
pub fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    raw.parse::<i32>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|y| y.fract() == 0.0 && (0.0..=9999.0).contains(y))
            .map(|y| y as i32)
    })
}

/// Outcome of resolving one row's identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierResolution {
    Resolved(TitleId),
    Unresolvable,
}

impl IdentifierResolution {
    pub fn to_cell(&self) -> String {
        match self {
            Self::Resolved(id) => id.to_string(),
            Self::Unresolvable => UNRESOLVED_TITLE_ID.to_string(),
        }
    }

    pub fn status(&self) -> EnrichmentStatus {
        match self {
            Self::Resolved(_) => EnrichmentStatus::Resolved,
            Self::Unresolvable => EnrichmentStatus::Unresolvable,
        }
    }
}

/// Outcome of fetching one row's rating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatingOutcome {
    Rated(f64),
    Unrated,
}

impl RatingOutcome {
    pub fn to_cell(&self) -> String {
        match self {
            // Keep one decimal for whole numbers so "8" reads back as "8.0".
            Self::Rated(value) if value.fract() == 0.0 => format!("{:.1}", value),
            Self::Rated(value) => value.to_string(),
            Self::Unrated => UNRATED.to_string(),
        }
    }

    pub fn status(&self) -> EnrichmentStatus {
        match self {
            Self::Rated(_) => EnrichmentStatus::Resolved,
            Self::Unrated => EnrichmentStatus::Unresolvable,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Rated(value) => Some(*value),
            Self::Unrated => None,
        }
    }
}

/// One catalog row: its cells plus the enrichment state of the
/// identifier and rating columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: Vec<Option<String>>,
    title_id_status: EnrichmentStatus,
    rating_status: EnrichmentStatus,
}

impl Row {
    pub fn cells(&self) -> &[Option<String>] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    pub fn has_missing(&self) -> bool {
        self.cells.iter().any(Option::is_none)
    }

    pub fn title_id_status(&self) -> EnrichmentStatus {
        self.title_id_status
    }

    pub fn rating_status(&self) -> EnrichmentStatus {
        self.rating_status
    }
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to write catalog {path}: {message}")]
    Write { path: String, message: String },

    #[error("Catalog is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Duplicate column '{0}' in catalog header")]
    DuplicateColumn(String),

    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row index {0} out of bounds")]
    RowOutOfBounds(usize),
}

/// The media catalog: ordered columns and ordered rows.
///
/// A cell is `None` when missing. Writes to `title_id` and `ratings`
/// go through [`Catalog::set_title_id`] and [`Catalog::set_rating`] so the
/// per-row status always matches the cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Catalog {
    /// Create an empty catalog with the given header.
    pub fn new(columns: Vec<String>) -> Result<Self, CatalogError> {
        Self::from_records(columns, Vec::new())
    }

    /// Build a catalog from a header and raw records.
    pub fn from_records(
        columns: Vec<String>,
        records: Vec<Vec<Option<String>>>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(CatalogError::DuplicateColumn(column.clone()));
            }
        }

        let width = columns.len();
        let mut rows = Vec::with_capacity(records.len());
        for (index, cells) in records.into_iter().enumerate() {
            if cells.len() != width {
                return Err(CatalogError::RaggedRow {
                    row: index,
                    expected: width,
                    found: cells.len(),
                });
            }
            rows.push(Row {
                cells,
                title_id_status: EnrichmentStatus::Unresolved,
                rating_status: EnrichmentStatus::Unresolved,
            });
        }

        let mut catalog = Self { columns, rows };
        catalog.refresh_statuses();
        Ok(catalog)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_cells(&self) -> usize {
        self.rows.len() * self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of a column that must exist.
    pub fn require_column(&self, name: &str) -> Result<usize, CatalogError> {
        self.column_index(name)
            .ok_or_else(|| CatalogError::MissingColumn(name.to_string()))
    }

    /// Append an all-missing column unless it already exists.
    ///
    /// Returns `true` if the column was added.
    pub fn ensure_column(&mut self, name: &str) -> bool {
        if self.column_index(name).is_some() {
            return false;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.cells.push(None);
        }
        self.refresh_statuses();
        true
    }

    /// Cell text at (`row`, `column`), `None` when missing or out of range.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Cell text of a named column.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        self.column_index(column).and_then(|c| self.cell(row, c))
    }

    /// Snapshot of a whole column.
    pub fn column_values(&self, name: &str) -> Result<Vec<Option<String>>, CatalogError> {
        let index = self.require_column(name)?;
        Ok(self
            .rows
            .iter()
            .map(|r| r.cells[index].clone())
            .collect())
    }

    /// Number of distinct present values in a column.
    pub fn distinct_count(&self, name: &str) -> Result<usize, CatalogError> {
        let index = self.require_column(name)?;
        let distinct: HashSet<&str> = self.rows.iter().filter_map(|r| r.get(index)).collect();
        Ok(distinct.len())
    }

    /// Missing-cell count for every column, in column order.
    pub fn missing_per_column(&self) -> Vec<usize> {
        let mut counts = vec![0; self.columns.len()];
        for row in &self.rows {
            for (index, cell) in row.cells.iter().enumerate() {
                if cell.is_none() {
                    counts[index] += 1;
                }
            }
        }
        counts
    }

    /// Record an identifier resolution for a row.
    pub fn set_title_id(
        &mut self,
        row: usize,
        resolution: &IdentifierResolution,
    ) -> Result<(), CatalogError> {
        let index = self.require_column(columns::TITLE_ID)?;
        let target = self
            .rows
            .get_mut(row)
            .ok_or(CatalogError::RowOutOfBounds(row))?;
        target.cells[index] = Some(resolution.to_cell());
        target.title_id_status = resolution.status();
        Ok(())
    }

    /// Record a rating outcome for a row.
    pub fn set_rating(&mut self, row: usize, outcome: &RatingOutcome) -> Result<(), CatalogError> {
        let index = self.require_column(columns::RATINGS)?;
        let target = self
            .rows
            .get_mut(row)
            .ok_or(CatalogError::RowOutOfBounds(row))?;
        target.cells[index] = Some(outcome.to_cell());
        target.rating_status = outcome.status();
        Ok(())
    }

    /// Replace every missing cell of a column with `value`.
    ///
    /// Returns the number of cells filled.
    pub(crate) fn fill_missing(&mut self, column: usize, value: &str) -> usize {
        let mut filled = 0;
        for row in &mut self.rows {
            if let Some(cell) = row.cells.get_mut(column) {
                if cell.is_none() {
                    *cell = Some(value.to_string());
                    filled += 1;
                }
            }
        }
        self.refresh_statuses();
        filled
    }

    /// Drop every row with a missing cell. Returns the number dropped.
    pub(crate) fn retain_complete_rows(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(|r| !r.has_missing());
        before - self.rows.len()
    }

    fn refresh_statuses(&mut self) {
        let title_id = self.column_index(columns::TITLE_ID);
        let ratings = self.column_index(columns::RATINGS);
        for row in &mut self.rows {
            row.title_id_status = title_id
                .map(|i| EnrichmentStatus::of_title_id(row.cells[i].as_deref()))
                .unwrap_or_default();
            row.rating_status = ratings
                .map(|i| EnrichmentStatus::of_rating(row.cells[i].as_deref()))
                .unwrap_or_default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| (!v.is_empty()).then(|| v.to_string()))
            .collect()
    }

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_title_id_parse() {
        assert_eq!(TitleId::parse("tt1234567").unwrap().as_str(), "tt1234567");
        assert_eq!(TitleId::parse(" tt42 ").unwrap().as_str(), "tt42");
        assert!(TitleId::parse("tt").is_none());
        assert!(TitleId::parse("nm1234567").is_none());
        assert!(TitleId::parse("tt12ab").is_none());
        assert!(TitleId::parse(UNRESOLVED_TITLE_ID).is_none());
    }

    #[test]
    fn test_sentinel_naming() {
        assert_eq!(sentinel_for("director"), "director Unavailable");
        assert!(is_sentinel_for("director", "director Unavailable"));
        assert!(!is_sentinel_for("cast", "director Unavailable"));
        assert!(!is_sentinel_for("title_id", UNRESOLVED_TITLE_ID));
    }

    #[test]
    fn test_title_id_status_derivation() {
        assert_eq!(EnrichmentStatus::of_title_id(None), EnrichmentStatus::Unresolved);
        assert_eq!(
            EnrichmentStatus::of_title_id(Some("title_id Unavailable")),
            EnrichmentStatus::Unresolved
        );
        assert_eq!(
            EnrichmentStatus::of_title_id(Some("tt0111161")),
            EnrichmentStatus::Resolved
        );
        assert_eq!(
            EnrichmentStatus::of_title_id(Some(UNRESOLVED_TITLE_ID)),
            EnrichmentStatus::Unresolvable
        );
    }

    #[test]
    fn test_rating_status_derivation() {
        assert_eq!(EnrichmentStatus::of_rating(None), EnrichmentStatus::Unresolved);
        assert_eq!(
            EnrichmentStatus::of_rating(Some("ratings Unavailable")),
            EnrichmentStatus::Unresolved
        );
        assert_eq!(EnrichmentStatus::of_rating(Some("7.5")), EnrichmentStatus::Resolved);
        assert_eq!(EnrichmentStatus::of_rating(Some("NaN")), EnrichmentStatus::Unresolvable);
        assert_eq!(EnrichmentStatus::of_rating(Some("nan")), EnrichmentStatus::Unresolvable);
        assert_eq!(EnrichmentStatus::of_rating(Some("42")), EnrichmentStatus::Unresolved);
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2020"), Some(2020));
        assert_eq!(parse_year(" 1999.0 "), Some(1999));
        assert_eq!(parse_year("release_year Unavailable"), None);
        assert_eq!(parse_year("1999.5"), None);
    }

    #[test]
    fn test_rating_outcome_cells() {
        assert_eq!(RatingOutcome::Rated(7.5).to_cell(), "7.5");
        assert_eq!(RatingOutcome::Rated(8.0).to_cell(), "8.0");
        assert_eq!(RatingOutcome::Unrated.to_cell(), "NaN");
    }

    #[test]
    fn test_from_records_rejects_ragged_rows() {
        let result = Catalog::from_records(header(&["a", "b"]), vec![cells(&["1"])]);
        assert!(matches!(
            result,
            Err(CatalogError::RaggedRow {
                row: 0,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_from_records_rejects_duplicate_columns() {
        let result = Catalog::from_records(header(&["a", "a"]), vec![]);
        assert!(matches!(result, Err(CatalogError::DuplicateColumn(_))));
    }

    #[test]
    fn test_statuses_follow_cells() {
        let mut catalog = Catalog::from_records(
            header(&["title", "title_id", "ratings"]),
            vec![cells(&["A", "tt1", "7.1"]), cells(&["B", "", ""])],
        )
        .unwrap();

        assert_eq!(catalog.rows()[0].title_id_status(), EnrichmentStatus::Resolved);
        assert_eq!(catalog.rows()[0].rating_status(), EnrichmentStatus::Resolved);
        assert_eq!(catalog.rows()[1].title_id_status(), EnrichmentStatus::Unresolved);

        catalog
            .set_title_id(1, &IdentifierResolution::Unresolvable)
            .unwrap();
        catalog.set_rating(1, &RatingOutcome::Unrated).unwrap();
        assert_eq!(catalog.value(1, "title_id"), Some(UNRESOLVED_TITLE_ID));
        assert_eq!(
            catalog.rows()[1].title_id_status(),
            EnrichmentStatus::Unresolvable
        );
        assert_eq!(catalog.value(1, "ratings"), Some("NaN"));
    }

    #[test]
    fn test_set_title_id_out_of_bounds() {
        let mut catalog = Catalog::new(header(&["title_id"])).unwrap();
        let result = catalog.set_title_id(3, &IdentifierResolution::Unresolvable);
        assert!(matches!(result, Err(CatalogError::RowOutOfBounds(3))));
    }

    #[test]
    fn test_ensure_column_appends_missing_cells() {
        let mut catalog =
            Catalog::from_records(header(&["title"]), vec![cells(&["A"]), cells(&["B"])]).unwrap();

        assert!(catalog.ensure_column("ratings"));
        assert!(!catalog.ensure_column("ratings"));
        assert_eq!(catalog.columns(), &["title".to_string(), "ratings".to_string()]);
        assert!(catalog.rows().iter().all(|r| r.get(1).is_none()));
    }

    #[test]
    fn test_distinct_count_ignores_missing() {
        let catalog = Catalog::from_records(
            header(&["title_id"]),
            vec![cells(&["tt1"]), cells(&[""]), cells(&["tt1"]), cells(&["tt2"])],
        )
        .unwrap();
        assert_eq!(catalog.distinct_count("title_id").unwrap(), 2);
        assert!(matches!(
            catalog.distinct_count("nope"),
            Err(CatalogError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_missing_per_column() {
        let catalog = Catalog::from_records(
            header(&["a", "b"]),
            vec![cells(&["", "x"]), cells(&["", ""]), cells(&["y", "z"])],
        )
        .unwrap();
        assert_eq!(catalog.missing_per_column(), vec![2, 1]);
        assert_eq!(catalog.total_cells(), 6);
    }
}
