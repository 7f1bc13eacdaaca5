//! Catalog enrichment: external identifier resolution and rating retrieval.
//!
//! Both stages walk the catalog in row order, one request at a time, and
//! skip rows whose per-row status is already settled. "Nothing found" is
//! recorded in the catalog as a marker; only transport faults are errors.

mod fetcher;
mod rating_parser;
mod resolver;

pub use fetcher::{FetcherOutcome, RatingFetcher};
pub use rating_parser::{
    build_rating_parser, ChainedRatingParser, JsonLdRatingParser, MarkupRatingParser,
    RatingParser, RatingParserError, RatingParserKind, DEFAULT_MARKUP_PATTERN,
};
pub use resolver::{extract_title_id, IdentifierResolver, ResolverOutcome};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::external_catalog::ExternalCatalogError;

/// Errors that abort an enrichment stage.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// The catalog is missing a column the stage needs.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The external service could not be reached.
    #[error("{stage} failed at row {row}: {source}")]
    External {
        stage: &'static str,
        row: usize,
        #[source]
        source: ExternalCatalogError,
    },
}

/// How a stage decides that its target column needs no work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SkipPolicy {
    /// Per-row status: settled rows are skipped, everything else is processed.
    #[default]
    PerRow,
    /// Skip the whole stage when the column holds more than one distinct value.
    ColumnHeuristic,
}

/// Counters for one enrichment stage run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSummary {
    /// The stage was skipped because its column was already populated.
    pub stage_skipped: bool,
    /// External requests issued.
    pub requests: usize,
    /// Rows that received a value.
    pub resolved: usize,
    /// Rows that received the "not available" marker.
    pub unresolvable: usize,
    /// Rows already settled by a previous run.
    pub already_settled: usize,
    /// Rows left for a later run (outside the row limit, or no identifier yet).
    pub deferred: usize,
}
