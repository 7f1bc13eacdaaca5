//! Types for the enrichment pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::Config;
use crate::enrichment::{EnrichmentError, SkipPolicy, StageSummary};
use crate::imputer::{MissingDataReport, DEFAULT_SENTINEL_THRESHOLD_PERCENT};
use crate::summary::CatalogSummary;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading, validating or saving the catalog failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// An enrichment stage failed.
    #[error("enrichment error: {0}")]
    Enrichment(#[from] EnrichmentError),
}

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub sentinel_threshold_percent: f64,
    pub skip_policy: SkipPolicy,
    /// Only search identifiers for the first N rows.
    pub row_limit: Option<usize>,
    /// Ranking length of the catalog summary; `None` skips the summary.
    pub summary_top_n: Option<usize>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            sentinel_threshold_percent: DEFAULT_SENTINEL_THRESHOLD_PERCENT,
            skip_policy: SkipPolicy::default(),
            row_limit: None,
            summary_top_n: Some(10),
        }
    }
}

impl From<&Config> for PipelineOptions {
    fn from(config: &Config) -> Self {
        Self {
            sentinel_threshold_percent: config.imputer.sentinel_threshold_percent,
            skip_policy: config.enrichment.skip_policy,
            row_limit: config.resolver.row_limit,
            summary_top_n: config.report.enabled.then_some(config.report.top_n),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Where the catalog was read from and written back to.
    pub catalog_location: String,
    pub rows_loaded: usize,
    /// Rows left after imputation.
    pub rows_kept: usize,
    /// Columns the run appended because the input lacked them.
    pub columns_added: Vec<String>,
    pub imputation: MissingDataReport,
    pub resolver: StageSummary,
    pub fetcher: StageSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<CatalogSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        config.enrichment.skip_policy = SkipPolicy::ColumnHeuristic;
        config.resolver.row_limit = Some(10);
        config.report.top_n = 5;

        let options = PipelineOptions::from(&config);
        assert_eq!(options.skip_policy, SkipPolicy::ColumnHeuristic);
        assert_eq!(options.row_limit, Some(10));
        assert_eq!(options.summary_top_n, Some(5));
        assert_eq!(options.sentinel_threshold_percent, 5.0);

        config.report.enabled = false;
        assert_eq!(PipelineOptions::from(&config).summary_top_n, None);
    }

    #[test]
    fn test_default_options_match_default_config() {
        assert_eq!(
            PipelineOptions::default(),
            PipelineOptions::from(&Config::default())
        );
    }
}
