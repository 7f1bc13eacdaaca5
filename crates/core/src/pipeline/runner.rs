//! Enrichment pipeline runner.

use std::sync::Arc;

use tracing::{error, info};

use super::types::{PipelineError, PipelineOptions, PipelineReport};
use crate::catalog::{columns, Catalog, CatalogStore};
use crate::enrichment::{
    EnrichmentError, IdentifierResolver, RatingFetcher, RatingParser, SkipPolicy,
};
use crate::external_catalog::{TitleDetailSource, TitleSearch};
use crate::imputer::Imputer;
use crate::summary::summarize;

/// Drives one catalog through imputation and both enrichment stages.
pub struct EnrichmentPipeline {
    options: PipelineOptions,
    store: Arc<dyn CatalogStore>,
    imputer: Imputer,
    resolver: IdentifierResolver,
    fetcher: RatingFetcher,
}

impl EnrichmentPipeline {
    /// Create a new pipeline.
    pub fn new(
        options: PipelineOptions,
        store: Arc<dyn CatalogStore>,
        search: Arc<dyn TitleSearch>,
        detail_source: Arc<dyn TitleDetailSource>,
        parser: Arc<dyn RatingParser>,
    ) -> Self {
        Self {
            imputer: Imputer::new(options.sentinel_threshold_percent),
            resolver: IdentifierResolver::new(search).with_row_limit(options.row_limit),
            fetcher: RatingFetcher::new(detail_source, parser),
            store,
            options,
        }
    }

    /// Run every stage once.
    pub async fn run(&self) -> Result<PipelineReport, PipelineError> {
        let location = self.store.location();
        info!("Loading catalog from {}", location);

        let catalog = self.store.load()?;
        catalog.require_column(columns::TITLE)?;
        catalog.require_column(columns::RELEASE_YEAR)?;
        let rows_loaded = catalog.len();
        info!("Loaded {} rows, {} columns", rows_loaded, catalog.columns().len());

        let (mut catalog, imputation) = self.imputer.impute(catalog);

        // Added after imputation so empty new columns do not count as missing data
        let mut columns_added = Vec::new();
        for column in [columns::TITLE_ID, columns::RATINGS] {
            if catalog.ensure_column(column) {
                info!("Catalog has no '{}' column, adding an empty one", column);
                columns_added.push(column.to_string());
            }
        }

        let populated = self.already_populated(&catalog, columns::TITLE_ID)?;
        let resolved = self.resolver.resolve(&mut catalog, populated).await;
        let resolved = self.persist(&catalog, "identifier resolution", resolved)?;

        let populated = self.already_populated(&catalog, columns::RATINGS)?;
        let fetched = self.fetcher.fetch(&mut catalog, populated).await;
        let fetched = self.persist(&catalog, "rating retrieval", fetched)?;

        let summary = self.options.summary_top_n.map(|top_n| summarize(&catalog, top_n));

        info!("Enrichment of {} finished, {} rows", location, catalog.len());

        Ok(PipelineReport {
            catalog_location: location,
            rows_loaded,
            rows_kept: catalog.len(),
            columns_added,
            imputation,
            resolver: resolved.summary,
            fetcher: fetched.summary,
            summary,
        })
    }

    fn already_populated(&self, catalog: &Catalog, column: &str) -> Result<bool, PipelineError> {
        match self.options.skip_policy {
            SkipPolicy::PerRow => Ok(false),
            SkipPolicy::ColumnHeuristic => Ok(self.store.column_is_populated(catalog, column)?),
        }
    }

    /// Save the catalog after a stage, whether or not the stage succeeded.
    /// A stage error takes precedence over a failed save.
    fn persist<T>(
        &self,
        catalog: &Catalog,
        stage: &str,
        outcome: Result<T, EnrichmentError>,
    ) -> Result<T, PipelineError> {
        match outcome {
            Ok(value) => {
                self.store.save(catalog)?;
                info!("Saved catalog after {}", stage);
                Ok(value)
            }
            Err(stage_error) => {
                match self.store.save(catalog) {
                    Ok(()) => info!("Saved partial progress after {} failed", stage),
                    Err(save_error) => error!(
                        "Failed to save partial progress after {} failed: {}",
                        stage, save_error
                    ),
                }
                Err(stage_error.into())
            }
        }
    }
}
