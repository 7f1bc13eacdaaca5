//! Rating retrieval.

use std::sync::Arc;

use tracing::{debug, info};

use super::{EnrichmentError, RatingParser, StageSummary};
use crate::catalog::{columns, Catalog, EnrichmentStatus, RatingOutcome, TitleId};
use crate::external_catalog::TitleDetailSource;

/// Result of a fetcher run.
#[derive(Debug, Clone, PartialEq)]
pub struct FetcherOutcome {
    /// The `ratings` column after the run, one entry per row.
    pub ratings: Vec<Option<String>>,
    pub summary: StageSummary,
}

/// Fills the `ratings` column from title detail pages.
pub struct RatingFetcher {
    source: Arc<dyn TitleDetailSource>,
    parser: Arc<dyn RatingParser>,
}

impl RatingFetcher {
    pub fn new(source: Arc<dyn TitleDetailSource>, parser: Arc<dyn RatingParser>) -> Self {
        Self { source, parser }
    }

    /// Fetch ratings for every row whose identifier is known.
    ///
    /// Rows marked `NotFound/Unavailable` get the unrated marker without a
    /// request; rows with no identifier yet are left for a later run. With
    /// `already_populated` set the column is returned unchanged.
    pub async fn fetch(
        &self,
        catalog: &mut Catalog,
        already_populated: bool,
    ) -> Result<FetcherOutcome, EnrichmentError> {
        catalog.require_column(columns::RATINGS)?;

        if already_populated {
            info!("ratings column already populated, skipping rating retrieval");
            return Ok(FetcherOutcome {
                ratings: catalog.column_values(columns::RATINGS)?,
                summary: StageSummary {
                    stage_skipped: true,
                    ..StageSummary::default()
                },
            });
        }

        let title_id_col = catalog.require_column(columns::TITLE_ID)?;
        let mut summary = StageSummary::default();

        for row in 0..catalog.len() {
            let current = &catalog.rows()[row];
            if current.rating_status().is_settled() {
                summary.already_settled += 1;
                continue;
            }

            let outcome = match current.title_id_status() {
                EnrichmentStatus::Unresolvable => RatingOutcome::Unrated,
                EnrichmentStatus::Unresolved => {
                    summary.deferred += 1;
                    continue;
                }
                EnrichmentStatus::Resolved => {
                    let Some(title_id) = current.get(title_id_col).and_then(TitleId::parse) else {
                        summary.deferred += 1;
                        continue;
                    };

                    summary.requests += 1;
                    let page = self
                        .source
                        .fetch_title_page(&title_id)
                        .await
                        .map_err(|source| EnrichmentError::External {
                            stage: "rating retrieval",
                            row,
                            source,
                        })?;

                    match page.as_deref().and_then(|doc| self.parser.parse(doc)) {
                        Some(rating) => RatingOutcome::Rated(rating),
                        None => {
                            debug!(
                                "No rating found for {} using {} parser",
                                title_id,
                                self.parser.name()
                            );
                            RatingOutcome::Unrated
                        }
                    }
                }
            };

            match outcome {
                RatingOutcome::Rated(_) => summary.resolved += 1,
                RatingOutcome::Unrated => summary.unresolvable += 1,
            }
            catalog.set_rating(row, &outcome)?;
        }

        info!(
            "Rating retrieval: {} pages fetched, {} rated, {} unrated, {} already settled, {} deferred",
            summary.requests,
            summary.resolved,
            summary.unresolvable,
            summary.already_settled,
            summary.deferred
        );

        Ok(FetcherOutcome {
            ratings: catalog.column_values(columns::RATINGS)?,
            summary,
        })
    }
}
