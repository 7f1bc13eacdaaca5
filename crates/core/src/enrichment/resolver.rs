//! External identifier resolution.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::{debug, info};

use super::{EnrichmentError, StageSummary};
use crate::catalog::{
    columns, is_sentinel_for, parse_year, Catalog, IdentifierResolution, TitleId,
};
use crate::external_catalog::TitleSearch;

/// First quoted `tt…` token in a search response.
static QUOTED_TITLE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""(tt[0-9]+)""#).expect("valid title id pattern"));

/// Extract the first quoted `tt…` identifier from free text.
pub fn extract_title_id(text: &str) -> Option<TitleId> {
    let captures = QUOTED_TITLE_ID.captures(text)?;
    TitleId::parse(captures.get(1)?.as_str())
}

/// Result of a resolver run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverOutcome {
    /// The `title_id` column after the run, one entry per row.
    pub title_ids: Vec<Option<String>>,
    pub summary: StageSummary,
}

/// Fills the `title_id` column from a title search service.
pub struct IdentifierResolver {
    search: Arc<dyn TitleSearch>,
    row_limit: Option<usize>,
}

impl IdentifierResolver {
    pub fn new(search: Arc<dyn TitleSearch>) -> Self {
        Self {
            search,
            row_limit: None,
        }
    }

    /// Only consider the first `limit` rows.
    pub fn with_row_limit(mut self, limit: Option<usize>) -> Self {
        self.row_limit = limit;
        self
    }

    /// Resolve identifiers for every unresolved row.
    ///
    /// With `already_populated` set the column is returned unchanged and no
    /// search is issued. On a transport fault the rows resolved so far stay
    /// recorded in `catalog`.
    pub async fn resolve(
        &self,
        catalog: &mut Catalog,
        already_populated: bool,
    ) -> Result<ResolverOutcome, EnrichmentError> {
        catalog.require_column(columns::TITLE_ID)?;

        if already_populated {
            info!("title_id column already populated, skipping identifier resolution");
            return Ok(ResolverOutcome {
                title_ids: catalog.column_values(columns::TITLE_ID)?,
                summary: StageSummary {
                    stage_skipped: true,
                    ..StageSummary::default()
                },
            });
        }

        let title_col = catalog.require_column(columns::TITLE)?;
        let year_col = catalog.column_index(columns::RELEASE_YEAR);
        let limit = self.row_limit.unwrap_or(usize::MAX);
        let mut summary = StageSummary::default();

        for row in 0..catalog.len() {
            if catalog.rows()[row].title_id_status().is_settled() {
                summary.already_settled += 1;
                continue;
            }
            if row >= limit {
                summary.deferred += 1;
                continue;
            }

            let title = catalog
                .cell(row, title_col)
                .map(str::trim)
                .filter(|t| !t.is_empty() && !is_sentinel_for(columns::TITLE, t))
                .map(str::to_string);

            let resolution = match title {
                Some(title) => {
                    let year = year_col
                        .and_then(|c| catalog.cell(row, c))
                        .and_then(parse_year);

                    summary.requests += 1;
                    let response = self.search.search(&title, year).await.map_err(|source| {
                        EnrichmentError::External {
                            stage: "identifier resolution",
                            row,
                            source,
                        }
                    })?;

                    match extract_title_id(&response) {
                        Some(id) => IdentifierResolution::Resolved(id),
                        None => {
                            debug!("No identifier found for '{}' ({:?})", title, year);
                            IdentifierResolution::Unresolvable
                        }
                    }
                }
                None => IdentifierResolution::Unresolvable,
            };

            match resolution {
                IdentifierResolution::Resolved(_) => summary.resolved += 1,
                IdentifierResolution::Unresolvable => summary.unresolvable += 1,
            }
            catalog.set_title_id(row, &resolution)?;
        }

        info!(
            "Identifier resolution: {} searches, {} resolved, {} not found, {} already settled, {} deferred",
            summary.requests,
            summary.resolved,
            summary.unresolvable,
            summary.already_settled,
            summary.deferred
        );

        Ok(ResolverOutcome {
            title_ids: catalog.column_values(columns::TITLE_ID)?,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EnrichmentStatus, UNRESOLVED_TITLE_ID};
    use crate::external_catalog::ExternalCatalogError;
    use crate::testing::{fixtures, MockTitleSearch};

    #[test]
    fn test_extract_title_id_from_quoted_token() {
        let text = r#"{"result_count": 1, "results": [{"id": "tt1234567", "name": "X"}]}"#;
        assert_eq!(extract_title_id(text).unwrap().as_str(), "tt1234567");
    }

    #[test]
    fn test_extract_title_id_takes_first_match() {
        let text = r#"{"d":[{"id":"tt0000002"},{"id":"tt0000001"}]}"#;
        assert_eq!(extract_title_id(text).unwrap().as_str(), "tt0000002");
    }

    #[test]
    fn test_extract_title_id_ignores_unquoted_and_foreign_ids() {
        assert!(extract_title_id("see /title/tt1234567/ for details").is_none());
        assert!(extract_title_id(r#"{"id":"nm0000123"}"#).is_none());
        assert!(extract_title_id(r#"{"id":"tt12x"}"#).is_none());
        assert!(extract_title_id("").is_none());
    }

    #[tokio::test]
    async fn test_resolves_identifier_from_response() {
        let search = Arc::new(MockTitleSearch::new());
        search
            .set_response("Dick Johnson Is Dead", r#"{"d":[{"id":"tt11394180"}]}"#)
            .await;
        let mut catalog = fixtures::catalog(&[("Dick Johnson Is Dead", "2020", "", "")]);

        let outcome = IdentifierResolver::new(search.clone())
            .resolve(&mut catalog, false)
            .await
            .unwrap();

        assert_eq!(outcome.title_ids, vec![Some("tt11394180".to_string())]);
        assert_eq!(outcome.summary.requests, 1);
        assert_eq!(outcome.summary.resolved, 1);
        assert_eq!(
            catalog.rows()[0].title_id_status(),
            EnrichmentStatus::Resolved
        );

        let queries = search.recorded_queries().await;
        assert_eq!(queries[0].title, "Dick Johnson Is Dead");
        assert_eq!(queries[0].year, Some(2020));
    }

    #[tokio::test]
    async fn test_unmatched_response_records_sentinel() {
        let search = Arc::new(MockTitleSearch::new());
        search.set_response("Obscure", "no identifiers here").await;
        let mut catalog = fixtures::catalog(&[("Obscure", "2001", "", "")]);

        let outcome = IdentifierResolver::new(search)
            .resolve(&mut catalog, false)
            .await
            .unwrap();

        assert_eq!(
            outcome.title_ids,
            vec![Some(UNRESOLVED_TITLE_ID.to_string())]
        );
        assert_eq!(outcome.summary.unresolvable, 1);
    }

    #[tokio::test]
    async fn test_already_populated_makes_no_calls() {
        let search = Arc::new(MockTitleSearch::new());
        let mut catalog = fixtures::catalog(&[
            ("A", "2020", "tt0000001", ""),
            ("B", "2020", "tt0000002", ""),
            ("C", "2020", "", ""),
        ]);
        let before = catalog.column_values("title_id").unwrap();

        let outcome = IdentifierResolver::new(search.clone())
            .resolve(&mut catalog, true)
            .await
            .unwrap();

        assert!(outcome.summary.stage_skipped);
        assert_eq!(outcome.title_ids, before);
        assert_eq!(search.query_count().await, 0);
    }

    #[tokio::test]
    async fn test_settled_rows_are_skipped() {
        let search = Arc::new(MockTitleSearch::new());
        search.set_response("C", r#""tt0000003""#).await;
        let mut catalog = fixtures::catalog(&[
            ("A", "2020", "tt0000001", ""),
            ("B", "2020", UNRESOLVED_TITLE_ID, ""),
            ("C", "2020", "title_id Unavailable", ""),
        ]);

        let outcome = IdentifierResolver::new(search.clone())
            .resolve(&mut catalog, false)
            .await
            .unwrap();

        assert_eq!(outcome.summary.already_settled, 2);
        assert_eq!(outcome.summary.requests, 1);
        assert_eq!(catalog.value(2, "title_id"), Some("tt0000003"));
        assert_eq!(search.query_count().await, 1);
    }

    #[tokio::test]
    async fn test_sentinel_title_is_not_searched() {
        let search = Arc::new(MockTitleSearch::new());
        let mut catalog = fixtures::catalog(&[("title Unavailable", "2020", "", "")]);

        let outcome = IdentifierResolver::new(search.clone())
            .resolve(&mut catalog, false)
            .await
            .unwrap();

        assert_eq!(outcome.summary.unresolvable, 1);
        assert_eq!(search.query_count().await, 0);
        assert_eq!(catalog.value(0, "title_id"), Some(UNRESOLVED_TITLE_ID));
    }

    #[tokio::test]
    async fn test_row_limit_defers_remaining_rows() {
        let search = Arc::new(MockTitleSearch::new());
        let mut catalog = fixtures::catalog(&[
            ("A", "2020", "", ""),
            ("B", "2020", "", ""),
            ("C", "2020", "", ""),
        ]);

        let outcome = IdentifierResolver::new(search.clone())
            .with_row_limit(Some(2))
            .resolve(&mut catalog, false)
            .await
            .unwrap();

        assert_eq!(outcome.summary.requests, 2);
        assert_eq!(outcome.summary.deferred, 1);
        assert_eq!(catalog.value(2, "title_id"), None);
        assert_eq!(
            catalog.rows()[2].title_id_status(),
            EnrichmentStatus::Unresolved
        );
    }

    #[tokio::test]
    async fn test_transport_fault_keeps_earlier_rows() {
        let search = Arc::new(MockTitleSearch::new());
        search.set_response("A", r#""tt0000001""#).await;
        search.fail_on("B").await;
        let mut catalog = fixtures::catalog(&[("A", "2020", "", ""), ("B", "2020", "", "")]);

        let result = IdentifierResolver::new(search)
            .resolve(&mut catalog, false)
            .await;

        match result {
            Err(EnrichmentError::External { row, source, .. }) => {
                assert_eq!(row, 1);
                assert!(matches!(source, ExternalCatalogError::ApiError { .. }));
            }
            other => panic!("Expected External error, got {:?}", other),
        }
        assert_eq!(catalog.value(0, "title_id"), Some("tt0000001"));
        assert_eq!(catalog.value(1, "title_id"), None);
    }

    #[tokio::test]
    async fn test_missing_title_id_column_fails_fast() {
        let search = Arc::new(MockTitleSearch::new());
        let mut catalog = Catalog::new(vec!["title".to_string()]).unwrap();

        let result = IdentifierResolver::new(search)
            .resolve(&mut catalog, false)
            .await;
        assert!(matches!(result, Err(EnrichmentError::Catalog(_))));
    }
}
