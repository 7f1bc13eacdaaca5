//! Mock title search for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::external_catalog::{ExternalCatalogError, TitleSearch};

/// A recorded search for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSearch {
    pub title: String,
    pub year: Option<i32>,
}

/// Mock implementation of the TitleSearch trait.
///
/// Provides controllable behavior for testing:
/// - Return a canned response text per title (empty text otherwise)
/// - Track queries for assertions
/// - Simulate transport failures
///
/// # Example
///
/// ```rust,ignore
/// use reelscope_core::testing::MockTitleSearch;
///
/// let search = MockTitleSearch::new();
/// search.set_response("The Matrix", r#"{"d":[{"id":"tt0133093"}]}"#).await;
///
/// let text = search.search("The Matrix", Some(1999)).await?;
/// assert!(text.contains("tt0133093"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTitleSearch {
    /// Response text by title.
    responses: Arc<RwLock<HashMap<String, String>>>,
    /// Titles whose search fails with a transport error.
    failing: Arc<RwLock<HashSet<String>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedSearch>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<ExternalCatalogError>>>,
}

impl MockTitleSearch {
    /// Create a new mock with no canned responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response text returned for a title.
    pub async fn set_response(&self, title: &str, text: &str) {
        self.responses
            .write()
            .await
            .insert(title.to_string(), text.to_string());
    }

    /// Make every search for `title` fail.
    pub async fn fail_on(&self, title: &str) {
        self.failing.write().await.insert(title.to_string());
    }

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedSearch> {
        self.queries.read().await.clone()
    }

    /// Get the number of searches performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Clear recorded queries.
    pub async fn clear_recorded(&self) {
        self.queries.write().await.clear();
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: ExternalCatalogError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl TitleSearch for MockTitleSearch {
    async fn search(&self, title: &str, year: Option<i32>) -> Result<String, ExternalCatalogError> {
        self.queries.write().await.push(RecordedSearch {
            title: title.to_string(),
            year,
        });

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        if self.failing.read().await.contains(title) {
            return Err(ExternalCatalogError::ApiError {
                status: 503,
                message: format!("search for '{}' unavailable", title),
            });
        }

        Ok(self
            .responses
            .read()
            .await
            .get(title)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_and_default_responses() {
        let search = MockTitleSearch::new();
        search.set_response("Known", r#""tt1""#).await;

        assert_eq!(search.search("Known", None).await.unwrap(), r#""tt1""#);
        assert_eq!(search.search("Unknown", Some(2000)).await.unwrap(), "");
        assert_eq!(
            search.recorded_queries().await[1],
            RecordedSearch {
                title: "Unknown".to_string(),
                year: Some(2000)
            }
        );
    }

    #[tokio::test]
    async fn test_error_injection() {
        let search = MockTitleSearch::new();
        search
            .set_next_error(ExternalCatalogError::RateLimitExceeded)
            .await;

        assert!(search.search("X", None).await.is_err());
        // Error should be consumed
        assert!(search.search("X", None).await.is_ok());

        search.fail_on("X").await;
        assert!(search.search("X", None).await.is_err());
        assert_eq!(search.query_count().await, 3);

        search.clear_recorded().await;
        assert_eq!(search.query_count().await, 0);
    }
}
