//! Mock title detail source for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::TitleId;
use crate::external_catalog::{ExternalCatalogError, TitleDetailSource};

/// Mock implementation of the TitleDetailSource trait.
///
/// Unknown identifiers answer `Ok(None)`, like a 404 from the real site.
#[derive(Debug, Clone, Default)]
pub struct MockTitleDetailSource {
    /// Documents by identifier.
    pages: Arc<RwLock<HashMap<String, String>>>,
    /// Identifiers whose fetch fails with a transport error.
    failing: Arc<RwLock<HashSet<String>>>,
    /// Requested identifiers, in order.
    requests: Arc<RwLock<Vec<String>>>,
}

impl MockTitleDetailSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document served for an identifier.
    pub async fn set_page(&self, title_id: &str, document: &str) {
        self.pages
            .write()
            .await
            .insert(title_id.to_string(), document.to_string());
    }

    /// Make every fetch of `title_id` fail.
    pub async fn fail_on(&self, title_id: &str) {
        self.failing.write().await.insert(title_id.to_string());
    }

    /// Stop failing fetches of `title_id`.
    pub async fn recover(&self, title_id: &str) {
        self.failing.write().await.remove(title_id);
    }

    /// Requested identifiers, in order.
    pub async fn recorded_requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl TitleDetailSource for MockTitleDetailSource {
    async fn fetch_title_page(
        &self,
        title_id: &TitleId,
    ) -> Result<Option<String>, ExternalCatalogError> {
        self.requests.write().await.push(title_id.to_string());

        if self.failing.read().await.contains(title_id.as_str()) {
            return Err(ExternalCatalogError::ApiError {
                status: 502,
                message: format!("page for {} unavailable", title_id),
            });
        }

        Ok(self.pages.read().await.get(title_id.as_str()).cloned())
    }
}
