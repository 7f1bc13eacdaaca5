//! External title catalog integration.
//!
//! Two capabilities are used by the enrichment stages: a free-text title
//! search (identifier lookup) and a title detail page fetch (rating lookup).
//! The IMDb client implements both.

mod imdb;

pub use imdb::{ImdbClient, ImdbConfig};

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::TitleId;

/// Errors that can occur when talking to an external catalog.
///
/// All of these are transport-level faults; "nothing found" is never an
/// error.
#[derive(Debug, Error)]
pub enum ExternalCatalogError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// API returned an error status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Client not configured correctly.
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Free-text title search.
#[async_trait]
pub trait TitleSearch: Send + Sync {
    /// Search by title text and optional release year.
    ///
    /// Returns the raw response text. Callers extract identifiers from it
    /// and must tolerate any content, including an empty string.
    async fn search(&self, title: &str, year: Option<i32>) -> Result<String, ExternalCatalogError>;
}

/// Title detail page source.
#[async_trait]
pub trait TitleDetailSource: Send + Sync {
    /// Fetch the detail document of a title.
    ///
    /// Returns `Ok(None)` when the service answered but had no usable page
    /// (not found, rate limited, server error).
    async fn fetch_title_page(
        &self,
        title_id: &TitleId,
    ) -> Result<Option<String>, ExternalCatalogError>;
}
