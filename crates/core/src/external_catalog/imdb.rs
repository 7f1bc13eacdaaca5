//! IMDb client.
//!
//! Identifier lookup goes through the public suggestion endpoint, which
//! answers with a JSON document containing quoted `tt…` identifiers.
//! Ratings come from the title page, requested with browser-like headers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, CONNECTION};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ExternalCatalogError, TitleDetailSource, TitleSearch};
use crate::catalog::TitleId;

/// IMDb client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImdbConfig {
    /// Suggestion endpoint base (default: https://v3.sg.media-imdb.com/suggestion/x).
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// Title page base (default: https://www.imdb.com/title).
    #[serde(default = "default_title_url")]
    pub title_url: String,
    /// User-Agent presented on every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Accept-Language presented on every request.
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ImdbConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            title_url: default_title_url(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_search_url() -> String {
    "https://v3.sg.media-imdb.com/suggestion/x".to_string()
}

fn default_title_url() -> String {
    "https://www.imdb.com/title".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/112.0.0.0 Mobile Safari/537.36"
        .to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// IMDb client.
pub struct ImdbClient {
    client: Client,
    search_url: String,
    title_url: String,
}

impl ImdbClient {
    /// Create a new IMDb client.
    pub fn new(config: ImdbConfig) -> Result<Self, ExternalCatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).map_err(|e| {
                ExternalCatalogError::NotConfigured(format!("Invalid accept_language: {}", e))
            })?,
        );
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = Client::builder()
            .user_agent(config.user_agent)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            search_url: config.search_url.trim_end_matches('/').to_string(),
            title_url: config.title_url.trim_end_matches('/').to_string(),
        })
    }

    /// Suggestion URL for a title and optional year.
    pub fn search_url_for(&self, title: &str, year: Option<i32>) -> String {
        let query = match year {
            Some(y) => format!("{} {}", title.trim(), y),
            None => title.trim().to_string(),
        };
        format!("{}/{}.json", self.search_url, urlencoding::encode(&query))
    }

    /// Detail page URL of a title.
    pub fn title_url_for(&self, title_id: &TitleId) -> String {
        format!("{}/{}/", self.title_url, title_id)
    }
}

#[async_trait]
impl TitleSearch for ImdbClient {
    async fn search(&self, title: &str, year: Option<i32>) -> Result<String, ExternalCatalogError> {
        let url = self.search_url_for(title, year);

        debug!("IMDb title search: title='{}', year={:?}", title, year);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == 404 {
            // No suggestions for this query.
            return Ok(String::new());
        }
        if status == 429 {
            return Err(ExternalCatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalCatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl TitleDetailSource for ImdbClient {
    async fn fetch_title_page(
        &self,
        title_id: &TitleId,
    ) -> Result<Option<String>, ExternalCatalogError> {
        let url = self.title_url_for(title_id);

        debug!("IMDb title page: id={}", title_id);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                "IMDb title page for {} returned {}, treating as unrated",
                title_id, status
            );
            return Ok(None);
        }

        Ok(Some(response.text().await?))
    }
}
