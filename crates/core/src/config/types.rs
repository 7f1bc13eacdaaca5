use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::enrichment::{RatingParserKind, SkipPolicy, DEFAULT_MARKUP_PATTERN};
use crate::external_catalog::ImdbConfig;
use crate::imputer::DEFAULT_SENTINEL_THRESHOLD_PERCENT;

/// Root configuration. Every section has defaults, so an empty file is valid.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub imputer: ImputerConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub ratings: RatingsConfig,
    #[serde(default)]
    pub imdb: ImdbConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Catalog file configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
    /// Field delimiter (default: ',')
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            delimiter: default_delimiter(),
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("Netflix Titles.csv")
}

fn default_delimiter() -> char {
    ','
}

/// Missing-data imputation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImputerConfig {
    /// A column whose share of all missing cells reaches this percentage is
    /// filled with its sentinel instead of having its rows dropped.
    #[serde(default = "default_threshold")]
    pub sentinel_threshold_percent: f64,
}

impl Default for ImputerConfig {
    fn default() -> Self {
        Self {
            sentinel_threshold_percent: default_threshold(),
        }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_SENTINEL_THRESHOLD_PERCENT
}

/// Settings shared by both enrichment stages
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EnrichmentConfig {
    #[serde(default)]
    pub skip_policy: SkipPolicy,
}

/// Identifier resolver configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Only search the first N rows; the rest stay unresolved for a later run.
    #[serde(default)]
    pub row_limit: Option<usize>,
}

/// Rating extraction configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RatingsConfig {
    #[serde(default)]
    pub parser: RatingParserKind,
    /// Pattern used by the markup parser; capture group 1 is the rating.
    #[serde(default = "default_markup_pattern")]
    pub markup_pattern: String,
}

impl Default for RatingsConfig {
    fn default() -> Self {
        Self {
            parser: RatingParserKind::default(),
            markup_pattern: default_markup_pattern(),
        }
    }
}

fn default_markup_pattern() -> String {
    DEFAULT_MARKUP_PATTERN.to_string()
}

/// Catalog summary output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_enabled")]
    pub enabled: bool,
    #[serde(default = "default_report_path")]
    pub path: PathBuf,
    /// Length of every "top" ranking (default: 10)
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: default_report_enabled(),
            path: default_report_path(),
            top_n: default_top_n(),
        }
    }
}

fn default_report_enabled() -> bool {
    true
}

fn default_report_path() -> PathBuf {
    PathBuf::from("catalog_summary.json")
}

fn default_top_n() -> usize {
    10
}
