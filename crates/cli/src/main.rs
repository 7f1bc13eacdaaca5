use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelscope_core::{
    build_rating_parser, load_config_or_default, validate_config, CatalogStore, CatalogSummary,
    CsvCatalogStore, EnrichmentPipeline, ImdbClient, PipelineOptions,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("reelscope {}", VERSION);

    // Determine config path
    let config_path = std::env::var("REELSCOPE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("reelscope.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Catalog path: {:?}", config.catalog.path);
    info!("Skip policy: {:?}", config.enrichment.skip_policy);
    info!("Rating parser: {:?}", config.ratings.parser);

    let store: Arc<dyn CatalogStore> = Arc::new(
        CsvCatalogStore::new(&config.catalog.path).with_delimiter(config.catalog.delimiter as u8),
    );

    let imdb =
        Arc::new(ImdbClient::new(config.imdb.clone()).context("Failed to create IMDb client")?);
    info!("IMDb client initialized (timeout {}s)", config.imdb.timeout_secs);

    let parser = build_rating_parser(config.ratings.parser, &config.ratings.markup_pattern)
        .context("Failed to build rating parser")?;

    let pipeline = EnrichmentPipeline::new(
        PipelineOptions::from(&config),
        store,
        imdb.clone(),
        imdb,
        parser,
    );

    let report = pipeline.run().await.context("Enrichment failed")?;

    info!(
        "Identifiers: {} resolved, {} not found, {} deferred",
        report.resolver.resolved, report.resolver.unresolvable, report.resolver.deferred
    );
    info!(
        "Ratings: {} rated, {} unrated, {} deferred",
        report.fetcher.resolved, report.fetcher.unresolvable, report.fetcher.deferred
    );

    if let Some(summary) = &report.summary {
        write_summary(&config.report.path, summary)?;
        info!("Catalog summary written to {:?}", config.report.path);
    }

    Ok(())
}

/// Write the catalog summary as pretty-printed JSON.
fn write_summary(path: &Path, summary: &CatalogSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("Failed to serialize summary")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write summary to {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelscope_core::summarize;
    use reelscope_core::testing::fixtures;

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let summary = summarize(&fixtures::streaming_catalog(), 3);

        write_summary(&path, &summary).unwrap();

        let written: CatalogSummary =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, summary);
    }

    #[test]
    fn test_write_summary_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("summary.json");
        let summary = CatalogSummary::default();

        assert!(write_summary(&path, &summary).is_err());
    }
}
