use super::{types::Config, ConfigError};
use crate::enrichment::{MarkupRatingParser, RatingParserKind};

/// Validate configuration
/// Currently validates:
/// - Catalog and report paths are not empty
/// - Catalog delimiter is a single ASCII character
/// - Sentinel threshold is within (0, 100]
/// - Resolver row limit is not 0
/// - IMDb timeout is not 0 and base URLs are set
/// - Markup pattern compiles and captures the rating (when the markup parser is used)
/// - Report ranking length is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.catalog.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.path cannot be empty".to_string(),
        ));
    }

    if !config.catalog.delimiter.is_ascii() {
        return Err(ConfigError::ValidationError(format!(
            "catalog.delimiter must be an ASCII character, got '{}'",
            config.catalog.delimiter
        )));
    }

    let threshold = config.imputer.sentinel_threshold_percent;
    if !(threshold > 0.0 && threshold <= 100.0) {
        return Err(ConfigError::ValidationError(format!(
            "imputer.sentinel_threshold_percent must be in (0, 100], got {}",
            threshold
        )));
    }

    if config.resolver.row_limit == Some(0) {
        return Err(ConfigError::ValidationError(
            "resolver.row_limit cannot be 0 (omit it to process every row)".to_string(),
        ));
    }

    if config.imdb.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "imdb.timeout_secs cannot be 0".to_string(),
        ));
    }
    if config.imdb.search_url.trim().is_empty() || config.imdb.title_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "imdb.search_url and imdb.title_url cannot be empty".to_string(),
        ));
    }

    // JSON-LD only parsing never uses the markup pattern
    if config.ratings.parser != RatingParserKind::JsonLd {
        MarkupRatingParser::new(&config.ratings.markup_pattern)
            .map_err(|e| ConfigError::ValidationError(format!("ratings.markup_pattern: {}", e)))?;
    }

    if config.report.enabled {
        if config.report.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "report.path cannot be empty".to_string(),
            ));
        }
        if config.report.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "report.top_n cannot be 0".to_string(),
            ));
        }
    }

    Ok(())
}
