//! Rating extraction from title detail documents.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::parse_rating;

/// Markup fragment that wraps the aggregate rating on the title page.
pub const DEFAULT_MARKUP_PATTERN: &str =
    r#"<span class="sc-bde20123-1 iZlgcd">([0-9]{1,2}(?:\.[0-9]+)?)</span>"#;

static DEFAULT_MARKUP_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_MARKUP_PATTERN).expect("valid default rating pattern"));

static JSON_LD_RATING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""ratingValue"\s*:\s*"?([0-9]{1,2}(?:\.[0-9]+)?)"#)
        .expect("valid JSON-LD rating pattern")
});

/// Errors building a rating parser.
#[derive(Debug, Error)]
pub enum RatingParserError {
    #[error("Invalid rating pattern: {0}")]
    InvalidPattern(String),

    #[error("Rating pattern needs a capture group around the value: {0}")]
    MissingCaptureGroup(String),
}

/// Extracts a numeric rating from a detail document.
pub trait RatingParser: Send + Sync {
    /// The rating, or `None` when the document does not carry one.
    fn parse(&self, document: &str) -> Option<f64>;

    /// Parser name for logging.
    fn name(&self) -> &'static str;
}

/// Finds the rating with a markup pattern; capture group 1 is the value.
#[derive(Debug, Clone)]
pub struct MarkupRatingParser {
    pattern: Regex,
}

impl MarkupRatingParser {
    pub fn new(pattern: &str) -> Result<Self, RatingParserError> {
        let pattern =
            Regex::new(pattern).map_err(|e| RatingParserError::InvalidPattern(e.to_string()))?;
        // captures_len counts the implicit whole-match group.
        if pattern.captures_len() < 2 {
            return Err(RatingParserError::MissingCaptureGroup(
                pattern.as_str().to_string(),
            ));
        }
        Ok(Self { pattern })
    }
}

impl Default for MarkupRatingParser {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_MARKUP_REGEX.clone(),
        }
    }
}

impl RatingParser for MarkupRatingParser {
    fn parse(&self, document: &str) -> Option<f64> {
        let captures = self.pattern.captures(document)?;
        parse_rating(captures.get(1)?.as_str())
    }

    fn name(&self) -> &'static str {
        "markup"
    }
}

/// Reads `"ratingValue"` from the page's JSON-LD block.
#[derive(Debug, Clone, Default)]
pub struct JsonLdRatingParser;

impl RatingParser for JsonLdRatingParser {
    fn parse(&self, document: &str) -> Option<f64> {
        let captures = JSON_LD_RATING_REGEX.captures(document)?;
        parse_rating(captures.get(1)?.as_str())
    }

    fn name(&self) -> &'static str {
        "json_ld"
    }
}

/// Tries each parser in order and returns the first rating found.
pub struct ChainedRatingParser {
    parsers: Vec<Box<dyn RatingParser>>,
}

impl ChainedRatingParser {
    pub fn new(parsers: Vec<Box<dyn RatingParser>>) -> Self {
        Self { parsers }
    }
}

impl RatingParser for ChainedRatingParser {
    fn parse(&self, document: &str) -> Option<f64> {
        self.parsers.iter().find_map(|p| p.parse(document))
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}

/// Available rating parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RatingParserKind {
    Markup,
    JsonLd,
    /// Markup first, then JSON-LD.
    #[default]
    Chain,
}

/// Build the configured parser.
pub fn build_rating_parser(
    kind: RatingParserKind,
    markup_pattern: &str,
) -> Result<Arc<dyn RatingParser>, RatingParserError> {
    let parser: Arc<dyn RatingParser> = match kind {
        RatingParserKind::Markup => Arc::new(MarkupRatingParser::new(markup_pattern)?),
        RatingParserKind::JsonLd => Arc::new(JsonLdRatingParser),
        RatingParserKind::Chain => Arc::new(ChainedRatingParser::new(vec![
            Box::new(MarkupRatingParser::new(markup_pattern)?),
            Box::new(JsonLdRatingParser),
        ])),
    };
    Ok(parser)
}
