pub mod catalog;
pub mod config;
pub mod enrichment;
pub mod external_catalog;
pub mod imputer;
pub mod pipeline;
pub mod summary;
pub mod testing;

pub use catalog::{Catalog, CatalogError, CatalogStore, CsvCatalogStore, EnrichmentStatus, TitleId};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError,
};
pub use enrichment::{
    build_rating_parser, EnrichmentError, IdentifierResolver, RatingFetcher, RatingParser,
    RatingParserKind, SkipPolicy, StageSummary,
};
pub use external_catalog::{
    ExternalCatalogError, ImdbClient, ImdbConfig, TitleDetailSource, TitleSearch,
};
pub use imputer::{Imputer, MissingDataReport};
pub use pipeline::{EnrichmentPipeline, PipelineError, PipelineOptions, PipelineReport};
pub use summary::{summarize, CatalogSummary};
