//! Enrichment pipeline.
//!
//! Runs the stages in order against one catalog:
//! - **Load**: read the catalog and check the columns the stages need
//! - **Impute**: fill or drop missing data
//! - **Resolve**: look up external identifiers, then persist
//! - **Fetch**: retrieve ratings, then persist
//! - **Summarize**: aggregate the cleaned catalog
//!
//! A stage that fails on a transport fault still persists the rows it
//! finished before the error is returned, so a rerun picks up where it
//! stopped.

mod runner;
mod types;

pub use runner::EnrichmentPipeline;
pub use types::{PipelineError, PipelineOptions, PipelineReport};
