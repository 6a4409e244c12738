//! Confluence Content Ids - translation bundles from wiki tables
//!
//! Fetches one Confluence page through the REST API, finds the translation
//! tables on it (header row `Content-Id | de | en | ...`) and writes one flat
//! `{language}.json` file per language.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{ExtractionPipeline, PipelineError, PipelineSummary};
pub use domain::{LanguageMap, MergedOutput, PageSource};
