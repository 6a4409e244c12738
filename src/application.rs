//! Application layer module
//!
//! Orchestrates the fetch, extract and emit stages into a single use case.

pub mod error;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::{ExtractionPipeline, PipelineSummary};
