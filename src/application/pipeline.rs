//! Extraction use case: fetch page, extract tables, emit language files
//!
//! The three stages run strictly in sequence and the first failure aborts the
//! run. Nothing is written to disk unless fetching and extraction succeeded.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::application::error::PipelineError;
use crate::domain::PageSource;
use crate::infrastructure::{ConfluenceClient, EmitReport, FileEmitter, RunSettings, TableExtractor};

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub page_id: String,
    /// Number of recognised translation tables
    pub tables: usize,
    pub report: EmitReport,
    pub elapsed: Duration,
}

/// Runs one page through fetch, extract and emit
pub struct ExtractionPipeline {
    source: Arc<dyn PageSource>,
    extractor: TableExtractor,
    emitter: FileEmitter,
    output_directory: PathBuf,
}

impl ExtractionPipeline {
    pub fn new(
        source: Arc<dyn PageSource>,
        extractor: TableExtractor,
        emitter: FileEmitter,
        output_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            extractor,
            emitter,
            output_directory: output_directory.into(),
        }
    }

    /// Wire the Confluence client, extractor and emitter from validated settings
    pub fn from_settings(settings: RunSettings) -> Result<Self, PipelineError> {
        let client = ConfluenceClient::new(settings.base_uri, settings.credentials, settings.http)?;
        let extractor = TableExtractor::new(settings.extraction)?;
        let emitter = FileEmitter::new().with_pretty(settings.pretty);

        Ok(Self::new(
            Arc::new(client),
            extractor,
            emitter,
            settings.output_directory,
        ))
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub async fn run(&self, page_id: &str) -> Result<PipelineSummary, PipelineError> {
        let started = Instant::now();

        let result = self.execute(page_id, started).await;
        if let Err(e) = &result {
            error!(stage = e.stage(), "Content id extraction failed: {}", e);
        }
        result
    }

    async fn execute(&self, page_id: &str, started: Instant) -> Result<PipelineSummary, PipelineError> {
        let html = self.source.fetch_page(page_id).await?;
        let language_maps = self.extractor.extract(&html)?;
        let report = self.emitter.emit(&self.output_directory, &language_maps)?;

        let summary = PipelineSummary {
            page_id: page_id.to_string(),
            tables: language_maps.len(),
            report,
            elapsed: started.elapsed(),
        };
        info!(
            "Page {} done: {} table(s), {} language file(s) in {:?}",
            summary.page_id,
            summary.tables,
            summary.report.files.len(),
            summary.elapsed
        );
        Ok(summary)
    }
}
