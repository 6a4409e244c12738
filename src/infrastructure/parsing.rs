//! HTML parsing infrastructure for translation tables
//!
//! The extractor is the only component with real parsing logic: it decides
//! which tables are translation tables and reads their columns into
//! language maps.

pub mod config;
pub mod error;
pub mod observer;
pub mod table_extractor;

// Re-export public types
pub use config::ExtractionConfig;
pub use error::{ParsingError, ParsingResult};
pub use observer::{
    ExtractionEvent, ExtractionObserver, NoopObserver, RecordingObserver, SkipReason,
    TracingObserver,
};
pub use table_extractor::{TableExtractor, extract_language_maps};

/// Generic HTML parser trait for type-safe parsing
pub trait HtmlParser {
    type Output;

    /// Parse HTML content into the parser's output type
    fn parse(&self, html: &str) -> ParsingResult<Self::Output>;
}
