//! Infrastructure layer for HTTP access, HTML parsing and file output
//!
//! This module holds every component that touches the outside world:
//! the Confluence client, the table extractor, the JSON file emitter,
//! configuration loading and logging.

pub mod config; // Layered settings and validation
pub mod file_emitter;
pub mod http_client;
pub mod logging;
pub mod parsing;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoggingConfig, RunSettings};
pub use file_emitter::{EmitError, EmitReport, EmittedFile, FileEmitter};
pub use http_client::{ConfluenceClient, Credentials, FetchError, HttpClientConfig};
pub use logging::{init_logging, init_logging_with_config};
pub use parsing::{ExtractionConfig, ParsingError, ParsingResult, TableExtractor};
