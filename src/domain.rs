//! Domain module - translation data and the seams the pipeline depends on
//!
//! Language maps are the only data the system produces; everything else
//! (HTTP, HTML, filesystem) lives in the infrastructure layer.

pub mod language_map;
pub mod page_source;

pub use language_map::{ContentMap, LanguageMap, MergedOutput};
pub use page_source::PageSource;
