//! Extraction settings for the table extractor
//!
//! Every value is required here; defaults such as `^Content-Id$` belong to the
//! configuration layer, not to the extractor.

use regex::Regex;

/// How translation tables are recognised and read
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Tested against the visible text of the identifier-column header
    pub recognition_pattern: Regex,

    /// Trim leading/trailing whitespace of content-ids and translations
    pub trim_content: bool,

    /// 0-based column holding the content-id, in the header row and in data rows
    pub identifier_column_index: usize,

    /// 0-based column at which language columns begin. Not checked against
    /// `identifier_column_index`; a misconfiguration yields empty or odd maps.
    pub starting_column_index: usize,
}

impl ExtractionConfig {
    pub fn new(
        recognition_pattern: Regex,
        trim_content: bool,
        identifier_column_index: usize,
        starting_column_index: usize,
    ) -> Self {
        Self {
            recognition_pattern,
            trim_content,
            identifier_column_index,
            starting_column_index,
        }
    }

    /// Apply the trimming policy to a cell text
    pub fn normalize<'a>(&self, text: &'a str) -> &'a str {
        if self.trim_content { text.trim() } else { text }
    }
}
