//! Translation table extractor
//!
//! Walks every `<table>` of a rendered wiki page, keeps the ones whose
//! identifier-column header matches the recognition pattern and turns each of
//! them into a [`LanguageMap`].
//!
//! Row and cell lookups use descendant selectors, so a table nested inside a
//! cell contributes its rows to the outer table as well as being visited on its
//! own. Confluence does not render nested translation tables, so this is left
//! as is.

use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::observer::{ExtractionEvent, ExtractionObserver, SkipReason, TracingObserver};
use super::{ExtractionConfig, HtmlParser, ParsingError, ParsingResult};
use crate::domain::LanguageMap;

/// Language code per column offset, `None` where the header was empty
type LanguageColumns = Vec<Option<String>>;

/// Extracts language maps from translation tables
pub struct TableExtractor {
    config: ExtractionConfig,
    observer: Arc<dyn ExtractionObserver>,
    table_selector: Selector,
    row_selector: Selector,
    header_cell_selector: Selector,
    data_cell_selector: Selector,
}

impl TableExtractor {
    /// Create an extractor that reports through `tracing`
    pub fn new(config: ExtractionConfig) -> ParsingResult<Self> {
        Self::with_observer(config, Arc::new(TracingObserver))
    }

    /// Create an extractor with a custom diagnostics observer
    pub fn with_observer(
        config: ExtractionConfig,
        observer: Arc<dyn ExtractionObserver>,
    ) -> ParsingResult<Self> {
        Ok(Self {
            config,
            observer,
            table_selector: compile_selector("table")?,
            row_selector: compile_selector("tr")?,
            header_cell_selector: compile_selector("th")?,
            data_cell_selector: compile_selector("td")?,
        })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract one language map per translation table, in document order.
    ///
    /// Fails only when the page has no table at all; tables that do not match
    /// yield an empty list.
    pub fn extract(&self, html: &str) -> ParsingResult<Vec<LanguageMap>> {
        debug!("Creating content ids from page markup ({} bytes)", html.len());

        let document = Html::parse_document(html);
        let tables: Vec<ElementRef<'_>> = document.select(&self.table_selector).collect();

        if tables.is_empty() {
            return Err(ParsingError::NoTableFound);
        }
        self.observer.notify(&ExtractionEvent::TablesFound { count: tables.len() });

        let results: Vec<LanguageMap> = tables
            .iter()
            .enumerate()
            .filter_map(|(table_index, table)| self.extract_table(table_index, *table))
            .collect();

        self.observer.notify(&ExtractionEvent::Finished {
            tables: tables.len(),
            matched: results.len(),
        });
        Ok(results)
    }

    fn extract_table(&self, table_index: usize, table: ElementRef<'_>) -> Option<LanguageMap> {
        let rows: Vec<ElementRef<'_>> = table.select(&self.row_selector).collect();

        let [header_row, data_rows @ ..] = rows.as_slice() else {
            self.skip(table_index, SkipReason::TooFewRows { rows: 0 });
            return None;
        };
        if data_rows.is_empty() {
            self.skip(table_index, SkipReason::TooFewRows { rows: 1 });
            return None;
        }

        let headers: Vec<String> = header_row
            .select(&self.header_cell_selector)
            .map(cell_text)
            .collect();
        if headers.is_empty() {
            self.skip(table_index, SkipReason::NoHeaderCells);
            return None;
        }

        let identifier_header = headers
            .get(self.config.identifier_column_index)
            .map_or("", String::as_str);
        if !self.config.recognition_pattern.is_match(identifier_header) {
            self.skip(
                table_index,
                SkipReason::HeaderMismatch { header: identifier_header.to_string() },
            );
            return None;
        }
        self.observer.notify(&ExtractionEvent::TableMatched {
            table_index,
            header: identifier_header.to_string(),
        });

        let languages = self.collect_languages(table_index, &headers);
        let mut language_map = LanguageMap::new();
        for language in languages.iter().flatten() {
            language_map.add_language(language.as_str());
        }

        for (offset, row) in data_rows.iter().enumerate() {
            self.extract_row(table_index, offset + 1, *row, &languages, &mut language_map);
        }

        Some(language_map)
    }

    fn collect_languages(&self, table_index: usize, headers: &[String]) -> LanguageColumns {
        headers
            .iter()
            .enumerate()
            .skip(self.config.starting_column_index)
            .map(|(column, header)| {
                if header.is_empty() {
                    return None;
                }
                self.observer.notify(&ExtractionEvent::LanguageDetected {
                    table_index,
                    column,
                    language: header.clone(),
                });
                Some(header.clone())
            })
            .collect()
    }

    fn extract_row(
        &self,
        table_index: usize,
        row_index: usize,
        row: ElementRef<'_>,
        languages: &LanguageColumns,
        language_map: &mut LanguageMap,
    ) {
        let cells: Vec<String> = row.select(&self.data_cell_selector).map(cell_text).collect();

        let content_id = cells
            .get(self.config.identifier_column_index)
            .map(|text| self.config.normalize(text))
            .unwrap_or_default();
        if content_id.is_empty() {
            self.observer.notify(&ExtractionEvent::RowSkipped { table_index, row_index });
            return;
        }

        for (offset, cell) in cells.iter().skip(self.config.starting_column_index).enumerate() {
            let Some(Some(language)) = languages.get(offset) else {
                continue;
            };
            let resolved = if cell.is_empty() { content_id } else { cell.as_str() };
            language_map.insert(language, content_id, self.config.normalize(resolved));
        }
    }

    fn skip(&self, table_index: usize, reason: SkipReason) {
        self.observer.notify(&ExtractionEvent::TableSkipped { table_index, reason });
    }
}

impl HtmlParser for TableExtractor {
    type Output = Vec<LanguageMap>;

    fn parse(&self, html: &str) -> ParsingResult<Self::Output> {
        self.extract(html)
    }
}

/// Extract language maps without diagnostics
pub fn extract_language_maps(
    config: ExtractionConfig,
    html: &str,
) -> ParsingResult<Vec<LanguageMap>> {
    TableExtractor::with_observer(config, Arc::new(super::NoopObserver))?.extract(html)
}

fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, e))
}

/// Visible text of a cell: every descendant text node, concatenated
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect()
}
