//! Extraction diagnostics
//!
//! The extractor reports what it does through an [`ExtractionObserver`]
//! instead of writing to a process-wide logger. The default
//! [`TracingObserver`] forwards events to `tracing`; tests plug in a
//! [`RecordingObserver`] or a [`NoopObserver`].

use std::fmt;
use std::sync::Mutex;

use tracing::{debug, info, warn};

/// Why a table was not treated as a translation table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A header row plus at least one data row is required
    TooFewRows { rows: usize },
    /// The first row has no `<th>` cells
    NoHeaderCells,
    /// The identifier-column header does not match the recognition pattern
    HeaderMismatch { header: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewRows { rows } => write!(f, "only {rows} row(s)"),
            Self::NoHeaderCells => write!(f, "first row has no header cells"),
            Self::HeaderMismatch { header } => {
                write!(f, "header \"{header}\" does not match recognition pattern")
            }
        }
    }
}

/// Something the extractor did, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionEvent {
    TablesFound { count: usize },
    TableMatched { table_index: usize, header: String },
    TableSkipped { table_index: usize, reason: SkipReason },
    LanguageDetected { table_index: usize, column: usize, language: String },
    RowSkipped { table_index: usize, row_index: usize },
    Finished { tables: usize, matched: usize },
}

pub trait ExtractionObserver: Send + Sync {
    fn notify(&self, event: &ExtractionEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ExtractionObserver for TracingObserver {
    fn notify(&self, event: &ExtractionEvent) {
        match event {
            ExtractionEvent::TablesFound { count } => {
                debug!("Found {} table(s) in page", count);
            }
            ExtractionEvent::TableMatched { table_index, header } => {
                info!("Table #{} recognised as translation table (\"{}\")", table_index, header);
            }
            ExtractionEvent::TableSkipped {
                table_index,
                reason: reason @ SkipReason::HeaderMismatch { .. },
            } => {
                warn!("Skipping table #{}: {}", table_index, reason);
            }
            ExtractionEvent::TableSkipped { table_index, reason } => {
                debug!("Skipping table #{}: {}", table_index, reason);
            }
            ExtractionEvent::LanguageDetected { table_index, column, language } => {
                debug!("Table #{}: language \"{}\" in column {}", table_index, language, column);
            }
            ExtractionEvent::RowSkipped { table_index, row_index } => {
                debug!("Table #{}: row {} has no content id, skipped", table_index, row_index);
            }
            ExtractionEvent::Finished { tables, matched } => {
                info!("Extracted {} language map(s) from {} table(s)", matched, tables);
            }
        }
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ExtractionObserver for NoopObserver {
    fn notify(&self, _event: &ExtractionEvent) {}
}

/// Keeps every event for later inspection
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ExtractionEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ExtractionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn skipped_tables(&self) -> Vec<(usize, SkipReason)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ExtractionEvent::TableSkipped { table_index, reason } => Some((table_index, reason)),
                _ => None,
            })
            .collect()
    }
}

impl ExtractionObserver for RecordingObserver {
    fn notify(&self, event: &ExtractionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_observer_keeps_order() {
        let observer = RecordingObserver::new();
        observer.notify(&ExtractionEvent::TablesFound { count: 2 });
        observer.notify(&ExtractionEvent::Finished { tables: 2, matched: 1 });

        assert_eq!(
            observer.events(),
            vec![
                ExtractionEvent::TablesFound { count: 2 },
                ExtractionEvent::Finished { tables: 2, matched: 1 },
            ]
        );
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::HeaderMismatch { header: "Key".to_string() };
        assert_eq!(reason.to_string(), "header \"Key\" does not match recognition pattern");
        assert_eq!(SkipReason::TooFewRows { rows: 1 }.to_string(), "only 1 row(s)");
    }
}
