//! Property tests for translation-table selection
use confluence_content_ids::infrastructure::parsing::{ExtractionConfig, extract_language_maps};
use std::collections::HashMap;

use proptest::prelude::*;
use regex::Regex;

fn config() -> ExtractionConfig {
    ExtractionConfig::new(Regex::new("(?i)^content-id$").unwrap(), true, 0, 1)
}

/// One table per flag: matching tables get a `Content-Id` header and a
/// language named after their position.
fn page(tables: &[bool]) -> String {
    tables
        .iter()
        .enumerate()
        .map(|(index, matching)| {
            let header = if *matching { "Content-Id" } else { "Key" };
            format!(
                "<table><tr><th>{header}</th><th>l{index}</th></tr>\
                 <tr><td>id{index}</td><td>v{index}</td></tr></table>"
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn one_map_per_matching_table_in_document_order(
        tables in prop::collection::vec(any::<bool>(), 1..12)
    ) {
        let maps = extract_language_maps(config(), &page(&tables)).unwrap();

        let expected: Vec<String> = tables
            .iter()
            .enumerate()
            .filter(|(_, matching)| **matching)
            .map(|(index, _)| format!("l{index}"))
            .collect();
        let actual: Vec<String> = maps
            .iter()
            .map(|map| map.languages().next().unwrap().to_string())
            .collect();

        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn every_row_with_an_id_is_kept(
        rows in prop::collection::vec(("[a-z]{1,8}", "[A-Za-z ]{0,12}"), 1..20)
    ) {
        let body: String = rows
            .iter()
            .map(|(id, value)| format!("<tr><td>{id}</td><td>{value}</td></tr>"))
            .collect();
        let html = format!("<table><tr><th>Content-Id</th><th>en</th></tr>{body}</table>");

        let maps = extract_language_maps(config(), &html).unwrap();
        prop_assert_eq!(maps.len(), 1);

        // Later rows overwrite earlier ones with the same id
        let mut expected = HashMap::new();
        for (id, value) in &rows {
            let translation = if value.is_empty() { id.as_str() } else { value.trim() };
            expected.insert(id.as_str(), translation);
        }

        prop_assert_eq!(maps[0].get("en").map(|map| map.len()), Some(expected.len()));
        for (id, translation) in expected {
            prop_assert_eq!(maps[0].translation("en", id), Some(translation));
        }
    }
}

#[test]
fn page_without_tables_is_an_error() {
    assert!(extract_language_maps(config(), "<p>No tables</p>").is_err());
}
