//! Language maps produced from translation tables
//!
//! A [`LanguageMap`] holds the translations of exactly one table: language code
//! → content-id → translated text. [`MergedOutput`] folds a list of them into the
//! final per-language bundles. Both keep insertion order so the emitted JSON
//! follows the column and row order of the wiki page.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Content-id → translated text, in row order.
pub type ContentMap = IndexMap<String, String>;

/// Translations extracted from a single table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageMap {
    languages: IndexMap<String, ContentMap>,
}

impl LanguageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a language column. Registering the same code twice keeps the
    /// existing entries so later columns with that header write into it.
    pub fn add_language(&mut self, language: impl Into<String>) -> &mut ContentMap {
        self.languages.entry(language.into()).or_default()
    }

    /// Set the translation of `content_id` for `language`, last write wins.
    pub fn insert(
        &mut self,
        language: &str,
        content_id: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.languages
            .entry(language.to_string())
            .or_default()
            .insert(content_id.into(), value.into());
    }

    pub fn get(&self, language: &str) -> Option<&ContentMap> {
        self.languages.get(language)
    }

    pub fn translation(&self, language: &str, content_id: &str) -> Option<&str> {
        self.get(language)
            .and_then(|translations| translations.get(content_id))
            .map(String::as_str)
    }

    pub fn contains_language(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    /// Language codes in column order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ContentMap)> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

impl<L, I, V> FromIterator<(L, I)> for LanguageMap
where
    L: Into<String>,
    I: IntoIterator<Item = (V, V)>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (L, I)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (language, translations) in iter {
            let entries = map.add_language(language);
            for (content_id, value) in translations {
                entries.insert(content_id.into(), value.into());
            }
        }
        map
    }
}

/// All language maps of a page folded into one bundle per language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MergedOutput {
    languages: IndexMap<String, ContentMap>,
}

impl MergedOutput {
    /// Merge maps in list order. A (language, content-id) pair seen again in a
    /// later map overwrites the earlier value but keeps its original position.
    pub fn merge(maps: &[LanguageMap]) -> Self {
        let mut merged = Self::default();
        for map in maps {
            merged.absorb(map);
        }
        merged
    }

    fn absorb(&mut self, map: &LanguageMap) {
        for (language, translations) in map.iter() {
            let target = self.languages.entry(language.clone()).or_default();
            for (content_id, value) in translations {
                target.insert(content_id.clone(), value.clone());
            }
        }
    }

    pub fn get(&self, language: &str) -> Option<&ContentMap> {
        self.languages.get(language)
    }

    pub fn translation(&self, language: &str, content_id: &str) -> Option<&str> {
        self.get(language)
            .and_then(|translations| translations.get(content_id))
            .map(String::as_str)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ContentMap)> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}
