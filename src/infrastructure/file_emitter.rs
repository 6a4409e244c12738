//! Translation bundle writer
//!
//! Wipes the output directory, merges all language maps and writes one flat
//! JSON object per language to `{output_directory}/{language}.json`.
//! Writes are not atomic across languages: a failure part way leaves the
//! files written so far in place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{ContentMap, LanguageMap, MergedOutput};

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("Failed to clear output directory {}: {source}", path.display())]
    ClearDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Language code \"{language}\" cannot be used as a file name")]
    InvalidLanguageCode { language: String },

    #[error("Could not serialize lang file for language \"{language}\": {source}")]
    Serialize {
        language: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not write lang file for language \"{language}\": {source}")]
    WriteLanguageFile {
        language: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One written bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFile {
    pub language: String,
    pub path: PathBuf,
    pub entries: usize,
}

/// Summary of an emit run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    pub output_directory: PathBuf,
    pub files: Vec<EmittedFile>,
}

impl EmitReport {
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|file| file.language.as_str())
    }

    pub fn total_entries(&self) -> usize {
        self.files.iter().map(|file| file.entries).sum()
    }
}

/// Writes merged language maps as JSON files
#[derive(Debug, Clone, Default)]
pub struct FileEmitter {
    pretty: bool,
}

impl FileEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indent the JSON output instead of writing it compact
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn emit(
        &self,
        output_directory: &Path,
        language_maps: &[LanguageMap],
    ) -> Result<EmitReport, EmitError> {
        info!("Generate translation files in {}", output_directory.display());

        let merged = MergedOutput::merge(language_maps);
        if let Some(language) = merged.languages().find(|language| !is_valid_file_stem(language)) {
            return Err(EmitError::InvalidLanguageCode {
                language: language.to_string(),
            });
        }

        prepare_output_directory(output_directory)?;

        let mut report = EmitReport {
            output_directory: output_directory.to_path_buf(),
            files: Vec::with_capacity(merged.len()),
        };
        for (language, translations) in merged.iter() {
            report.files.push(self.write_language(output_directory, language, translations)?);
        }

        info!(
            "Wrote {} language file(s) with {} entries",
            report.files.len(),
            report.total_entries()
        );
        Ok(report)
    }

    fn write_language(
        &self,
        output_directory: &Path,
        language: &str,
        translations: &ContentMap,
    ) -> Result<EmittedFile, EmitError> {
        let path = output_directory.join(format!("{language}.json"));

        let json = if self.pretty {
            serde_json::to_string_pretty(translations)
        } else {
            serde_json::to_string(translations)
        }
        .map_err(|source| EmitError::Serialize {
            language: language.to_string(),
            source,
        })?;

        fs::write(&path, json).map_err(|source| EmitError::WriteLanguageFile {
            language: language.to_string(),
            path: path.clone(),
            source,
        })?;

        debug!("Wrote {} ({} entries)", path.display(), translations.len());
        Ok(EmittedFile {
            language: language.to_string(),
            path,
            entries: translations.len(),
        })
    }
}

/// Remove `directory` with everything below it, then recreate it empty
pub fn prepare_output_directory(directory: &Path) -> Result<(), EmitError> {
    if directory.exists() {
        debug!("Clearing existing output directory {}", directory.display());
        fs::remove_dir_all(directory).map_err(|source| EmitError::ClearDirectory {
            path: directory.to_path_buf(),
            source,
        })?;
    }

    fs::create_dir_all(directory).map_err(|source| EmitError::CreateDirectory {
        path: directory.to_path_buf(),
        source,
    })
}

fn is_valid_file_stem(language: &str) -> bool {
    !language.is_empty()
        && language != "."
        && language != ".."
        && !language.contains(['/', '\\', '\0'])
}
