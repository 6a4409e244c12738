//! Configuration infrastructure
//!
//! Settings are layered with the `config` crate, lowest precedence first:
//! 1. Built-in defaults (`AppConfig::default`)
//! 2. An optional configuration file (TOML, JSON or YAML)
//! 3. Environment variables prefixed with `CONFLUENCE_CONTENT_IDS_`
//!    (nested keys use `__`, e.g. `CONFLUENCE_CONTENT_IDS_LOGGING__LEVEL`)
//! 4. Command line overrides
//!
//! The raw [`AppConfig`] is then validated into [`RunSettings`] before any
//! network call is made.

use std::path::{Path, PathBuf};

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::infrastructure::http_client::{Credentials, HttpClientConfig};
use crate::infrastructure::parsing::ExtractionConfig;

pub const ENV_PREFIX: &str = "CONFLUENCE_CONTENT_IDS";

/// Defaults applied when nothing else sets a value
pub mod defaults {
    pub const RECOGNITION_PATTERN: &str = "^Content-Id$";
    pub const RECOGNITION_FLAGS: &str = "i";
    pub const OUTPUT_DIRECTORY: &str = "output";
    pub const IDENTIFIER_COLUMN_INDEX: usize = 0;
    pub const STARTING_COLUMN_INDEX: usize = 1;
    pub const TRIM_CONTENT: bool = true;
    pub const LOG_LEVEL: &str = "info";
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Invalid source uri: \"{value}\"")]
    InvalidBaseUri { value: String },

    #[error("Invalid page id: \"{value}\"")]
    InvalidPageId { value: String },

    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Invalid recognition pattern \"{pattern}\": {reason}")]
    InvalidRecognitionPattern { pattern: String, reason: String },

    #[error("Invalid recognition flags \"{flags}\": unsupported flag '{flag}'")]
    InvalidRecognitionFlags { flags: String, flag: char },
}

/// Raw, unvalidated application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the Confluence instance
    pub base_uri: Option<String>,

    /// Numeric id of the page holding the translation tables
    pub page_id: Option<String>,

    /// Omit to authenticate with a bearer token
    pub username: Option<String>,

    /// Password or personal access token
    pub token: Option<String>,

    /// Regex source tested against the identifier-column header
    pub recognition_pattern: String,

    /// Regex flag letters applied to `recognition_pattern`
    pub recognition_flags: String,

    pub output_directory: PathBuf,
    pub identifier_column_index: usize,
    pub starting_column_index: usize,
    pub trim_content: bool,

    /// Indent the emitted JSON
    pub pretty: bool,

    /// Request timeout; no timeout when unset
    pub request_timeout_seconds: Option<u64>,

    pub user_agent: Option<String>,

    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_uri: None,
            page_id: None,
            username: None,
            token: None,
            recognition_pattern: defaults::RECOGNITION_PATTERN.to_string(),
            recognition_flags: defaults::RECOGNITION_FLAGS.to_string(),
            output_directory: PathBuf::from(defaults::OUTPUT_DIRECTORY),
            identifier_column_index: defaults::IDENTIFIER_COLUMN_INDEX,
            starting_column_index: defaults::STARTING_COLUMN_INDEX,
            trim_content: defaults::TRIM_CONTENT,
            pretty: false,
            request_timeout_seconds: None,
            user_agent: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Also append logs to this file
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            file: None,
        }
    }
}

/// Values supplied on the command line; `None` leaves lower layers untouched
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_uri: Option<String>,
    pub page_id: Option<String>,
    pub username: Option<String>,
    pub token: Option<String>,
    pub recognition_pattern: Option<String>,
    pub recognition_flags: Option<String>,
    pub output_directory: Option<PathBuf>,
    pub identifier_column_index: Option<usize>,
    pub starting_column_index: Option<usize>,
    pub trim_content: Option<bool>,
    pub pretty: Option<bool>,
    pub request_timeout_seconds: Option<u64>,
    pub log_level: Option<String>,
    pub log_json: Option<bool>,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load defaults, then `file`, then the environment, then `overrides`
    pub fn load(file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        Self::load_with_environment(file, environment(), overrides)
    }

    fn load_with_environment(
        file: Option<&Path>,
        environment: config::Environment,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(environment)
            .set_override_option("base_uri", overrides.base_uri.clone())?
            .set_override_option("page_id", overrides.page_id.clone())?
            .set_override_option("username", overrides.username.clone())?
            .set_override_option("token", overrides.token.clone())?
            .set_override_option("recognition_pattern", overrides.recognition_pattern.clone())?
            .set_override_option("recognition_flags", overrides.recognition_flags.clone())?
            .set_override_option(
                "output_directory",
                overrides.output_directory.as_ref().map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option(
                "identifier_column_index",
                overrides.identifier_column_index.map(|v| v as u64),
            )?
            .set_override_option(
                "starting_column_index",
                overrides.starting_column_index.map(|v| v as u64),
            )?
            .set_override_option("trim_content", overrides.trim_content)?
            .set_override_option("pretty", overrides.pretty)?
            .set_override_option("request_timeout_seconds", overrides.request_timeout_seconds)?
            .set_override_option("logging.level", overrides.log_level.clone())?
            .set_override_option("logging.json_format", overrides.log_json)?
            .set_override_option(
                "logging.file",
                overrides.log_file.as_ref().map(|p| p.to_string_lossy().into_owned()),
            )?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Check every input the run needs and compile the recognition pattern
    pub fn validate(&self) -> Result<RunSettings, ConfigError> {
        let base_uri = parse_base_uri(self.base_uri.as_deref())?;
        let page_id = parse_page_id(self.page_id.as_deref())?;

        let token = self
            .token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingCredentials)?;
        let credentials = Credentials::new(self.username.clone(), token);

        let recognition_pattern =
            build_recognition_pattern(&self.recognition_pattern, &self.recognition_flags)?;

        let mut http = HttpClientConfig {
            timeout_seconds: self.request_timeout_seconds,
            ..HttpClientConfig::default()
        };
        if let Some(user_agent) = &self.user_agent {
            http.user_agent.clone_from(user_agent);
        }

        Ok(RunSettings {
            base_uri,
            page_id,
            credentials,
            extraction: ExtractionConfig::new(
                recognition_pattern,
                self.trim_content,
                self.identifier_column_index,
                self.starting_column_index,
            ),
            output_directory: self.output_directory.clone(),
            pretty: self.pretty,
            http,
        })
    }
}

/// Validated settings for one run
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub base_uri: Url,
    pub page_id: String,
    pub credentials: Credentials,
    pub extraction: ExtractionConfig,
    pub output_directory: PathBuf,
    pub pretty: bool,
    pub http: HttpClientConfig,
}

/// Variables are kept as strings: tokens and page ids may carry leading zeros
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

fn parse_base_uri(value: Option<&str>) -> Result<Url, ConfigError> {
    let raw = value.map(str::trim).unwrap_or_default();
    let invalid = || ConfigError::InvalidBaseUri { value: raw.to_string() };

    let url = Url::parse(raw).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(invalid()),
    }
}

fn parse_page_id(value: Option<&str>) -> Result<String, ConfigError> {
    let raw = value.map(str::trim).unwrap_or_default();
    if !raw.is_empty() && raw.bytes().all(|byte| byte.is_ascii_digit()) {
        Ok(raw.to_string())
    } else {
        Err(ConfigError::InvalidPageId { value: raw.to_string() })
    }
}

/// Compile `pattern` with regular-expression flag letters.
///
/// `i`, `m`, `s` and `x` map to the matching builder switches, `u` is always
/// on, `g` and `y` only affect stateful matching and are ignored.
pub fn build_recognition_pattern(pattern: &str, flags: &str) -> Result<Regex, ConfigError> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            'u' | 'g' | 'y' => {}
            other => {
                return Err(ConfigError::InvalidRecognitionFlags {
                    flags: flags.to_string(),
                    flag: other,
                });
            }
        }
    }

    builder
        .build()
        .map_err(|e| ConfigError::InvalidRecognitionPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}
