//! Top-level error for a pipeline run
//!
//! Every stage error converts into [`PipelineError`]; the binary maps it to a
//! process exit code.

use thiserror::Error;

use crate::infrastructure::{ConfigError, EmitError, FetchError, ParsingError};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parsing(#[from] ParsingError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}

impl PipelineError {
    /// Exit status for the command line tool
    ///
    /// `2` invalid base URI, `3` invalid page id, `4` missing credentials,
    /// `5` any other configuration problem, `1` for runtime failures.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(ConfigError::InvalidBaseUri { .. }) => 2,
            Self::Config(ConfigError::InvalidPageId { .. }) => 3,
            Self::Config(ConfigError::MissingCredentials) => 4,
            Self::Config(_) => 5,
            Self::Fetch(_) | Self::Parsing(_) | Self::Emit(_) => 1,
        }
    }

    /// Name of the failing stage, used as a structured log field
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Fetch(_) => "fetch",
            Self::Parsing(_) => "extract",
            Self::Emit(_) => "emit",
        }
    }
}
