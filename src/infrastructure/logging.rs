//! Logging system configuration and initialization
//!
//! - Human readable or JSON output on stderr (stdout stays free for tooling)
//! - Optional append-only log file written through a non-blocking worker
//! - `RUST_LOG` overrides the configured level when set
//! - UTC timestamps with millisecond precision

#![allow(clippy::uninlined_format_args)]

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use chrono::Utc;
use lazy_static::lazy_static;
use tracing::{debug, info};
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

// Global guard to keep the log file writer alive
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<WorkerGuard>> = Mutex::new(Vec::new());
}

/// RFC 3339 UTC timestamps, e.g. `2024-05-01T09:30:00.123Z`
struct UtcTimeFormatter;

impl FormatTime for UtcTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}

/// Initialize the logging system with default configuration
pub fn init_logging() -> Result<()> {
    init_logging_with_config(&LoggingConfig::default())
}

/// Build the level filter, quietening HTTP and HTML parser internals
/// unless `trace` was requested.
pub fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(level)
        .map_err(|e| anyhow!("Invalid log level \"{}\": {}", level, e))?;

    if !level.to_lowercase().contains("trace") {
        for directive in [
            "reqwest=info",
            "hyper=warn",
            "hyper_util=warn",
            "h2=warn",
            "rustls=warn",
            "html5ever=warn",
            "selectors=warn",
            "tokio=info",
        ] {
            filter = filter.add_directive(directive.parse()?);
        }
        filter = filter.add_directive(format!("confluence_content_ids={}", level).parse()?);
    }

    Ok(filter)
}

/// Initialize logging with custom configuration
///
/// Fails when a global subscriber is already installed.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let registry = Registry::default().with(build_env_filter(&config.level)?);

    let result = match (&config.file, config.json_format) {
        (Some(path), true) => {
            let file_layer = fmt::Layer::new()
                .json()
                .with_writer(open_log_file(path)?)
                .with_timer(UtcTimeFormatter)
                .with_target(true)
                .with_ansi(false);
            let console_layer = fmt::Layer::new()
                .json()
                .with_writer(std::io::stderr)
                .with_timer(UtcTimeFormatter)
                .with_target(true);
            registry.with(file_layer).with(console_layer).try_init()
        }
        (Some(path), false) => {
            // File layer with minimal formatting (time + level + message only)
            let file_layer = fmt::Layer::new()
                .with_writer(open_log_file(path)?)
                .with_timer(UtcTimeFormatter)
                .with_target(false)
                .with_ansi(false);
            let console_layer = fmt::Layer::new()
                .with_writer(std::io::stderr)
                .with_timer(UtcTimeFormatter)
                .with_target(false);
            registry.with(file_layer).with(console_layer).try_init()
        }
        (None, true) => {
            let console_layer = fmt::Layer::new()
                .json()
                .with_writer(std::io::stderr)
                .with_timer(UtcTimeFormatter)
                .with_target(true);
            registry.with(console_layer).try_init()
        }
        (None, false) => {
            let console_layer = fmt::Layer::new()
                .with_writer(std::io::stderr)
                .with_timer(UtcTimeFormatter)
                .with_target(false);
            registry.with(console_layer).try_init()
        }
    };
    result.map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    debug!("Logging system initialized");
    debug!("Log level: {}", config.level);
    debug!("JSON format: {}", config.json_format);
    if let Some(path) = &config.file {
        info!("Writing logs to {}", path.display());
    }

    Ok(())
}

fn open_log_file(path: &Path) -> Result<non_blocking::NonBlocking> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Log file path {:?} has no file name", path))?;

    std::fs::create_dir_all(directory)
        .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", directory, e))?;

    let (writer, guard) = tracing_appender::non_blocking(rolling::never(directory, file_name));

    // Store the guard globally to prevent it from being dropped
    LOG_GUARDS
        .lock()
        .map_err(|_| anyhow!("Log guard registry is poisoned"))?
        .push(guard);

    Ok(writer)
}

/// Log build and platform details for diagnostics
pub fn log_system_info() {
    debug!("Application version: {}", env!("CARGO_PKG_VERSION"));
    debug!("Operating system: {}", std::env::consts::OS);
    debug!("Architecture: {}", std::env::consts::ARCH);

    if let Ok(current_dir) = std::env::current_dir() {
        debug!("Working directory: {:?}", current_dir);
    }
}
