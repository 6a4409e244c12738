use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::error;

use confluence_content_ids::infrastructure::logging::{init_logging_with_config, log_system_info};
use confluence_content_ids::infrastructure::{AppConfig, ConfigOverrides};
use confluence_content_ids::{ExtractionPipeline, PipelineError, PipelineSummary};

#[derive(Debug, Parser)]
#[command(
    name = "confluence-content-ids",
    version,
    about = "Generate per-language JSON translation files from Confluence tables"
)]
struct Cli {
    /// Base URL of the Confluence instance.
    #[arg(long, alias = "confluenceBaseUri", value_name = "URL")]
    base_uri: Option<String>,

    /// Numeric id of the page holding the translation tables.
    #[arg(long, alias = "confluencePageId", value_name = "ID")]
    page_id: Option<String>,

    /// User name for basic auth; omit to send the token as bearer.
    #[arg(long, alias = "confluenceUsername")]
    username: Option<String>,

    /// API token, password or personal access token.
    #[arg(long, alias = "confluenceUserToken")]
    token: Option<String>,

    /// Regex matched against the identifier-column header [default: ^Content-Id$].
    #[arg(long, alias = "recognitionPattern", value_name = "REGEX")]
    recognition_pattern: Option<String>,

    /// Regex flag letters (i, m, s, u, x) [default: i].
    #[arg(long, alias = "recognitionFlags", value_name = "FLAGS")]
    recognition_flags: Option<String>,

    /// Directory receiving the {language}.json files; wiped on every run [default: output].
    #[arg(long, alias = "outputDirectory", value_name = "DIR")]
    output_directory: Option<PathBuf>,

    /// Column holding the content id [default: 0].
    #[arg(long, alias = "identifierColumnIndex", value_name = "INDEX")]
    identifier_column_index: Option<usize>,

    /// First language column [default: 1].
    #[arg(long, alias = "startingColumnIndex", value_name = "INDEX")]
    starting_column_index: Option<usize>,

    /// Trim whitespace around ids and translations [default: true].
    #[arg(
        long,
        alias = "trimContent",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    trim_content: Option<bool>,

    /// Configuration file (TOML, JSON or YAML).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Indent the generated JSON.
    #[arg(long)]
    pretty: bool,

    /// Abort the page request after this many seconds.
    #[arg(long, value_name = "SECONDS")]
    request_timeout_seconds: Option<u64>,

    /// Log level or filter directive [default: info].
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,

    /// Also append logs to this file.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        let log_level = self.log_level.clone().or_else(|| match self.verbose {
            0 => None,
            1 => Some("debug".to_string()),
            _ => Some("trace".to_string()),
        });

        ConfigOverrides {
            base_uri: self.base_uri.clone(),
            page_id: self.page_id.clone(),
            username: self.username.clone(),
            token: self.token.clone(),
            recognition_pattern: self.recognition_pattern.clone(),
            recognition_flags: self.recognition_flags.clone(),
            output_directory: self.output_directory.clone(),
            identifier_column_index: self.identifier_column_index,
            starting_column_index: self.starting_column_index,
            trim_content: self.trim_content,
            pretty: self.pretty.then_some(true),
            request_timeout_seconds: self.request_timeout_seconds,
            log_level,
            log_json: self.log_json.then_some(true),
            log_file: self.log_file.clone(),
        }
    }
}

async fn run(config: &AppConfig) -> Result<PipelineSummary, PipelineError> {
    let settings = config.validate().inspect_err(|e| {
        error!(stage = "config", "Invalid configuration: {}", e);
    })?;
    let page_id = settings.page_id.clone();

    let pipeline = ExtractionPipeline::from_settings(settings).inspect_err(|e| {
        error!(stage = e.stage(), "Failed to set up pipeline: {}", e);
    })?;
    pipeline.run(&page_id).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref(), &cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(PipelineError::from(e).exit_code());
        }
    };

    let logging_ready = match init_logging_with_config(&config.logging) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("warning: {e:#}");
            false
        }
    };
    log_system_info();

    match run(&config).await {
        Ok(summary) => {
            for file in &summary.report.files {
                println!("{}", file.path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if !logging_ready {
                eprintln!("error: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}
