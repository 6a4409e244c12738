//! Full runs: settings, stub Confluence server, files on disk
mod common;

use std::fs;
use std::path::Path;

use common::{StubServer, page_body};
use confluence_content_ids::infrastructure::{AppConfig, ConfigError};
use confluence_content_ids::{ExtractionPipeline, PipelineError};
use rstest::rstest;
use tempfile::TempDir;

const PAGE: &str = r#"
<h1>Translations</h1>
<table>
  <tbody>
    <tr><th>Content-Id</th><th>de</th><th>en</th></tr>
    <tr><td> t1 </td><td> Hut </td><td>hat</td></tr>
    <tr><td>t2</td><td></td><td>hit</td></tr>
  </tbody>
</table>
<table>
  <tr><th>Key</th><th>de</th></tr>
  <tr><td>ignored</td><td>nope</td></tr>
</table>
<table>
  <tr><th>content-id</th><th>de</th></tr>
  <tr><td>t2</td><td>Hit</td></tr>
</table>"#;

fn config(base_uri: &str, output_directory: &Path) -> AppConfig {
    AppConfig {
        base_uri: Some(base_uri.to_string()),
        page_id: Some("12345".to_string()),
        username: Some("user".to_string()),
        token: Some("secret".to_string()),
        output_directory: output_directory.to_path_buf(),
        ..AppConfig::default()
    }
}

async fn run(config: &AppConfig) -> Result<confluence_content_ids::PipelineSummary, PipelineError> {
    let settings = config.validate()?;
    let page_id = settings.page_id.clone();
    ExtractionPipeline::from_settings(settings)?.run(&page_id).await
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn writes_language_files_from_page() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("output");
    let server = StubServer::respond(200, &page_body(PAGE)).await;

    let summary = run(&config(&server.base_uri, &out)).await.unwrap();
    let request = server.captured().await;

    assert_eq!(request.header("authorization"), Some("Basic dXNlcjpzZWNyZXQ="));
    assert_eq!(summary.tables, 2);
    assert_eq!(read(&out.join("de.json")), r#"{"t1":"Hut","t2":"Hit"}"#);
    assert_eq!(read(&out.join("en.json")), r#"{"t1":"hat","t2":"hit"}"#);
}

#[tokio::test]
async fn untrimmed_content_keeps_whitespace() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("output");
    let server = StubServer::respond(200, &page_body(PAGE)).await;

    let config = AppConfig {
        trim_content: false,
        ..config(&server.base_uri, &out)
    };
    run(&config).await.unwrap();
    server.captured().await;

    assert_eq!(read(&out.join("en.json")), r#"{" t1 ":"hat","t2":"hit"}"#);
}

#[tokio::test]
async fn case_sensitive_pattern_skips_lowercase_header() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("output");
    let server = StubServer::respond(200, &page_body(PAGE)).await;

    let config = AppConfig {
        recognition_flags: String::new(),
        ..config(&server.base_uri, &out)
    };
    let summary = run(&config).await.unwrap();
    server.captured().await;

    assert_eq!(summary.tables, 1);
    assert_eq!(read(&out.join("de.json")), r#"{"t1":"Hut","t2":"t2"}"#);
}

#[tokio::test]
async fn column_offsets_select_identifier_and_languages() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("output");
    let html = "<table>\
        <tr><th>Description</th><th>Content-Id</th><th>en</th></tr>\
        <tr><td>Greeting</td><td>hello</td><td>Hello!</td></tr>\
        </table>";
    let server = StubServer::respond(200, &page_body(html)).await;

    let config = AppConfig {
        identifier_column_index: 1,
        starting_column_index: 2,
        ..config(&server.base_uri, &out)
    };
    run(&config).await.unwrap();
    server.captured().await;

    assert_eq!(read(&out.join("en.json")), r#"{"hello":"Hello!"}"#);
    assert!(!out.join("Content-Id.json").exists());
}

#[tokio::test]
async fn rerun_replaces_stale_files() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("output");
    fs::create_dir_all(out.join("nested")).unwrap();
    fs::write(out.join("fr.json"), r#"{"old":"vieux"}"#).unwrap();
    fs::write(out.join("nested").join("x.json"), "{}").unwrap();
    let server = StubServer::respond(200, &page_body(PAGE)).await;

    run(&config(&server.base_uri, &out)).await.unwrap();
    server.captured().await;

    let mut names: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["de.json", "en.json"]);
}

#[tokio::test]
async fn http_error_keeps_previous_output() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("output");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("de.json"), "{}").unwrap();
    let server = StubServer::respond(401, "{}").await;

    let error = run(&config(&server.base_uri, &out)).await.unwrap_err();
    server.captured().await;

    assert_eq!(error.exit_code(), 1);
    assert!(error.to_string().contains("\"401\""));
    assert!(out.join("de.json").exists());
}

#[rstest]
#[case::missing_base_uri(AppConfig { base_uri: None, ..valid() }, 2)]
#[case::relative_base_uri(AppConfig { base_uri: Some("wiki/confluence".into()), ..valid() }, 2)]
#[case::non_numeric_page_id(AppConfig { page_id: Some("home".into()), ..valid() }, 3)]
#[case::missing_token(AppConfig { token: None, ..valid() }, 4)]
#[case::bad_pattern(AppConfig { recognition_pattern: "([".into(), ..valid() }, 5)]
#[case::bad_flags(AppConfig { recognition_flags: "iz".into(), ..valid() }, 5)]
fn invalid_configuration_maps_to_exit_code(#[case] config: AppConfig, #[case] code: u8) {
    let error = PipelineError::from(config.validate().unwrap_err());
    assert_eq!(error.exit_code(), code, "{error}");
}

#[test]
fn config_errors_are_raised_before_any_request() {
    let config = AppConfig { page_id: Some("12x".into()), ..valid() };
    assert!(matches!(config.validate(), Err(ConfigError::InvalidPageId { .. })));
}

fn valid() -> AppConfig {
    AppConfig {
        base_uri: Some("https://wiki.example.com".to_string()),
        page_id: Some("12345".to_string()),
        token: Some("secret".to_string()),
        ..AppConfig::default()
    }
}
