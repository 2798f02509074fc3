//! Tests for the alert-relay-cli library module.

use super::*;
use serde_json::json;

fn payload_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn run(args: &[&str]) -> Result<String, CliError> {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    execute(cli, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

// ============================================================================
// Argument Parsing
// ============================================================================

#[test]
fn test_cli_parsing_resolve() {
    let cli = Cli::try_parse_from(["alert-relay", "resolve", "--layout", "alerts", "payload.json"])
        .unwrap();

    match cli.command {
        Commands::Resolve { layout, file } => {
            assert_eq!(layout, Some(PayloadLayout::Alerts));
            assert_eq!(file, PathBuf::from("payload.json"));
        }
        _ => panic!("Expected Resolve command"),
    }
}

#[test]
fn test_cli_parsing_rejects_unknown_layout() {
    let result = Cli::try_parse_from(["alert-relay", "resolve", "--layout", "pager", "p.json"]);

    assert!(result.is_err());
}

#[test]
fn test_cli_parsing_config_defaults_to_yaml() {
    let cli = Cli::try_parse_from(["alert-relay", "config", "--show"]).unwrap();

    match cli.command {
        Commands::Config { show, format } => {
            assert!(show);
            assert_eq!(format, ConfigFormat::Yaml);
        }
        _ => panic!("Expected Config command"),
    }
}

// ============================================================================
// Resolve
// ============================================================================

#[test]
fn test_resolve_payload_common_labels() {
    let payload = json!({
        "status": "firing",
        "commonLabels": {
            "webhookUrl": "http://dest.example",
            "instance": "host-1",
            "summary": "$.status"
        }
    });

    let forwards = resolve_payload(PayloadLayout::CommonLabels, &payload).unwrap();

    assert_eq!(forwards.len(), 1);
    assert_eq!(forwards[0].webhook_url, "http://dest.example");
    assert_eq!(
        Value::Object(forwards[0].body.clone()),
        json!({ "summary": "firing" })
    );
}

#[test]
fn test_resolve_payload_reports_missing_webhook_url() {
    let payload = json!({ "alerts": [{ "labels": { "summary": "x" } }] });

    let result = resolve_payload(PayloadLayout::Alerts, &payload);

    assert!(matches!(
        result,
        Err(CliError::Layout(LayoutError::MissingWebhookUrl))
    ));
}

#[test]
fn test_resolve_command_prints_forwards() {
    // Arrange
    let file = payload_file(
        r#"{
            "alerts": [
                { "labels": { "webhookUrl": "http://a.example", "sev": "$.alerts[0].labels.level", "level": "high" } },
                { "labels": { "webhookUrl": "http://b.example" } }
            ]
        }"#,
    );
    let path = file.path().to_str().unwrap();

    // Act
    let output = run(&["alert-relay", "resolve", "--layout", "alerts", path]).unwrap();

    // Assert
    let printed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        printed,
        json!([
            { "webhookUrl": "http://a.example", "body": { "sev": "high", "level": "high" } },
            { "webhookUrl": "http://b.example", "body": {} }
        ])
    );
}

#[test]
fn test_resolve_command_rejects_invalid_json() {
    let file = payload_file("{ not json");
    let path = file.path().to_str().unwrap();

    let result = run(&["alert-relay", "resolve", path]);

    assert!(matches!(result, Err(CliError::InvalidPayload { .. })));
}

#[test]
fn test_resolve_command_rejects_empty_payload() {
    let file = payload_file("  \n");
    let path = file.path().to_str().unwrap();

    let result = run(&["alert-relay", "resolve", path]);

    assert!(matches!(result, Err(CliError::InvalidPayload { .. })));
}

#[test]
fn test_resolve_command_reports_missing_file() {
    let result = run(&["alert-relay", "resolve", "/nonexistent/payload.json"]);

    assert!(matches!(result, Err(CliError::Io(_))));
}

#[test]
fn test_resolve_uses_configured_default_layout() {
    let mut config = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    config
        .write_all(b"relay:\n  default_layout: message\n")
        .unwrap();
    let payload = payload_file(
        r#"{ "host": "db-1", "message": "{\"webhookUrl\":\"http://chat.example\",\"text\":\"down: $.host\"}" }"#,
    );

    let output = run(&[
        "alert-relay",
        "--config",
        config.path().to_str().unwrap(),
        "resolve",
        payload.path().to_str().unwrap(),
    ])
    .unwrap();

    let printed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        printed,
        json!([{ "webhookUrl": "http://chat.example", "body": { "text": "down: db-1" } }])
    );
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_command_reports_valid_configuration() {
    let output = run(&["alert-relay", "config"]).unwrap();

    assert_eq!(output.trim(), "Configuration is valid");
}

#[test]
fn test_config_command_shows_json() {
    let output = run(&["alert-relay", "config", "--show", "--format", "json"]).unwrap();

    let shown: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(shown["server"]["port"], 8080);
    assert_eq!(shown["relay"]["default_layout"], "common_labels");
}

#[test]
fn test_config_command_rejects_invalid_configuration() {
    let mut config = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    config.write_all(b"server:\n  port: 0\n").unwrap();

    let result = run(&[
        "alert-relay",
        "--config",
        config.path().to_str().unwrap(),
        "config",
    ]);

    assert!(matches!(
        result,
        Err(CliError::Configuration(ConfigError::Invalid { .. }))
    ));
}
