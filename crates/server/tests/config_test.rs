//! # Configuration Loading Tests
//!
//! These tests mutate process environment variables, so they run serially.

mod common;

use anyhow::Result;
use common::load_config;
use serial_test::serial;
use std::env;

const MINIMAL: &str = r#"
providers:
  default:
    provider: "local"
    api_url: "http://localhost:8080/v1/chat/completions"
    model_name: "local-model"
"#;

fn clear_overrides() {
    for var in [
        "PORT",
        "DB_URL",
        "MAX_UPLOAD_BYTES",
        "IELTS_CORS__ALLOW_ORIGIN",
        "IELTS_MAX_UPLOAD_BYTES",
        "TEST_IELTS_AI_URL",
    ] {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_fill_missing_values() -> Result<()> {
    clear_overrides();
    let (config, _dir) = load_config(MINIMAL)?;

    assert_eq!(config.port, 9090);
    assert_eq!(config.db_url, "db/ielts_ingest.db");
    assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    assert_eq!(config.cors.allow_origin, "*");
    assert_eq!(config.cors.allow_methods, vec!["GET", "POST", "OPTIONS"]);

    let task = &config.tasks["metadata_generation"];
    assert_eq!(task.provider.as_deref(), Some("default"));
    assert!(task.system_prompt.as_deref().unwrap().contains("IELTS"));
    assert_eq!(task.max_input_chars, Some(100_000));
    Ok(())
}

#[test]
#[serial]
fn test_file_values_override_defaults() -> Result<()> {
    clear_overrides();
    let yaml = format!(
        "{MINIMAL}\nport: 8181\nmax_upload_bytes: 2048\ncors:\n  allow_origin: \"https://admin.example.com\"\ntasks:\n  metadata_generation:\n    max_input_chars: 500\n"
    );
    let (config, _dir) = load_config(&yaml)?;

    assert_eq!(config.port, 8181);
    assert_eq!(config.max_upload_bytes, 2048);
    assert_eq!(config.cors.allow_origin, "https://admin.example.com");
    assert_eq!(config.cors.allow_headers, vec!["Content-Type"]);

    let task = &config.tasks["metadata_generation"];
    assert_eq!(task.max_input_chars, Some(500));
    assert_eq!(task.provider.as_deref(), Some("default"));
    Ok(())
}

#[test]
#[serial]
fn test_environment_overrides_file() -> Result<()> {
    clear_overrides();
    env::set_var("PORT", "7070");
    env::set_var("IELTS_CORS__ALLOW_ORIGIN", "https://panel.example.com");
    let result = load_config(&format!("{MINIMAL}\nport: 8181\n"));
    clear_overrides();

    let (config, _dir) = result?;
    assert_eq!(config.port, 7070);
    assert_eq!(config.cors.allow_origin, "https://panel.example.com");
    Ok(())
}

#[test]
#[serial]
fn test_placeholders_are_substituted() -> Result<()> {
    clear_overrides();
    env::set_var("TEST_IELTS_AI_URL", "http://ai.internal/v1/chat/completions");
    let yaml = r#"
providers:
  default:
    provider: "local"
    api_url: "${TEST_IELTS_AI_URL}"
    model_name: "local-model"
"#;
    let result = load_config(yaml);
    clear_overrides();

    let (config, _dir) = result?;
    assert_eq!(
        config.providers["default"].api_url.as_deref(),
        Some("http://ai.internal/v1/chat/completions")
    );
    Ok(())
}

#[test]
#[serial]
fn test_zero_upload_limit_is_rejected() {
    clear_overrides();
    let result = load_config(&format!("{MINIMAL}\nmax_upload_bytes: 0\n"));
    assert!(result.is_err());
    let message = result.err().unwrap().to_string();
    assert!(message.contains("max_upload_bytes"), "got: {message}");
}

#[test]
#[serial]
fn test_missing_file_is_reported() {
    clear_overrides();
    let result = ielts_ingest_server::config::get_config(Some("/nonexistent/config.yml"));
    assert!(matches!(
        result,
        Err(ielts_ingest_server::config::ConfigError::NotFound(_))
    ));
}
