use chat_widget::config::AppConfig;
use chat_widget::widget::SubmitPolicy;
use serial_test::serial;
use std::env;
use std::fs;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("CHAT_WIDGET_SERVER__PORT");
        env::remove_var("CHAT_WIDGET_WIDGET__SUBMIT_POLICY");
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
        env::remove_var("CHAT_ENDPOINT_URL");
        env::remove_var("SUBMIT_POLICY");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args(["chat-widget"]).expect("Failed to load config");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.endpoint.base_url, "http://127.0.0.1:8080");
    assert_eq!(config.endpoint.path, "/api/chat");
    assert_eq!(config.widget.submit_policy, SubmitPolicy::Concurrent);
    assert_eq!(config.bind_address(), "127.0.0.1:3000");
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("CHAT_WIDGET_SERVER__PORT", "9090");
        env::set_var("CHAT_WIDGET_WIDGET__SUBMIT_POLICY", "queued");
    }

    let config = AppConfig::load_from_args(["chat-widget"]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.widget.submit_policy, SubmitPolicy::Queued);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("CHAT_WIDGET_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args(["chat-widget", "--port", "7171"])
        .expect("Failed to load config");
    assert_eq!(config.server.port, 7171);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file_path = dir.path().join("widget.yaml");
    fs::write(
        &file_path,
        r#"
server:
  port: 7070
endpoint:
  base_url: "http://backend.internal:5000"
widget:
  submit_policy: queued
"#,
    )
    .expect("Failed to write temp config");

    // Point the loader at the file via the env var clap reads
    unsafe {
        env::set_var("CONFIG_FILE", &file_path);
    }

    let config = AppConfig::load_from_args(["chat-widget"]).expect("Failed to load config from file");
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.endpoint.base_url, "http://backend.internal:5000");
    assert_eq!(config.endpoint.path, "/api/chat");
    assert_eq!(config.widget.submit_policy, SubmitPolicy::Queued);

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args(["chat-widget", "--config", "does-not-exist.yaml"]);
    assert!(result.is_err());
}
