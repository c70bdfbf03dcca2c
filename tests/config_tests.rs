//! Configuration loading tests

use std::io::Write;

use linkpulse::config::StaticConfig;
use linkpulse::errors::LinkpulseError;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("linkpulse")
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_from_toml_file() {
    let file = write_config(
        r#"
[server]
host = "0.0.0.0"
port = 8080
public_url = "https://lp.example"

[links]
default_validity_minutes = 120

[telemetry]
enabled = false
stack = "edge"

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = StaticConfig::load_from(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.public_base_url(), "https://lp.example");
    assert_eq!(config.links.default_validity_minutes, 120);
    assert!(!config.telemetry.enabled);
    assert_eq!(config.telemetry.stack, "edge");
    assert_eq!(config.logging.format, "json");

    // 未出现的段落使用默认值
    assert!(config.cors.enabled);
    assert_eq!(config.telemetry.queue_capacity, 1024);
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let config = StaticConfig::load_from(path.to_str().unwrap()).unwrap();
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.links.default_validity_minutes, 30);
}

#[test]
fn test_invalid_values_are_config_errors() {
    let file = write_config(
        r#"
[logging]
format = "xml"
"#,
    );

    let err = StaticConfig::load_from(file.path().to_str().unwrap()).unwrap_err();
    assert!(matches!(err, LinkpulseError::Config(_)));
}

#[test]
fn test_malformed_toml_is_config_error() {
    let file = write_config("[server\nport = ");

    let err = StaticConfig::load_from(file.path().to_str().unwrap()).unwrap_err();
    assert!(matches!(err, LinkpulseError::Config(_)));
}

#[test]
fn test_load_falls_back_to_defaults_on_error() {
    let file = write_config(
        r#"
[links]
default_validity_minutes = 0
"#,
    );

    let config = StaticConfig::load(file.path().to_str());
    assert_eq!(config.links.default_validity_minutes, 30);
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = StaticConfig::default();
    config.server.port = 9090;
    config.telemetry.enabled = false;
    config.save_to_file(&path).unwrap();

    let loaded = StaticConfig::load_from(path.to_str().unwrap()).unwrap();
    assert_eq!(loaded.server.port, 9090);
    assert!(!loaded.telemetry.enabled);
}
