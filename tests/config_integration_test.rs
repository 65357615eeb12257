//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX`.

use chartex::config::{load_config, DestinationKind};
use chartex::domain::OptionValue;
use secrecy::ExposeSecret;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::{NamedTempFile, TempDir};

// Serializes tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    std::env::remove_var("CHARTEX_SERVER_HOST");
    std::env::remove_var("CHARTEX_SERVER_PORT");
    std::env::remove_var("CHARTEX_EXPORT_UNZIP");
    std::env::remove_var("CHARTEX_DESTINATION_KIND");
    std::env::remove_var("CHARTEX_FTP_PASSWORD");
    std::env::remove_var("TEST_CHARTEX_S3_SECRET");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[server]
host = "export.internal"
port = 7801
secure = true
tls_verify = false
minify_resources = true
timeout_seconds = 45

[export]
output_dir = "/var/charts"
unzip = false
bulk = false

[export.options]
type = "pdf"
scale = 2
chartConfig = { path = "/etc/charts/sales.json" }

[destination]
kind = "s3"

[s3]
bucket = "chart-exports"
access_key_id = "AKIAEXAMPLE"
secret_access_key = "s3-secret"
endpoint = "http://localhost:9000"
force_path_style = true

[logging]
local_enabled = true
local_path = "/var/log/chartex"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(
        config.server.connection().to_string(),
        "https://export.internal:7801"
    );
    assert!(!config.server.tls_verify);
    assert_eq!(config.server.timeout_seconds, Some(45));
    assert!(!config.export.unzip);
    assert!(!config.export.bulk);
    assert_eq!(
        config.export.options.get("type"),
        Some(&OptionValue::Text("pdf".to_string()))
    );
    assert_eq!(
        config.export.options.get("scale"),
        Some(&OptionValue::Json(serde_json::json!(2)))
    );
    assert_eq!(
        config.export.options.get("chartConfig"),
        Some(&OptionValue::Path(PathBuf::from("/etc/charts/sales.json")))
    );
    assert_eq!(config.destination.kind, DestinationKind::S3);

    let s3 = config.s3.unwrap();
    assert_eq!(s3.bucket, "chart-exports");
    assert_eq!(s3.secret_access_key.expose_secret().as_str(), "s3-secret");
    assert_eq!(s3.probe_region, "us-west-2");
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_minimal_config_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[export.options]\ntype = \"png\"\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 1337);
    assert!(!config.server.secure);
    assert!(config.export.unzip);
    assert!(config.export.bulk);
    assert_eq!(config.destination.kind, DestinationKind::Local);
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[server]
host = "from-file"

[ftp]
host = "ftp.example.com"
username = "charts"
password = "file-password"
remote_dir = "reports"
"#,
    );

    std::env::set_var("CHARTEX_SERVER_HOST", "from-env");
    std::env::set_var("CHARTEX_SERVER_PORT", "9000");
    std::env::set_var("CHARTEX_EXPORT_UNZIP", "false");
    std::env::set_var("CHARTEX_DESTINATION_KIND", "FTP");
    std::env::set_var("CHARTEX_FTP_PASSWORD", "env-password");

    let result = load_config(file.path());
    cleanup_env_vars();

    let config = result.unwrap();
    assert_eq!(config.server.host, "from-env");
    assert_eq!(config.server.port, 9000);
    assert!(!config.export.unzip);
    assert_eq!(config.destination.kind, DestinationKind::Ftp);
    assert_eq!(
        config.ftp.unwrap().password.expose_secret().as_str(),
        "env-password"
    );
}

#[test]
fn test_env_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("TEST_CHARTEX_S3_SECRET", "substituted-secret");
    let file = write_config(
        r#"
[destination]
kind = "s3"

[s3]
bucket = "charts"
access_key_id = "AKIA"
secret_access_key = "${TEST_CHARTEX_S3_SECRET}"
"#,
    );

    let result = load_config(file.path());
    cleanup_env_vars();

    let s3 = result.unwrap().s3.unwrap();
    assert_eq!(
        s3.secret_access_key.expose_secret().as_str(),
        "substituted-secret"
    );
}

#[test]
fn test_relative_option_paths_follow_config_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("chartex.toml");
    std::fs::write(
        &config_path,
        "[export.options]\nchartConfig = { path = \"charts/sales.json\" }\n",
    )
    .unwrap();

    let config = load_config(&config_path).unwrap();

    assert_eq!(
        config.export.options.get("chartConfig"),
        Some(&OptionValue::Path(dir.path().join("charts/sales.json")))
    );
}

#[test]
fn test_missing_destination_section_fails_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[destination]\nkind = \"ftp\"\n");
    let err = load_config(file.path()).unwrap_err();

    assert!(err.to_string().contains("ftp configuration is required"));
}

#[test]
fn test_missing_file() {
    let err = load_config("/nonexistent/chartex.toml").unwrap_err();
    assert!(err.to_string().contains("Configuration file not found"));
}
