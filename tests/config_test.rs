use mezmo_log_exporter::app::{Config, ConfigError, LogFormat, LogLevel};
use mezmo_log_exporter::buffer::DEFAULT_MAX_BODY_SIZE;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

const ENV_VARS: &[&str] = &[
    "MEZMO_INGEST_URL",
    "MEZMO_INGEST_KEY",
    "MEZMO_COMPRESSION",
    "MEZMO_TIMEOUT_SECS",
    "MEZMO_MAX_BODY_SIZE",
    "MEZMO_APP_NAME",
    "MEZMO_HOSTNAME",
    "MEZMO_LINES_PER_PUSH",
    "LOG_LEVEL",
    "LOG_FORMAT",
    "CONFIG_FILE",
];

fn clean_all_env_vars() {
    for var in ENV_VARS {
        unsafe {
            env::remove_var(var);
        }
    }
}

#[test]
#[serial]
fn test_config_from_args() {
    clean_all_env_vars();

    let args = [
        "mezmo-log-exporter",
        "--ingest-url",
        "http://localhost:8080/otel/ingest/rest",
        "--ingest-key",
        "abc123",
        "--compression",
        "--max-body-size",
        "65536",
        "--log-level",
        "debug",
        "--log-format",
        "json",
        "--app-name",
        "billing",
    ];

    let config = Config::load(args).unwrap();

    assert_eq!(config.ingest_url, "http://localhost:8080/otel/ingest/rest");
    assert_eq!(config.ingest_key.expose(), "abc123");
    assert!(config.compression);
    assert_eq!(config.max_body_size, 65536);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_format, LogFormat::Json);
    assert_eq!(config.app_name.as_deref(), Some("billing"));
    assert_eq!(config.timeout(), Duration::from_secs(5));
}

#[test]
#[serial]
fn test_config_from_environment() {
    clean_all_env_vars();

    unsafe {
        env::set_var("MEZMO_INGEST_URL", "https://ingest.test/otel/ingest/rest");
        env::set_var("MEZMO_INGEST_KEY", "env-key");
        env::set_var("MEZMO_TIMEOUT_SECS", "12");
        env::set_var("MEZMO_LINES_PER_PUSH", "250");
        env::set_var("LOG_LEVEL", "warn");
    }

    let config = Config::load(["mezmo-log-exporter"]).unwrap();

    assert_eq!(config.ingest_url, "https://ingest.test/otel/ingest/rest");
    assert_eq!(config.ingest_key.expose(), "env-key");
    assert_eq!(config.timeout_secs, 12);
    assert_eq!(config.lines_per_push, 250);
    assert_eq!(config.log_level, LogLevel::Warn);
    assert!(!config.compression);
    assert_eq!(config.max_body_size, DEFAULT_MAX_BODY_SIZE);

    clean_all_env_vars();
}

#[test]
#[serial]
fn test_missing_key_rejected() {
    clean_all_env_vars();

    let result = Config::load(["mezmo-log-exporter"]);
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
#[serial]
fn test_config_file_replaces_arguments() {
    clean_all_env_vars();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
ingest_url = "https://file.test/otel/ingest/rest"
ingest_key = "file-key"
compression = true
max_message_size = 2048
log_level = "trace"
hostname = "file-host"
"#
    )
    .unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let config = Config::load([
        "mezmo-log-exporter",
        "--ingest-key",
        "ignored",
        "--config-file",
        path.as_str(),
    ])
    .unwrap();

    assert_eq!(config.ingest_url, "https://file.test/otel/ingest/rest");
    assert_eq!(config.ingest_key.expose(), "file-key");
    assert!(config.compression);
    assert_eq!(config.max_message_size, 2048);
    assert_eq!(config.log_level, LogLevel::Trace);
    assert_eq!(config.hostname.as_deref(), Some("file-host"));
    // Unset keys fall back to defaults
    assert_eq!(config.max_level_len, 80);
    assert_eq!(config.lines_per_push, 1000);
}

#[test]
fn test_invalid_toml_reported() {
    let result = Config::from_toml("ingest_key = [");
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn test_missing_file_reported() {
    let result = Config::from_file("/nonexistent/mezmo-log-exporter.toml");
    assert!(matches!(result, Err(ConfigError::FileError(_))));
}

#[test]
fn test_exporter_settings_from_config() {
    let config = Config::from_toml(
        r#"
ingest_url = "http://localhost:9000/otel/ingest/rest"
ingest_key = "settings-key"
max_body_size = 4096
max_app_name_len = 64
timeout_secs = 3
"#,
    )
    .unwrap();

    let settings = config.exporter_settings().unwrap();

    assert_eq!(settings.sender.ingest_url.path(), "/otel/ingest/rest");
    assert_eq!(settings.sender.ingest_key, "settings-key");
    assert_eq!(settings.sender.build_version, mezmo_log_exporter::VERSION);
    assert_eq!(settings.max_body_size, 4096);
    assert_eq!(settings.limits.max_app_name_len, 64);
    assert_eq!(settings.client.timeout, Duration::from_secs(3));
}

#[test]
fn test_debug_output_hides_key() {
    let config = Config::from_toml(
        r#"
ingest_url = "http://localhost:9000/otel/ingest/rest"
ingest_key = "super-secret"
"#,
    )
    .unwrap();

    let rendered = format!("{config:?}");
    assert!(!rendered.contains("super-secret"));
    let settings = format!("{:?}", config.exporter_settings().unwrap());
    assert!(!settings.contains("super-secret"));
}
