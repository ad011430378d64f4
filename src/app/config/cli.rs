use super::{ConfigError, IngestKey, LogFormat, LogLevel};
use crate::app::exporter::ExporterSettings;
use crate::buffer::{DEFAULT_MAX_BODY_SIZE, PoolConfig};
use crate::normalizer::FieldLimits;
use crate::sender::{ClientConfig, SenderSettings};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_INGEST_URL: &str = "https://logs.mezmo.com/otel/ingest/rest";
/// Smallest accepted body ceiling; below this even short lines stop fitting.
pub const MIN_BODY_SIZE: usize = 1024;

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
#[serde(default)]
pub struct Config {
    /// Log ingestion endpoint URL
    #[arg(long, env = "MEZMO_INGEST_URL", default_value = DEFAULT_INGEST_URL)]
    pub ingest_url: String,

    /// Ingestion API key, sent in the `apikey` header
    #[arg(long, env = "MEZMO_INGEST_KEY", default_value = "", hide_env_values = true)]
    pub ingest_key: IngestKey,

    /// Gzip-compress request bodies
    #[arg(long, env = "MEZMO_COMPRESSION")]
    pub compression: bool,

    /// Request timeout in seconds
    #[arg(long, env = "MEZMO_TIMEOUT_SECS", default_value = "5")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[arg(long, env = "MEZMO_CONNECTION_TIMEOUT_SECS", default_value = "5")]
    pub connection_timeout_secs: u64,

    /// Maximum idle HTTP connections kept per host
    #[arg(long, env = "MEZMO_MAX_IDLE_CONNECTIONS", default_value = "10")]
    pub max_idle_connections: usize,

    /// Idle connection timeout in seconds
    #[arg(long, env = "MEZMO_IDLE_TIMEOUT_SECS", default_value = "90")]
    pub idle_timeout_secs: u64,

    /// Maximum uncompressed request body in bytes
    #[arg(long, env = "MEZMO_MAX_BODY_SIZE", default_value_t = DEFAULT_MAX_BODY_SIZE)]
    pub max_body_size: usize,

    /// Maximum log message length in bytes
    #[arg(long, env = "MEZMO_MAX_MESSAGE_SIZE", default_value = "16384")]
    pub max_message_size: usize,

    /// Maximum length of each meta value in bytes
    #[arg(long, env = "MEZMO_MAX_META_VALUE_SIZE", default_value = "32768")]
    pub max_meta_value_size: usize,

    /// Maximum app name length in bytes
    #[arg(long, env = "MEZMO_MAX_APP_NAME_LEN", default_value = "512")]
    pub max_app_name_len: usize,

    /// Maximum level length in bytes
    #[arg(long, env = "MEZMO_MAX_LEVEL_LEN", default_value = "80")]
    pub max_level_len: usize,

    /// Log level of the exporter's own diagnostics
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Format of the exporter's own diagnostics
    #[arg(long, env = "LOG_FORMAT", default_value = "compact")]
    pub log_format: LogFormat,

    /// App name attached to every shipped line
    #[arg(long, env = "MEZMO_APP_NAME")]
    pub app_name: Option<String>,

    /// Host name reported for shipped lines (detected if not provided)
    #[arg(long, env = "MEZMO_HOSTNAME")]
    pub hostname: Option<String>,

    /// Lines collected from stdin before a push
    #[arg(long, env = "MEZMO_LINES_PER_PUSH", default_value = "1000")]
    pub lines_per_push: usize,

    /// Push pending stdin lines at least this often, in milliseconds
    #[arg(long, env = "MEZMO_FLUSH_INTERVAL_MS", default_value = "1000")]
    pub flush_interval_ms: u64,

    /// Configuration file path (optional, replaces all other settings)
    #[arg(long, env = "CONFIG_FILE")]
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let limits = FieldLimits::default();
        Self {
            ingest_url: DEFAULT_INGEST_URL.to_string(),
            ingest_key: IngestKey::default(),
            compression: false,
            timeout_secs: 5,
            connection_timeout_secs: 5,
            max_idle_connections: 10,
            idle_timeout_secs: 90,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_message_size: limits.max_message_size,
            max_meta_value_size: limits.max_meta_value_size,
            max_app_name_len: limits.max_app_name_len,
            max_level_len: limits.max_level_len,
            log_level: LogLevel::Info,
            log_format: LogFormat::Compact,
            app_name: None,
            hostname: None,
            lines_per_push: 1000,
            flush_interval_ms: 1000,
            config_file: None,
        }
    }
}

impl Config {
    /// Parses CLI arguments (and their environment fallbacks), swaps in the
    /// config file when one is named, and validates the result.
    pub fn load<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Config::parse_from(args);
        match &config.config_file {
            Some(path) => Self::from_file(path),
            None => {
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    pub fn field_limits(&self) -> FieldLimits {
        FieldLimits {
            max_message_size: self.max_message_size,
            max_meta_value_size: self.max_meta_value_size,
            max_app_name_len: self.max_app_name_len,
            max_level_len: self.max_level_len,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: self.timeout(),
            connection_timeout: Duration::from_secs(self.connection_timeout_secs),
            max_idle_connections: self.max_idle_connections,
            idle_timeout: Duration::from_secs(self.idle_timeout_secs),
        }
    }

    pub fn exporter_settings(&self) -> Result<ExporterSettings, ConfigError> {
        let ingest_url = Url::parse(&self.ingest_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid ingest URL '{}': {}", self.ingest_url, e))
        })?;

        Ok(ExporterSettings {
            sender: SenderSettings {
                ingest_url,
                ingest_key: self.ingest_key.expose().to_string(),
                compression: self.compression,
                build_version: crate::VERSION.to_string(),
            },
            client: self.client_config(),
            limits: self.field_limits(),
            max_body_size: self.max_body_size,
            pool: PoolConfig::default(),
        })
    }
}
