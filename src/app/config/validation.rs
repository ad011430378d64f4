use super::{Config, ConfigError, MIN_BODY_SIZE};
use url::Url;

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate ingest URL
        let url = Url::parse(&self.ingest_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid ingest URL '{}': {}", self.ingest_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "Ingest URL '{}' must use http or https",
                self.ingest_url
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(ConfigError::InvalidUrl(format!(
                "Ingest URL '{}' must contain a valid host",
                self.ingest_url
            )));
        }

        if self.ingest_key.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "Ingest key must be set".to_string(),
            ));
        }

        // Validate timeouts
        if self.timeout_secs == 0 || self.connection_timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "Timeouts must be greater than 0".to_string(),
            ));
        }

        if self.max_body_size < MIN_BODY_SIZE {
            return Err(ConfigError::InvalidConfig(format!(
                "Max body size ({}) must be at least {} bytes",
                self.max_body_size, MIN_BODY_SIZE
            )));
        }

        let limits = [
            ("max_message_size", self.max_message_size),
            ("max_meta_value_size", self.max_meta_value_size),
            ("max_app_name_len", self.max_app_name_len),
            ("max_level_len", self.max_level_len),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(ConfigError::InvalidConfig(format!(
                    "{name} must be greater than 0"
                )));
            }
        }

        if self.lines_per_push == 0 {
            return Err(ConfigError::InvalidConfig(
                "Lines per push must be greater than 0".to_string(),
            ));
        }

        if self.flush_interval_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "Flush interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
