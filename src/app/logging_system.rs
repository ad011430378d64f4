use super::config::{LogFormat, LogLevel};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Error, Debug)]
pub enum InitializationError {
    #[error("Logging initialization failed: {details}")]
    LoggingInitFailed {
        details: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Noisy dependencies kept at warn regardless of the configured level.
const DEFAULT_DIRECTIVES: &[&str] = &["hyper=warn", "hyper_util=warn", "reqwest=warn", "h2=warn"];

pub fn build_filter_string(default_level: LogLevel) -> String {
    let mut filter_parts = Vec::with_capacity(DEFAULT_DIRECTIVES.len() + 1);
    filter_parts.push(default_level.as_str());
    filter_parts.extend_from_slice(DEFAULT_DIRECTIVES);
    filter_parts.join(",")
}

/// Installs the global tracing subscriber for the binary.
///
/// `RUST_LOG`, when set, replaces the configured level entirely.
pub fn init_tracing(level: LogLevel, format: LogFormat) -> Result<(), InitializationError> {
    let env_filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::try_new(&directives),
        Err(_) => EnvFilter::try_new(build_filter_string(level)),
    }
    .map_err(|e| InitializationError::LoggingInitFailed {
        details: "Failed to create EnvFilter".to_string(),
        source: Box::new(e),
    })?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Compact => registry
            .with(fmt::layer().with_target(true).with_level(true).compact())
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
    };

    result.map_err(|e| InitializationError::LoggingInitFailed {
        details: "Failed to set global tracing subscriber".to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_string() {
        assert_eq!(
            build_filter_string(LogLevel::Debug),
            "debug,hyper=warn,hyper_util=warn,reqwest=warn,h2=warn"
        );
    }

    #[test]
    fn test_filter_string_parses() {
        for level in [LogLevel::Error, LogLevel::Info, LogLevel::Trace] {
            assert!(EnvFilter::try_new(build_filter_string(level)).is_ok());
        }
    }
}
