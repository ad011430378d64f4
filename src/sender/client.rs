use crate::domain::ExportError;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connection_timeout: Duration,
    pub max_idle_connections: usize,
    pub idle_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            connection_timeout: Duration::from_secs(5),
            max_idle_connections: 10,
            idle_timeout: Duration::from_secs(90),
        }
    }
}

/// Builds the HTTP client shared by every send.
///
/// The user agent is set per request by the sender, not here, so a host that
/// supplies its own client still gets the exporter's headers.
pub fn build_client(config: &ClientConfig) -> Result<Client, ExportError> {
    ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(config.connection_timeout)
        .pool_max_idle_per_host(config.max_idle_connections)
        .pool_idle_timeout(config.idle_timeout)
        .build()
        .map_err(ExportError::ClientBuild)
}
