pub mod config;
pub mod exporter;
pub mod logging_system;
pub mod shutdown;
pub mod stdin;

pub use config::{Config, ConfigError, IngestKey, LogFormat, LogLevel};
pub use exporter::{ExporterSettings, LogExporter};
pub use logging_system::{InitializationError, init_tracing};
pub use stdin::{ShipperStats, StdinShipper};

use std::sync::Arc;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::info;

// Main entry point for the application
pub async fn main() -> anyhow::Result<()> {
    let config = Config::load(std::env::args_os())?;
    init_tracing(config.log_level, config.log_format)?;

    info!("Starting mezmo-log-exporter v{}", crate::VERSION);
    info!(
        "Configuration: ingest_url={}, compression={}, max_body_size={}, lines_per_push={}",
        config.ingest_url, config.compression, config.max_body_size, config.lines_per_push
    );

    let exporter = Arc::new(LogExporter::new(config.exporter_settings()?));
    exporter.start()?;

    let shutdown = CancellationToken::new();
    let signals = shutdown::spawn_signal_listener(shutdown.clone());

    let shipper = StdinShipper::new(&config, Arc::clone(&exporter));
    let stats = shipper
        .run(BufReader::new(tokio::io::stdin()), shutdown)
        .await;

    exporter.stop().await;
    signals.abort();

    info!(
        "mezmo-log-exporter stopped: {} lines read, {} sent in {} pushes ({} failed)",
        stats.lines_read, stats.lines_sent, stats.pushes, stats.failed_pushes
    );
    Ok(())
}
