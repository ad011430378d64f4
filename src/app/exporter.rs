use crate::buffer::{BatchAssembler, BufferPool, DEFAULT_MAX_BODY_SIZE, PoolConfig};
use crate::domain::{ExportError, PushSummary};
use crate::normalizer::{FieldLimits, RecordNormalizer, record_count};
use crate::sender::{ClientConfig, HttpSender, SenderSettings, build_client};
use opentelemetry_proto::tonic::logs::v1::ResourceLogs;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ExporterSettings {
    pub sender: SenderSettings,
    pub client: ClientConfig,
    pub limits: FieldLimits,
    pub max_body_size: usize,
    pub pool: PoolConfig,
}

impl ExporterSettings {
    pub fn new(sender: SenderSettings) -> Self {
        Self {
            sender,
            client: ClientConfig::default(),
            limits: FieldLimits::default(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            pool: PoolConfig::default(),
        }
    }
}

/// Ships OTLP log batches to the ingestion endpoint.
///
/// Lifecycle is `start` → any number of concurrent `push` calls → `stop`.
/// `stop` waits for pushes already in flight before dropping the HTTP client,
/// which closes its idle connections.
pub struct LogExporter {
    settings: ExporterSettings,
    normalizer: RecordNormalizer,
    assembler: BatchAssembler,
    pool: Arc<BufferPool>,
    sender: RwLock<Option<HttpSender>>,
    in_flight: TaskTracker,
}

impl LogExporter {
    pub fn new(settings: ExporterSettings) -> Self {
        let pool = Arc::new(BufferPool::new(settings.pool.clone()));

        Self {
            normalizer: RecordNormalizer::new(settings.limits),
            assembler: BatchAssembler::new(settings.max_body_size, Arc::clone(&pool)),
            pool,
            sender: RwLock::new(None),
            in_flight: TaskTracker::new(),
            settings,
        }
    }

    /// Builds an HTTP client from the settings and starts the exporter.
    pub fn start(&self) -> Result<(), ExportError> {
        let client = build_client(&self.settings.client)?;
        self.start_with_client(client)
    }

    /// Starts the exporter on a client supplied by the host.
    pub fn start_with_client(&self, client: reqwest::Client) -> Result<(), ExportError> {
        let sender = HttpSender::new(client, self.settings.sender.clone(), Arc::clone(&self.pool))?;
        *self.sender.write() = Some(sender);
        self.in_flight.reopen();

        info!(
            ingest_url = %self.settings.sender.ingest_url,
            compression = self.settings.sender.compression,
            max_body_size = self.settings.max_body_size,
            "Log exporter started"
        );
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.sender.read().is_some()
    }

    /// Normalizes, chunks and sends every record in `resource_logs`.
    ///
    /// Returns once all chunks were sent or the first one failed. Endpoint
    /// rejections are counted in the summary, not returned as errors.
    pub async fn push(&self, resource_logs: &[ResourceLogs]) -> Result<PushSummary, ExportError> {
        let _token = self.in_flight.token();
        let sender = self.sender.read().clone().ok_or(ExportError::NotStarted)?;

        let span = info_span!(
            "push",
            push_id = %Uuid::new_v4(),
            records = record_count(resource_logs)
        );

        async move {
            let lines = self.normalizer.lines(resource_logs);
            let summary = self.assembler.assemble(lines, &sender).await?;

            if summary.all_accepted() {
                debug!(
                    lines = summary.lines,
                    chunks = summary.chunks,
                    bytes = summary.bytes,
                    "Push completed"
                );
            } else {
                warn!(
                    lines = summary.lines,
                    chunks = summary.chunks,
                    rejected_chunks = summary.rejected_chunks,
                    "Push completed with rejected chunks"
                );
            }
            Ok(summary)
        }
        .instrument(span)
        .await
    }

    /// Waits for in-flight pushes, then releases the HTTP client.
    ///
    /// A no-op when the exporter was never started.
    pub async fn stop(&self) {
        if !self.is_started() {
            return;
        }

        self.in_flight.close();
        debug!(in_flight = self.in_flight.len(), "Waiting for in-flight pushes");
        self.in_flight.wait().await;

        self.sender.write().take();
        info!("Log exporter stopped");
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }
}

impl std::fmt::Debug for LogExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogExporter")
            .field("settings", &self.settings)
            .field("started", &self.is_started())
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}
