use super::config::Config;
use super::exporter::LogExporter;
use crate::normalizer::{APP_NAME_ATTRIBUTE, HOST_NAME_ATTRIBUTE};
use opentelemetry_proto::tonic::common::v1::{AnyValue, InstrumentationScope, KeyValue, any_value};
use opentelemetry_proto::tonic::logs::v1::{LogRecord, ResourceLogs, ScopeLogs};
use opentelemetry_proto::tonic::resource::v1::Resource;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

const SCOPE_NAME: &str = "mezmo-log-exporter";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShipperStats {
    pub pushes: usize,
    pub failed_pushes: usize,
    pub lines_read: usize,
    pub lines_sent: usize,
}

/// Turns stdin lines into log records and pushes them in groups.
pub struct StdinShipper {
    exporter: Arc<LogExporter>,
    resource: Resource,
    app_name: Option<String>,
    lines_per_push: usize,
    flush_interval: Duration,
}

impl StdinShipper {
    pub fn new(config: &Config, exporter: Arc<LogExporter>) -> Self {
        let host_name = config.hostname.clone().or_else(detect_hostname);

        let resource = Resource {
            attributes: host_name
                .iter()
                .map(|name| string_kv(HOST_NAME_ATTRIBUTE, name))
                .collect(),
            ..Default::default()
        };

        Self {
            exporter,
            resource,
            app_name: config.app_name.clone(),
            lines_per_push: config.lines_per_push.max(1),
            flush_interval: config.flush_interval(),
        }
    }

    pub fn record_for(&self, line: String) -> LogRecord {
        let time_unix_nano = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);

        LogRecord {
            time_unix_nano,
            observed_time_unix_nano: time_unix_nano,
            body: Some(AnyValue {
                value: Some(any_value::Value::StringValue(line)),
            }),
            attributes: self
                .app_name
                .iter()
                .map(|app| string_kv(APP_NAME_ATTRIBUTE, app))
                .collect(),
            ..Default::default()
        }
    }

    /// Reads until EOF or cancellation, pushing whenever `lines_per_push`
    /// lines are pending or the flush interval elapses. Pending lines are
    /// pushed before returning.
    pub async fn run<R>(&self, reader: R, shutdown: CancellationToken) -> ShipperStats
    where
        R: AsyncBufRead + Unpin,
    {
        let mut stats = ShipperStats::default();
        let mut lines = reader.lines();
        let mut pending = Vec::with_capacity(self.lines_per_push);

        let start = tokio::time::Instant::now() + self.flush_interval;
        let mut ticker = tokio::time::interval_at(start, self.flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    debug!("Shutdown requested, stopping stdin reader");
                    break;
                }
                _ = ticker.tick() => {
                    if !pending.is_empty() {
                        self.flush(&mut pending, &mut stats).await;
                    }
                }
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        stats.lines_read += 1;
                        pending.push(self.record_for(line));
                        if pending.len() >= self.lines_per_push {
                            self.flush(&mut pending, &mut stats).await;
                        }
                    }
                    Ok(None) => {
                        debug!("Reached end of input");
                        break;
                    }
                    Err(e) => {
                        error!("Failed to read from input: {}", e);
                        break;
                    }
                },
            }
        }

        if !pending.is_empty() {
            self.flush(&mut pending, &mut stats).await;
        }

        stats
    }

    async fn flush(&self, pending: &mut Vec<LogRecord>, stats: &mut ShipperStats) {
        let count = pending.len();
        let resource_logs = [ResourceLogs {
            resource: Some(self.resource.clone()),
            scope_logs: vec![ScopeLogs {
                scope: Some(InstrumentationScope {
                    name: SCOPE_NAME.to_string(),
                    version: crate::VERSION.to_string(),
                    ..Default::default()
                }),
                log_records: std::mem::take(pending),
                schema_url: String::new(),
            }],
            schema_url: String::new(),
        }];

        stats.pushes += 1;
        match self.exporter.push(&resource_logs).await {
            Ok(summary) => stats.lines_sent += summary.lines,
            Err(e) => {
                // No retry: the lines are dropped and reading continues
                stats.failed_pushes += 1;
                warn!("Failed to push {} lines: {}", count, e);
            }
        }
    }
}

fn detect_hostname() -> Option<String> {
    match hostname::get() {
        Ok(name) => Some(name.to_string_lossy().into_owned()),
        Err(e) => {
            warn!("Could not detect hostname: {}", e);
            None
        }
    }
}

fn string_kv(key: &str, value: &str) -> KeyValue {
    KeyValue {
        key: key.to_string(),
        value: Some(AnyValue {
            value: Some(any_value::Value::StringValue(value.to_string())),
        }),
    }
}
