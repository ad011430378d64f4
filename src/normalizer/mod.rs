//! Record normalization.
//!
//! Maps OTLP log records, together with their enclosing resource, into the
//! flat `NormalizedLine` shape with every string field bounded. Normalization
//! never fails: oversized input is truncated and absent fields fall back to
//! defaults.

pub mod attributes;
pub mod truncate;

pub use attributes::{encode_id, find_attribute, value_as_string};
pub use truncate::truncate;

use crate::domain::{Meta, NormalizedLine};
use opentelemetry_proto::tonic::logs::v1::{LogRecord, ResourceLogs};
use opentelemetry_proto::tonic::resource::v1::Resource;

/// Resource attribute carrying the originating host.
pub const HOST_NAME_ATTRIBUTE: &str = "host.name";
/// Record attribute carrying the application name.
pub const APP_NAME_ATTRIBUTE: &str = "appname";
pub const DEFAULT_LEVEL: &str = "info";

pub const META_HOSTNAME: &str = "hostname";
pub const META_TRACE_ID: &str = "trace.id";
pub const META_SPAN_ID: &str = "span.id";

/// Byte ceilings applied to each line field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLimits {
    pub max_message_size: usize,
    pub max_meta_value_size: usize,
    pub max_app_name_len: usize,
    pub max_level_len: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            max_message_size: 16 * 1024,
            max_meta_value_size: 32 * 1024,
            max_app_name_len: 512,
            max_level_len: 80,
        }
    }
}

/// Per-resource values shared by every record under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceContext {
    pub host_name: Option<String>,
}

impl ResourceContext {
    pub fn from_resource(resource: Option<&Resource>) -> Self {
        let host_name = resource
            .and_then(|r| find_attribute(&r.attributes, HOST_NAME_ATTRIBUTE))
            .map(|kv| value_as_string(kv.value.as_ref()));

        Self { host_name }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordNormalizer {
    limits: FieldLimits,
}

impl RecordNormalizer {
    pub fn new(limits: FieldLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &FieldLimits {
        &self.limits
    }

    /// Produces exactly one line for `record`.
    pub fn normalize(&self, resource: &ResourceContext, record: &LogRecord) -> NormalizedLine {
        // Resource-derived keys go in first so record attributes can override them
        let mut meta = Meta::with_value_limit(self.limits.max_meta_value_size);
        if let Some(host_name) = &resource.host_name {
            meta.insert(META_HOSTNAME, host_name);
        }
        if let Some(trace_id) = encode_id(&record.trace_id) {
            meta.insert(META_TRACE_ID, &trace_id);
        }
        if let Some(span_id) = encode_id(&record.span_id) {
            meta.insert(META_SPAN_ID, &span_id);
        }
        for kv in &record.attributes {
            meta.insert(kv.key.as_str(), &value_as_string(kv.value.as_ref()));
        }

        let app = find_attribute(&record.attributes, APP_NAME_ATTRIBUTE)
            .map(|kv| value_as_string(kv.value.as_ref()))
            .unwrap_or_default();

        let level = truncate(&record.severity_text, self.limits.max_level_len);
        let level = if level.trim().is_empty() {
            DEFAULT_LEVEL
        } else {
            level
        };

        let body = value_as_string(record.body.as_ref());

        NormalizedLine {
            timestamp: timestamp_millis(record.time_unix_nano),
            line: truncate(&body, self.limits.max_message_size).to_string(),
            app: truncate(&app, self.limits.max_app_name_len).to_string(),
            level: level.to_string(),
            meta,
        }
    }

    /// Lazily normalizes every record in resource → scope → record order.
    pub fn lines<'a>(
        &'a self,
        resource_logs: &'a [ResourceLogs],
    ) -> impl Iterator<Item = NormalizedLine> + Send + 'a {
        resource_logs.iter().flat_map(move |rl| {
            let context = ResourceContext::from_resource(rl.resource.as_ref());
            rl.scope_logs
                .iter()
                .flat_map(|sl| sl.log_records.iter())
                .map(move |record| self.normalize(&context, record))
        })
    }
}

/// Converts an OTLP nanosecond timestamp to milliseconds, substituting the
/// current time for an unset (zero) timestamp.
pub fn timestamp_millis(time_unix_nano: u64) -> i64 {
    if time_unix_nano == 0 {
        return chrono::Utc::now().timestamp_millis();
    }
    (time_unix_nano / 1_000_000) as i64
}

/// Number of records across all resources and scopes.
pub fn record_count(resource_logs: &[ResourceLogs]) -> usize {
    resource_logs
        .iter()
        .flat_map(|rl| rl.scope_logs.iter())
        .map(|sl| sl.log_records.len())
        .sum()
}
