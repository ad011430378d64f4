use super::compression::gzip_into;
use super::{ChunkSink, TransportOutcome};
use crate::buffer::BufferPool;
use crate::domain::ExportError;
use bytes::Bytes;
use reqwest::Client;
use reqwest::header::{
    ACCEPT, CONTENT_ENCODING, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT,
};
use std::sync::Arc;
use tracing::{Level, debug, error};
use url::Url;

const API_KEY_HEADER: HeaderName = HeaderName::from_static("apikey");

pub fn user_agent(build_version: &str) -> String {
    format!("mezmo-otel-exporter/{build_version}")
}

#[derive(Clone)]
pub struct SenderSettings {
    pub ingest_url: Url,
    pub ingest_key: String,
    pub compression: bool,
    pub build_version: String,
}

impl std::fmt::Debug for SenderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SenderSettings")
            .field("ingest_url", &self.ingest_url.as_str())
            .field("ingest_key", &"[REDACTED]")
            .field("compression", &self.compression)
            .field("build_version", &self.build_version)
            .finish()
    }
}

/// Posts finished documents to the ingestion endpoint.
///
/// One request per document, no retries. Cloning is cheap: the client,
/// headers and pool are shared.
#[derive(Clone)]
pub struct HttpSender {
    client: Client,
    ingest_url: Url,
    headers: HeaderMap,
    compression: bool,
    pool: Arc<BufferPool>,
}

impl HttpSender {
    pub fn new(
        client: Client,
        settings: SenderSettings,
        pool: Arc<BufferPool>,
    ) -> Result<Self, ExportError> {
        let headers = build_headers(&settings)?;

        Ok(Self {
            client,
            ingest_url: settings.ingest_url,
            headers,
            compression: settings.compression,
            pool,
        })
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub async fn send(&self, document: &[u8]) -> TransportOutcome {
        let mut headers = self.headers.clone();
        let body = if self.compression {
            let mut compressed = self.pool.acquire();
            compressed.clear();
            if let Err(e) = gzip_into(document, &mut compressed) {
                return TransportOutcome::Failed(ExportError::Compression(e));
            }
            headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
            Bytes::copy_from_slice(&compressed)
        } else {
            Bytes::copy_from_slice(document)
        };

        debug!(
            url = %self.ingest_url,
            bytes = document.len(),
            body_bytes = body.len(),
            compressed = self.compression,
            "Sending log document"
        );

        let response = match self
            .client
            .post(self.ingest_url.clone())
            .headers(headers)
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return TransportOutcome::Failed(ExportError::Transport(e)),
        };

        let outcome = TransportOutcome::sent(response.status());
        if outcome.is_rejected() {
            error!(
                "got http status ({}): {}",
                self.ingest_url.path(),
                response.status()
            );
            if tracing::enabled!(Level::DEBUG) {
                let body = response.text().await.unwrap_or_default();
                debug!(response = %body, "http response");
            }
        }
        // Dropping the response releases the connection back to the pool

        outcome
    }
}

impl ChunkSink for HttpSender {
    async fn send_chunk(&self, document: &[u8]) -> TransportOutcome {
        self.send(document).await
    }
}

impl std::fmt::Debug for HttpSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSender")
            .field("ingest_url", &self.ingest_url.as_str())
            .field("compression", &self.compression)
            .finish_non_exhaustive()
    }
}

fn build_headers(settings: &SenderSettings) -> Result<HeaderMap, ExportError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&user_agent(&settings.build_version)).map_err(|e| {
            ExportError::InvalidHeader {
                name: "user-agent",
                reason: e.to_string(),
            }
        })?,
    );

    let mut api_key =
        HeaderValue::from_str(&settings.ingest_key).map_err(|e| ExportError::InvalidHeader {
            name: "apikey",
            reason: e.to_string(),
        })?;
    api_key.set_sensitive(true);
    headers.insert(API_KEY_HEADER, api_key);

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_settings() -> SenderSettings {
        SenderSettings {
            ingest_url: "https://logs.example.com/otel/ingest/rest".parse().unwrap(),
            ingest_key: "secret-key".to_string(),
            compression: false,
            build_version: "1.2.3".to_string(),
        }
    }

    #[test]
    fn test_headers() {
        let headers = build_headers(&create_test_settings()).unwrap();

        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[USER_AGENT], "mezmo-otel-exporter/1.2.3");
        assert_eq!(headers["apikey"], "secret-key");
        assert!(headers["apikey"].is_sensitive());
        assert!(!headers.contains_key(CONTENT_ENCODING));
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let settings = SenderSettings {
            ingest_key: "bad\nkey".to_string(),
            ..create_test_settings()
        };

        match build_headers(&settings) {
            Err(ExportError::InvalidHeader { name, .. }) => assert_eq!(name, "apikey"),
            other => panic!("Expected InvalidHeader, got: {other:?}"),
        }
    }

    #[test]
    fn test_settings_debug_redacts_key() {
        let rendered = format!("{:?}", create_test_settings());
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
