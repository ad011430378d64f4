use super::pool::BufferPool;
use crate::domain::{ExportError, NormalizedLine, PushSummary};
use crate::sender::{ChunkSink, TransportOutcome};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DOCUMENT_OPEN: &[u8] = br#"{"lines": ["#;
pub const DOCUMENT_CLOSE: &[u8] = b"]}";

/// Default ceiling on a single uncompressed request body.
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Smallest ceiling that an empty document stays strictly below.
pub const MIN_MAX_BODY_SIZE: usize = DOCUMENT_OPEN.len() + DOCUMENT_CLOSE.len() + 1;

/// Packs normalized lines into `{"lines": [...]}` documents that stay
/// strictly below `max_body_size`, sending each document as soon as the next
/// line would not fit.
#[derive(Debug, Clone)]
pub struct BatchAssembler {
    max_body_size: usize,
    pool: Arc<BufferPool>,
}

impl BatchAssembler {
    /// Values below `MIN_MAX_BODY_SIZE` are raised to it.
    pub fn new(max_body_size: usize, pool: Arc<BufferPool>) -> Self {
        Self {
            max_body_size: max_body_size.max(MIN_MAX_BODY_SIZE),
            pool,
        }
    }

    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }

    /// Assembles and sends every line, in order.
    ///
    /// The last document is always sent, even when it holds no lines. The
    /// first failure stops the push; documents already sent are not
    /// retracted. A line too large for any document aborts the push after
    /// the lines pending ahead of it have been sent.
    pub async fn assemble<I, S>(&self, lines: I, sink: &S) -> Result<PushSummary, ExportError>
    where
        I: IntoIterator<Item = NormalizedLine>,
        S: ChunkSink,
    {
        let mut summary = PushSummary::default();
        let mut document = self.pool.acquire();
        document.clear();
        document.extend_from_slice(DOCUMENT_OPEN);

        let mut encoded = Vec::new();
        let mut lines_in_document = 0usize;
        let limit = self.max_body_size.saturating_sub(DOCUMENT_CLOSE.len());

        for line in lines {
            encoded.clear();
            serde_json::to_writer(&mut encoded, &line)?;

            if DOCUMENT_OPEN.len() + encoded.len() >= limit {
                warn!(
                    size = encoded.len(),
                    max_body_size = self.max_body_size,
                    "Line cannot fit in any document"
                );
                if lines_in_document > 0 {
                    self.flush(&mut document, lines_in_document, sink, &mut summary)
                        .await?;
                }
                return Err(ExportError::OversizedLine {
                    size: encoded.len(),
                    max_body_size: self.max_body_size,
                });
            }

            let separator = usize::from(lines_in_document > 0);
            if document.len() + separator + encoded.len() >= limit {
                self.flush(&mut document, lines_in_document, sink, &mut summary)
                    .await?;
                lines_in_document = 0;
            }

            if lines_in_document > 0 {
                document.push(b',');
            }
            document.extend_from_slice(&encoded);
            lines_in_document += 1;
        }

        self.flush(&mut document, lines_in_document, sink, &mut summary)
            .await?;

        Ok(summary)
    }

    /// Closes the document, sends it, and reopens it empty.
    async fn flush<S: ChunkSink>(
        &self,
        document: &mut Vec<u8>,
        lines: usize,
        sink: &S,
        summary: &mut PushSummary,
    ) -> Result<(), ExportError> {
        document.extend_from_slice(DOCUMENT_CLOSE);
        debug!(lines, bytes = document.len(), "Closing log document");

        match sink.send_chunk(document).await {
            TransportOutcome::Sent { rejected, .. } => {
                summary.record_chunk(lines, document.len(), rejected);
            }
            TransportOutcome::Failed(err) => return Err(err),
        }

        document.clear();
        document.extend_from_slice(DOCUMENT_OPEN);
        Ok(())
    }
}
