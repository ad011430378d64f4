pub mod client;
pub mod compression;
pub mod outcome;
pub mod transmission;

pub use client::{ClientConfig, build_client};
pub use compression::gzip_into;
pub use outcome::TransportOutcome;
pub use transmission::{HttpSender, SenderSettings, user_agent};

/// Destination for finished batch documents.
///
/// The assembler awaits one `send_chunk` per closed document, in order, and
/// stops at the first `TransportOutcome::Failed`.
pub trait ChunkSink: Send + Sync {
    fn send_chunk(&self, document: &[u8]) -> impl Future<Output = TransportOutcome> + Send;
}
