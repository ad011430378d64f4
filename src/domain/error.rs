use thiserror::Error;

/// Top-level error type for a push.
///
/// Remote rejections (HTTP status >= 400) are not errors. They surface as
/// `TransportOutcome::Sent { rejected: true, .. }` plus a log line.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("error creating JSON payload: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("failed to compress log data: {0}")]
    Compression(#[source] std::io::Error),

    #[error("failed to POST log data: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("encoded line of {size} bytes cannot fit in a body of at most {max_body_size} bytes")]
    OversizedLine { size: usize, max_body_size: usize },

    #[error("invalid header value for {name}: {reason}")]
    InvalidHeader { name: &'static str, reason: String },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("exporter is not started")]
    NotStarted,
}
