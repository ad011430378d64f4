use crate::domain::ExportError;
use reqwest::StatusCode;

/// Result of handing one document to the transport.
///
/// `Sent` means the HTTP exchange completed, whatever the status code; an
/// endpoint answering >= 400 is `Sent { rejected: true, .. }`. `Failed` covers
/// everything that prevented the exchange: compression, connection, DNS, TLS
/// or timeout errors.
#[derive(Debug)]
pub enum TransportOutcome {
    Sent { status: StatusCode, rejected: bool },
    Failed(ExportError),
}

impl TransportOutcome {
    pub fn sent(status: StatusCode) -> Self {
        Self::Sent {
            status,
            rejected: status.as_u16() >= 400,
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Sent { rejected: true, .. })
    }

    pub fn into_result(self) -> Result<StatusCode, ExportError> {
        match self {
            Self::Sent { status, .. } => Ok(status),
            Self::Failed(err) => Err(err),
        }
    }
}
