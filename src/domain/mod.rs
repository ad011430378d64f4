//! Domain layer for mezmo-log-exporter.
//!
//! Contains the canonical types shared across all modules:
//! - `NormalizedLine`: The wire-ready line shape
//! - `Meta`: Truncating attribute map carried by each line
//! - `PushSummary`: What a push actually delivered
//! - `ExportError`: Top-level error type

pub mod error;
pub mod log_line;
pub mod summary;

pub use error::ExportError;
pub use log_line::{Meta, NormalizedLine};
pub use summary::PushSummary;
