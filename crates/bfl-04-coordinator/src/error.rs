//! Error types for the coordinator subsystem

use thiserror::Error;

/// Result type alias for coordinator operations
pub type Result<T> = std::result::Result<T, CoordinatorError>;

/// Infrastructure failures around the ledger.
///
/// Ledger outcomes themselves (orphaned, duplicate, invalid) are never errors.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The coordinator task is gone
    #[error("Coordinator service stopped")]
    ServiceStopped,

    /// Writing the canonical chain failed
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

/// Errors reading or writing the persisted chain.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record has a field that cannot be decoded
    #[error("Record {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    /// A record does not link to the previous one
    #[error("Record {index} does not extend the previous record")]
    BrokenLink { index: usize },

    /// The blocking write task panicked or was cancelled
    #[error("Export task failed: {0}")]
    TaskFailed(String),

    /// The export holds no records at all
    #[error("Chain export is empty")]
    Empty,
}
