//! Error types for the sealer subsystem

use thiserror::Error;

/// Result type alias for sealing operations
pub type Result<T> = std::result::Result<T, SealerError>;

/// Errors that can occur while sealing
#[derive(Debug, Error)]
pub enum SealerError {
    /// Every `u64` nonce was tried without meeting the target
    #[error("Nonce space exhausted after {attempts} attempts")]
    NonceSpaceExhausted {
        /// Hashes computed
        attempts: u64,
    },

    /// The blocking search task panicked or was aborted
    #[error("Sealing task failed: {0}")]
    TaskFailed(String),
}
