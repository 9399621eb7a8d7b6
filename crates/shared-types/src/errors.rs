//! # Error Types
//!
//! Errors raised while constructing shared domain values.

use crate::entities::ClientId;
use thiserror::Error;

/// Errors from shared type constructors and parsers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// Update records must carry at least one sample.
    #[error("Update from client {origin} has zero sample weight")]
    ZeroSampleWeight { origin: ClientId },

    /// Difficulty prefix cannot be used as a target.
    #[error("Invalid difficulty prefix '{prefix}': {reason}")]
    InvalidDifficulty { prefix: String, reason: String },

    /// Hash string is not 32 bytes of hex.
    #[error("Invalid hash hex: {0}")]
    InvalidHashHex(String),
}
