//! Configuration types for the sealer

use serde::Deserialize;
use shared_types::Difficulty;

/// Runtime configuration for proof-of-work sealing
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SealerConfig {
    /// Hex prefix the content hash must start with
    pub difficulty: Difficulty,

    /// Nonces tried between two polls of the cancellation flag
    pub cancel_check_interval: u64,
}

impl Default for SealerConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            cancel_check_interval: crate::DEFAULT_CANCEL_CHECK_INTERVAL,
        }
    }
}
