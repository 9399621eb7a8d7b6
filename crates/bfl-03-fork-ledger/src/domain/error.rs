//! Block validity errors.
//!
//! These never propagate out of the ledger as `Err`; an invalid block is
//! reported through [`AddOutcome::Invalid`](super::AddOutcome::Invalid) and
//! dropped.

use shared_types::{short_hex, ClientId, Hash};

/// Why a submitted block was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidBlock {
    #[error("content hash mismatch: stored {}, computed {}", short_hex(.stored), short_hex(.computed))]
    HashMismatch { stored: Hash, computed: Hash },

    #[error("block {} does not satisfy difficulty '{prefix}'", short_hex(.hash))]
    Unsealed { hash: Hash, prefix: String },

    #[error("client {origin} appears more than once in block {}", short_hex(.hash))]
    DuplicateOrigin { hash: Hash, origin: ClientId },

    #[error("client {origin} carries zero sample weight in block {}", short_hex(.hash))]
    ZeroWeight { hash: Hash, origin: ClientId },
}
