//! Hashing utilities
//!
//! Provides the canonical byte layouts hashed for update records and blocks.
//! All integers are little-endian.
//!
//! ## Block preimage
//!
//! ```text
//! producer_id (u32) | predecessor_hash (32) | seal_nonce (u64) | timestamp (u64) | update_set_digest (32)
//! ```
//!
//! The update set digest is SHA-256 over the update count followed by
//! `(origin_id, update_digest)` pairs sorted by origin, so the block hash does
//! not depend on the order in which updates were assembled.

use crate::entities::{Hash, MinerId, UpdateRecord};
use crate::errors::TypesError;
use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of data
#[inline]
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    finalize(hasher)
}

fn finalize(hasher: Sha256) -> Hash {
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Commitment over every field of an update record.
pub fn update_digest(record: &UpdateRecord) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(record.origin_id.0.to_le_bytes());
    hasher.update(record.sample_weight.to_le_bytes());
    hasher.update(record.computation_time.as_secs().to_le_bytes());
    hasher.update(record.computation_time.subsec_nanos().to_le_bytes());
    hasher.update((record.payload.len() as u64).to_le_bytes());
    hasher.update(&record.payload);
    finalize(hasher)
}

/// Order-independent digest of a block's update set.
///
/// Computed once per sealing search so that each nonce attempt hashes a
/// fixed-size preimage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateSetDigest(Hash);

impl UpdateSetDigest {
    /// Digest the given updates.
    pub fn of(updates: &[UpdateRecord]) -> Self {
        let mut entries: Vec<(u32, Hash)> = updates
            .iter()
            .map(|u| (u.origin_id.0, u.digest()))
            .collect();
        entries.sort_unstable();

        let mut hasher = Sha256::new();
        hasher.update((entries.len() as u64).to_le_bytes());
        for (origin, digest) in &entries {
            hasher.update(origin.to_le_bytes());
            hasher.update(digest);
        }
        Self(finalize(hasher))
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }
}

/// Compute a block content hash from its hashed fields.
#[inline]
pub fn content_hash(
    producer_id: MinerId,
    predecessor_hash: &Hash,
    seal_nonce: u64,
    timestamp: u64,
    updates: &UpdateSetDigest,
) -> Hash {
    let mut preimage = [0u8; 4 + 32 + 8 + 8 + 32];
    preimage[..4].copy_from_slice(&producer_id.0.to_le_bytes());
    preimage[4..36].copy_from_slice(predecessor_hash);
    preimage[36..44].copy_from_slice(&seal_nonce.to_le_bytes());
    preimage[44..52].copy_from_slice(&timestamp.to_le_bytes());
    preimage[52..].copy_from_slice(updates.as_bytes());
    sha256(&preimage)
}

/// Hex helpers for hashes.
pub trait HashHex {
    /// Full lowercase hex encoding.
    fn to_hex(&self) -> String;
}

impl HashHex for Hash {
    fn to_hex(&self) -> String {
        hex::encode(self)
    }
}

/// First 8 hex characters of a hash, for log lines.
pub fn short_hex(hash: &Hash) -> String {
    hex::encode(&hash[..4])
}

/// Parse a 64-character hex string into a hash.
pub fn parse_hash(s: &str) -> Result<Hash, TypesError> {
    let bytes = hex::decode(s).map_err(|_| TypesError::InvalidHashHex(s.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| TypesError::InvalidHashHex(s.to_string()))
}
