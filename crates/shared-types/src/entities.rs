//! # Core Domain Entities
//!
//! The single block/update schema used by every subsystem.
//!
//! ## Clusters
//!
//! - **Identity**: `ClientId` (update origin), `MinerId` (block producer)
//! - **Payload**: `UpdateRecord`, an opaque weighted update
//! - **Chain**: `Block`, linked by `predecessor_hash`

use crate::errors::TypesError;
use crate::hashing::{self, UpdateSetDigest};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// Predecessor of the genesis block (all-zero sentinel).
pub const ZERO_HASH: Hash = [0u8; 32];

/// Identifier of the entity that submitted an update (one per round).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u32);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a miner (block producer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinerId(pub u32);

impl MinerId {
    /// Sentinel producer of the genesis block.
    pub const GENESIS: MinerId = MinerId(u32::MAX);

    /// Returns true for the genesis sentinel.
    pub fn is_genesis(self) -> bool {
        self == Self::GENESIS
    }

    /// Identifier as written to the persisted chain (genesis is `-1`).
    pub fn export_id(self) -> i64 {
        if self.is_genesis() {
            -1
        } else {
            i64::from(self.0)
        }
    }

    /// Inverse of [`MinerId::export_id`].
    pub fn from_export_id(id: i64) -> Option<Self> {
        if id == -1 {
            return Some(Self::GENESIS);
        }
        u32::try_from(id).ok().filter(|v| *v != u32::MAX).map(MinerId)
    }
}

impl fmt::Display for MinerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_genesis() {
            f.write_str("genesis")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// An opaque, weighted update submitted by a client.
///
/// The core hashes the payload but never interprets it. The payload is
/// reference counted so that cross-verification between pools does not copy
/// the bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateRecord {
    /// Submitting entity (unique within a block).
    pub origin_id: ClientId,
    /// Opaque update bytes.
    pub payload: Arc<[u8]>,
    /// Time the client spent producing the update.
    pub computation_time: Duration,
    /// Number of samples behind the update (always positive).
    pub sample_weight: u64,
}

impl UpdateRecord {
    /// Create a new update record.
    ///
    /// # Errors
    /// `ZeroSampleWeight` if `sample_weight` is 0.
    pub fn new(
        origin_id: ClientId,
        payload: impl Into<Arc<[u8]>>,
        computation_time: Duration,
        sample_weight: u64,
    ) -> Result<Self, TypesError> {
        if sample_weight == 0 {
            return Err(TypesError::ZeroSampleWeight { origin: origin_id });
        }
        Ok(Self {
            origin_id,
            payload: payload.into(),
            computation_time,
            sample_weight,
        })
    }

    /// SHA-256 commitment over every field of the record.
    pub fn digest(&self) -> Hash {
        hashing::update_digest(self)
    }
}

/// A block of update records.
///
/// A block is sealed when its `content_hash` satisfies the active
/// [`Difficulty`](crate::Difficulty). The genesis block is exempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// Miner that sealed the block.
    pub producer_id: MinerId,
    /// Updates in assembly order.
    pub included_updates: Vec<UpdateRecord>,
    /// Content hash of the block this one extends.
    pub predecessor_hash: Hash,
    /// Proof-of-work nonce.
    pub seal_nonce: u64,
    /// Creation time (unix milliseconds), fixed for the whole nonce search.
    pub timestamp: u64,
    /// Digest of the fields above; never an input to itself.
    pub content_hash: Hash,
}

impl Block {
    /// Build the genesis sentinel block.
    pub fn genesis(timestamp: u64) -> Self {
        let mut block = Self {
            producer_id: MinerId::GENESIS,
            included_updates: Vec::new(),
            predecessor_hash: ZERO_HASH,
            seal_nonce: 0,
            timestamp,
            content_hash: ZERO_HASH,
        };
        block.content_hash = block.compute_hash();
        block
    }

    /// Check if this is the genesis block
    pub fn is_genesis(&self) -> bool {
        self.producer_id.is_genesis()
            && self.predecessor_hash == ZERO_HASH
            && self.included_updates.is_empty()
            && self.seal_nonce == 0
    }

    /// Recompute the content hash from the block's fields.
    pub fn compute_hash(&self) -> Hash {
        hashing::content_hash(
            self.producer_id,
            &self.predecessor_hash,
            self.seal_nonce,
            self.timestamp,
            &UpdateSetDigest::of(&self.included_updates),
        )
    }

    /// True if the stored hash matches the recomputed one.
    pub fn has_valid_hash(&self) -> bool {
        self.compute_hash() == self.content_hash
    }

    /// Work contributed by this block. Difficulty is fixed, so every block
    /// counts as one unit.
    pub fn work(&self) -> u64 {
        1
    }

    /// Origins of the included updates, in inclusion order.
    pub fn origin_ids(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.included_updates.iter().map(|u| u.origin_id)
    }

    /// First origin that appears more than once, if any.
    pub fn first_duplicate_origin(&self) -> Option<ClientId> {
        let mut seen = std::collections::HashSet::with_capacity(self.included_updates.len());
        self.origin_ids().find(|origin| !seen.insert(*origin))
    }

    /// Sum of `sample_weight` over the included updates.
    pub fn total_sample_weight(&self) -> u64 {
        self.included_updates
            .iter()
            .map(|u| u.sample_weight)
            .fold(0u64, u64::saturating_add)
    }
}
