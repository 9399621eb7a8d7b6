use shared_types::{Block, Hash, MinerId, UpdateRecord, ZERO_HASH};

/// An assembled, unsealed block.
///
/// Everything but the nonce is fixed, including the timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockTemplate {
    pub producer_id: MinerId,
    pub predecessor_hash: Hash,
    pub included_updates: Vec<UpdateRecord>,
    /// Unix milliseconds, taken once when the search starts.
    pub timestamp: u64,
}

impl BlockTemplate {
    pub fn new(
        producer_id: MinerId,
        predecessor_hash: Hash,
        included_updates: Vec<UpdateRecord>,
        timestamp: u64,
    ) -> Self {
        Self {
            producer_id,
            predecessor_hash,
            included_updates,
            timestamp,
        }
    }

    /// Materialize the block for a given nonce and its precomputed hash.
    pub(crate) fn into_block(self, seal_nonce: u64, content_hash: Hash) -> Block {
        Block {
            producer_id: self.producer_id,
            included_updates: self.included_updates,
            predecessor_hash: self.predecessor_hash,
            seal_nonce,
            timestamp: self.timestamp,
            content_hash,
        }
    }

    /// Unsealed block with nonce 0 and a freshly computed hash.
    pub fn to_unsealed_block(&self) -> Block {
        let mut block = self.clone().into_block(0, ZERO_HASH);
        block.content_hash = block.compute_hash();
        block
    }
}
