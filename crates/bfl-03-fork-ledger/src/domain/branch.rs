//! Branch: a maximal chain from genesis to a tip.

use shared_types::{Block, Hash};
use std::sync::Arc;

/// Ordered blocks from genesis to tip, identified by the tip's hash.
///
/// Blocks are shared between branches that have a common prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branch {
    blocks: Vec<Arc<Block>>,
    work: u64,
}

impl Branch {
    /// Branch holding only `genesis`.
    pub(crate) fn from_genesis(genesis: Arc<Block>) -> Self {
        let work = genesis.work();
        Self {
            blocks: vec![genesis],
            work,
        }
    }

    /// Branch built from an already linked prefix. The prefix is never empty
    /// because it always starts at genesis.
    pub(crate) fn from_prefix(blocks: Vec<Arc<Block>>) -> Self {
        let work = blocks.iter().map(|b| b.work()).sum();
        Self { blocks, work }
    }

    pub(crate) fn push(&mut self, block: Arc<Block>) {
        self.work += block.work();
        self.blocks.push(block);
    }

    /// Blocks in chain order, genesis first.
    pub fn blocks(&self) -> &[Arc<Block>] {
        &self.blocks
    }

    pub fn genesis(&self) -> &Arc<Block> {
        &self.blocks[0]
    }

    pub fn tip(&self) -> &Arc<Block> {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn tip_hash(&self) -> Hash {
        self.tip().content_hash
    }

    /// Height of the tip (genesis is 0).
    pub fn height(&self) -> u64 {
        (self.blocks.len() - 1) as u64
    }

    /// Cumulative work of every block, genesis included.
    pub fn work(&self) -> u64 {
        self.work
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: a branch holds at least genesis.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block at `height`, if the branch is that long.
    pub fn at_height(&self, height: u64) -> Option<&Arc<Block>> {
        usize::try_from(height).ok().and_then(|h| self.blocks.get(h))
    }

    /// True if the block with `hash` at `height` lies on this branch.
    pub fn contains_at(&self, hash: &Hash, height: u64) -> bool {
        self.at_height(height)
            .map(|b| &b.content_hash == hash)
            .unwrap_or(false)
    }

    /// Every predecessor link matches the previous block's hash.
    pub fn is_linked(&self) -> bool {
        self.blocks
            .windows(2)
            .all(|pair| pair[1].predecessor_hash == pair[0].content_hash)
    }

    /// Height of the last block shared with `other`.
    pub fn common_ancestor_height(&self, other: &Branch) -> u64 {
        let shared = self
            .blocks
            .iter()
            .zip(other.blocks.iter())
            .take_while(|(a, b)| a.content_hash == b.content_hash)
            .count();
        shared.saturating_sub(1) as u64
    }
}
