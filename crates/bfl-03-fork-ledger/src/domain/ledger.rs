//! # Fork-Aware Ledger
//!
//! ## Data Structures
//!
//! - `branches`: tip hash → Branch (all known maximal chains)
//! - `attached`: block hash → block and height, for every attached block
//! - `orphans`: block hash → block whose predecessor is unknown
//! - `orphans_by_parent`: missing parent → orphans waiting on it, in
//!   submission order
//! - `canonical`: the branch currently selected as authoritative
//!
//! A block may extend any attached block, not only a tip. Extending a tip
//! retires the old tip entry; extending an interior block forks a new branch
//! and keeps the existing one.

use super::branch::Branch;
use super::error::InvalidBlock;
use super::outcome::{AddOutcome, CanonicalChange};
use shared_types::{short_hex, Block, Difficulty, Hash};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug)]
struct AttachedBlock {
    block: Arc<Block>,
    height: u64,
}

/// All known branches and orphans, plus the canonical choice.
#[derive(Debug)]
pub struct ForkAwareLedger {
    difficulty: Difficulty,
    genesis_hash: Hash,
    branches: HashMap<Hash, Branch>,
    attached: HashMap<Hash, AttachedBlock>,
    orphans: HashMap<Hash, Arc<Block>>,
    orphans_by_parent: HashMap<Hash, Vec<Hash>>,
    canonical: Branch,
}

impl ForkAwareLedger {
    /// Create a ledger holding only `genesis`. Submitted blocks other than
    /// genesis must satisfy `difficulty`.
    pub fn new(genesis: Block, difficulty: Difficulty) -> Self {
        let genesis = Arc::new(genesis);
        let genesis_hash = genesis.content_hash;
        let branch = Branch::from_genesis(Arc::clone(&genesis));

        let mut branches = HashMap::new();
        branches.insert(genesis_hash, branch.clone());
        let mut attached = HashMap::new();
        attached.insert(
            genesis_hash,
            AttachedBlock {
                block: genesis,
                height: 0,
            },
        );

        info!(
            "[bfl-03] ledger initialized at genesis {} ({})",
            short_hex(&genesis_hash),
            difficulty
        );

        Self {
            difficulty,
            genesis_hash,
            branches,
            attached,
            orphans: HashMap::new(),
            orphans_by_parent: HashMap::new(),
            canonical: branch,
        }
    }

    /// Submit a block.
    ///
    /// Validates it, ignores it if already known, attaches it (then drains
    /// any orphans it unlocks) or keeps it as an orphan, and finally
    /// recomputes the canonical branch.
    #[tracing::instrument(
        skip(self, block),
        fields(hash = %short_hex(&block.content_hash), producer = %block.producer_id)
    )]
    pub fn add(&mut self, block: Block) -> AddOutcome {
        if let Err(reason) = self.validate(&block) {
            warn!("[bfl-03] rejected block: {}", reason);
            return AddOutcome::Invalid(reason);
        }

        let hash = block.content_hash;
        if self.attached.contains_key(&hash) || self.orphans.contains_key(&hash) {
            debug!("[bfl-03] duplicate submission of {}", short_hex(&hash));
            return AddOutcome::Duplicate { hash };
        }

        if !self.attached.contains_key(&block.predecessor_hash) {
            let missing_parent = block.predecessor_hash;
            self.orphans_by_parent
                .entry(missing_parent)
                .or_default()
                .push(hash);
            self.orphans.insert(hash, Arc::new(block));
            info!(
                "[bfl-03] orphaned {} (missing parent {}), {} orphan(s) held",
                short_hex(&hash),
                short_hex(&missing_parent),
                self.orphans.len()
            );
            return AddOutcome::Orphaned {
                hash,
                missing_parent,
            };
        }

        let height = self.attach(Arc::new(block));
        let reattached = self.drain_orphans(hash);
        let canonical = self.resolve();

        AddOutcome::Attached {
            hash,
            height,
            reattached,
            canonical,
        }
    }

    /// Recompute the canonical branch.
    ///
    /// The current canonical branch is kept unless some branch has strictly
    /// more work. Otherwise the heaviest branch extending the old canonical
    /// tip wins, then the smallest tip hash.
    pub fn resolve(&mut self) -> CanonicalChange {
        let best_work = self.branches.values().map(Branch::work).max().unwrap_or(0);
        let current_tip = self.canonical.tip_hash();
        let current_height = self.canonical.height();

        if let Some(current) = self.branches.get(&current_tip) {
            if current.work() >= best_work {
                return CanonicalChange::Unchanged;
            }
        }

        let chosen = self
            .branches
            .values()
            .filter(|b| b.work() == best_work)
            .min_by_key(|b| (!b.contains_at(&current_tip, current_height), b.tip_hash()))
            .cloned();
        let Some(chosen) = chosen else {
            return CanonicalChange::Unchanged;
        };

        let change = if chosen.contains_at(&current_tip, current_height) {
            debug!(
                "[bfl-03] canonical advanced to {} (height {})",
                short_hex(&chosen.tip_hash()),
                chosen.height()
            );
            CanonicalChange::Advanced
        } else {
            let depth = current_height - chosen.common_ancestor_height(&self.canonical);
            info!(
                "[bfl-03] reorganization: {} -> {} (depth {}, work {})",
                short_hex(&current_tip),
                short_hex(&chosen.tip_hash()),
                depth,
                chosen.work()
            );
            CanonicalChange::Reorganized { depth }
        };

        self.canonical = chosen;
        change
    }

    /// The current canonical branch.
    pub fn canonical(&self) -> &Branch {
        &self.canonical
    }

    /// Last block of the canonical branch.
    pub fn canonical_tip(&self) -> &Arc<Block> {
        self.canonical.tip()
    }

    /// All known branches, in no particular order.
    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.values()
    }

    /// Branch whose tip is `tip`.
    pub fn branch(&self, tip: &Hash) -> Option<&Branch> {
        self.branches.get(tip)
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// True if `hash` is attached to some branch.
    pub fn contains(&self, hash: &Hash) -> bool {
        self.attached.contains_key(hash)
    }

    /// Attached block by hash.
    pub fn block(&self, hash: &Hash) -> Option<&Arc<Block>> {
        self.attached.get(hash).map(|a| &a.block)
    }

    /// Height of an attached block.
    pub fn height_of(&self, hash: &Hash) -> Option<u64> {
        self.attached.get(hash).map(|a| a.height)
    }

    /// Number of attached blocks, genesis included.
    pub fn block_count(&self) -> usize {
        self.attached.len()
    }

    pub fn is_orphan(&self, hash: &Hash) -> bool {
        self.orphans.contains_key(hash)
    }

    pub fn orphan_count(&self) -> usize {
        self.orphans.len()
    }

    /// Orphans waiting for a parent, in no particular order.
    pub fn orphans(&self) -> impl Iterator<Item = &Arc<Block>> {
        self.orphans.values()
    }

    pub fn genesis_hash(&self) -> Hash {
        self.genesis_hash
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    fn validate(&self, block: &Block) -> Result<(), InvalidBlock> {
        let computed = block.compute_hash();
        if computed != block.content_hash {
            return Err(InvalidBlock::HashMismatch {
                stored: block.content_hash,
                computed,
            });
        }
        if block.content_hash != self.genesis_hash
            && !self.difficulty.is_satisfied_by(&block.content_hash)
        {
            return Err(InvalidBlock::Unsealed {
                hash: block.content_hash,
                prefix: self.difficulty.prefix().to_string(),
            });
        }
        if let Some(origin) = block.first_duplicate_origin() {
            return Err(InvalidBlock::DuplicateOrigin {
                hash: block.content_hash,
                origin,
            });
        }
        if let Some(update) = block.included_updates.iter().find(|u| u.sample_weight == 0) {
            return Err(InvalidBlock::ZeroWeight {
                hash: block.content_hash,
                origin: update.origin_id,
            });
        }
        Ok(())
    }

    /// Attach a block whose predecessor is attached. Returns its height.
    fn attach(&mut self, block: Arc<Block>) -> u64 {
        let hash = block.content_hash;
        let parent = block.predecessor_hash;

        let branch = match self.branches.remove(&parent) {
            Some(mut branch) => {
                branch.push(Arc::clone(&block));
                branch
            }
            None => {
                let mut branch = Branch::from_prefix(self.path_to(&parent));
                branch.push(Arc::clone(&block));
                debug!(
                    "[bfl-03] forked at {} (height {})",
                    short_hex(&parent),
                    branch.height() - 1
                );
                branch
            }
        };

        let height = branch.height();
        self.attached.insert(hash, AttachedBlock { block, height });
        self.branches.insert(hash, branch);
        info!(
            "[bfl-03] attached {} at height {} ({} branch(es))",
            short_hex(&hash),
            height,
            self.branches.len()
        );
        height
    }

    /// Blocks from genesis to the attached block `tip`.
    fn path_to(&self, tip: &Hash) -> Vec<Arc<Block>> {
        let mut path = Vec::new();
        let mut cursor = self.attached.get(tip);
        while let Some(entry) = cursor {
            path.push(Arc::clone(&entry.block));
            if entry.height == 0 {
                break;
            }
            cursor = self.attached.get(&entry.block.predecessor_hash);
        }
        path.reverse();
        path
    }

    /// Attach every orphan that descends from `root`, breadth-first and in
    /// submission order per parent.
    fn drain_orphans(&mut self, root: Hash) -> Vec<Hash> {
        let mut reattached = Vec::new();
        let mut queue = VecDeque::from([root]);

        while let Some(parent) = queue.pop_front() {
            let Some(children) = self.orphans_by_parent.remove(&parent) else {
                continue;
            };
            for child in children {
                if let Some(block) = self.orphans.remove(&child) {
                    self.attach(block);
                    reattached.push(child);
                    queue.push_back(child);
                }
            }
        }

        if !reattached.is_empty() {
            info!(
                "[bfl-03] reattached {} orphan(s), {} still waiting",
                reattached.len(),
                self.orphans.len()
            );
        }
        reattached
    }
}
