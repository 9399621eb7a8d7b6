//! Synchronous coordinator: exclusive owner of the ledger.

use super::persistence::{write_chain_file, write_chain_records};
use crate::error::ExportError;
use crate::metrics::CoordinatorMetrics;
use bfl_03_fork_ledger::{AddOutcome, CanonicalChange, ForkAwareLedger};
use shared_types::{short_hex, Block, Difficulty};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Serializes submissions into the ledger and exposes the canonical branch.
///
/// Mutation goes through `&mut self`, so a `Coordinator` is single-writer by
/// construction. Share it across tasks through
/// [`CoordinatorService`](crate::CoordinatorService).
#[derive(Debug)]
pub struct Coordinator {
    ledger: ForkAwareLedger,
    metrics: Arc<CoordinatorMetrics>,
}

impl Coordinator {
    pub fn new(genesis: Block, difficulty: Difficulty) -> Self {
        Self::from_ledger(ForkAwareLedger::new(genesis, difficulty))
    }

    pub fn from_ledger(ledger: ForkAwareLedger) -> Self {
        Self {
            ledger,
            metrics: Arc::new(CoordinatorMetrics::new()),
        }
    }

    /// Apply one block to the ledger and log the outcome category.
    pub fn submit(&mut self, block: Block) -> AddOutcome {
        let producer = block.producer_id;
        let outcome = self.ledger.add(block);
        self.metrics.record_outcome(&outcome);

        match &outcome {
            AddOutcome::Attached {
                hash,
                height,
                reattached,
                canonical,
            } => {
                info!(
                    "[bfl-04] attached {} from miner {} at height {} (+{} reattached), canonical tip {}",
                    short_hex(hash),
                    producer,
                    height,
                    reattached.len(),
                    short_hex(&self.ledger.canonical().tip_hash())
                );
                if let CanonicalChange::Reorganized { depth } = canonical {
                    warn!("[bfl-04] canonical reorganized, {} block(s) rolled back", depth);
                }
            }
            AddOutcome::Orphaned {
                hash,
                missing_parent,
            } => {
                info!(
                    "[bfl-04] orphaned {} from miner {} (waiting for {})",
                    short_hex(hash),
                    producer,
                    short_hex(missing_parent)
                );
            }
            AddOutcome::Duplicate { hash } => {
                debug!("[bfl-04] duplicate {} from miner {}", short_hex(hash), producer);
            }
            AddOutcome::Invalid(reason) => {
                warn!("[bfl-04] invalid block from miner {}: {}", producer, reason);
            }
        }
        outcome
    }

    /// Last block of the canonical branch.
    pub fn canonical_tip(&self) -> Arc<Block> {
        Arc::clone(self.ledger.canonical_tip())
    }

    /// Height of the canonical tip, genesis at 0.
    pub fn canonical_height(&self) -> u64 {
        self.ledger.canonical().height()
    }

    /// Canonical branch, genesis first.
    pub fn canonical_chain(&self) -> Vec<Arc<Block>> {
        self.ledger.canonical().blocks().to_vec()
    }

    /// Read-only view of the ledger.
    pub fn ledger(&self) -> &ForkAwareLedger {
        &self.ledger
    }

    pub fn metrics(&self) -> &Arc<CoordinatorMetrics> {
        &self.metrics
    }

    /// Write the canonical branch to `writer`. Orphans and non-canonical
    /// branches are not exported.
    pub fn export<W: Write>(&self, writer: W) -> Result<usize, ExportError> {
        write_chain_records(writer, self.ledger.canonical().blocks())
    }

    /// Write the canonical branch to a file, replacing it if present.
    pub fn export_to_path(&self, path: impl AsRef<Path>) -> Result<usize, ExportError> {
        let path = path.as_ref();
        let written = write_chain_file(path, self.ledger.canonical().blocks())?;
        info!(
            "[bfl-04] exported {} block(s) to {}",
            written,
            path.display()
        );
        Ok(written)
    }
}
