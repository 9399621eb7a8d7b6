//! Miner worker: seals one block per round and submits it.

use crate::error::Result;
use bfl_02_pow_sealer::{BlockTemplate, CancellationFlag, ProofOfWorkSealer, SealOutcome};
use bfl_03_fork_ledger::AddOutcome;
use bfl_04_coordinator::LedgerApi;
use shared_types::{short_hex, Hash, MinerId, TimeSource, UpdateRecord};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// How a miner's round ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinerOutcome {
    /// A block was sealed and submitted; `outcome` is the ledger's verdict.
    Submitted { block_hash: Hash, outcome: AddOutcome },
    /// The search was abandoned because the canonical tip moved on.
    Cancelled { attempts: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinerReport {
    pub miner_id: MinerId,
    pub outcome: MinerOutcome,
}

/// Per-miner sealing worker.
#[derive(Clone)]
pub struct MinerWorker {
    id: MinerId,
    sealer: ProofOfWorkSealer,
    clock: Arc<dyn TimeSource>,
    cancel_stale_searches: bool,
}

impl MinerWorker {
    pub fn new(
        id: MinerId,
        sealer: ProofOfWorkSealer,
        clock: Arc<dyn TimeSource>,
        cancel_stale_searches: bool,
    ) -> Self {
        Self {
            id,
            sealer,
            clock,
            cancel_stale_searches,
        }
    }

    pub fn id(&self) -> MinerId {
        self.id
    }

    /// Seal `updates` on top of `predecessor` and submit the result.
    ///
    /// The timestamp is taken once here. When stale-search cancellation is
    /// enabled, the search is abandoned as soon as `tip_rx` reports a
    /// canonical tip other than `predecessor`.
    pub async fn seal_and_submit(
        &self,
        predecessor: Hash,
        updates: Vec<UpdateRecord>,
        ledger: &dyn LedgerApi,
        tip_rx: watch::Receiver<Hash>,
    ) -> Result<MinerReport> {
        let template =
            BlockTemplate::new(self.id, predecessor, updates, self.clock.now_millis());
        let cancel = CancellationFlag::new();

        let watcher = self
            .cancel_stale_searches
            .then(|| tokio::spawn(cancel_when_stale(self.id, predecessor, tip_rx, cancel.clone())));

        let sealed = self.sealer.seal_async(template, cancel).await;
        if let Some(watcher) = watcher {
            watcher.abort();
        }

        let outcome = match sealed? {
            SealOutcome::Sealed(block) => {
                let block_hash = block.content_hash;
                let outcome = ledger.submit(block).await?;
                info!(
                    "[miner-{}] submitted {}: {}",
                    self.id,
                    short_hex(&block_hash),
                    outcome.category()
                );
                MinerOutcome::Submitted {
                    block_hash,
                    outcome,
                }
            }
            SealOutcome::Cancelled { attempts } => MinerOutcome::Cancelled { attempts },
        };

        Ok(MinerReport {
            miner_id: self.id,
            outcome,
        })
    }
}

async fn cancel_when_stale(
    miner: MinerId,
    predecessor: Hash,
    mut tip_rx: watch::Receiver<Hash>,
    cancel: CancellationFlag,
) {
    loop {
        let tip = *tip_rx.borrow_and_update();
        if tip != predecessor {
            info!(
                "[miner-{}] canonical tip moved to {}, abandoning search on {}",
                miner,
                short_hex(&tip),
                short_hex(&predecessor)
            );
            cancel.cancel();
            return;
        }
        if tip_rx.changed().await.is_err() {
            return;
        }
    }
}
