//! # Round Driver
//!
//! One round:
//!
//! ```text
//! clients ──(random miner)──→ pools ──cross_verify_all──→ wait for readiness
//!                                                              │
//!        ┌─────────────────────────────────────────────────────┘
//!        ↓
//!   one sealing task per non-empty pool (parallel, same predecessor)
//!        │  each task submits its block to the coordinator on completion
//!        ↓
//!   canonical tip ──→ TipConsumer
//! ```

use crate::aggregator::TipConsumer;
use crate::clients::SimulatedClient;
use crate::error::{Result, RuntimeError};
use crate::miner::{MinerReport, MinerWorker};
use bfl_01_assembly_pool::{cross_verify_all, AssemblyPool, Readiness};
use bfl_04_coordinator::{CoordinatorHandle, LedgerApi};
use rand::rngs::StdRng;
use rand::Rng;
use shared_types::{short_hex, Hash, MinerId};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// What happened in one round.
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub round: u64,
    /// Updates produced by clients this round.
    pub delivered: usize,
    /// Records copied between pools by cross-verification.
    pub merged: usize,
    /// Why each non-empty pool became ready.
    pub readiness: Vec<(MinerId, Readiness)>,
    /// Miner results in completion order.
    pub miners: Vec<MinerReport>,
    pub canonical_tip: Hash,
    pub canonical_height: u64,
}

/// Drives clients, pools and miners through successive rounds.
pub struct RoundDriver {
    clients: Vec<SimulatedClient>,
    pools: Vec<AssemblyPool>,
    miners: Vec<MinerWorker>,
    ledger: CoordinatorHandle,
    consumer: Arc<dyn TipConsumer>,
    readiness_poll: Duration,
    rng: StdRng,
    completed_rounds: u64,
}

impl RoundDriver {
    /// `pools[i]` and `miners[i]` must belong to the same miner.
    pub fn new(
        clients: Vec<SimulatedClient>,
        pools: Vec<AssemblyPool>,
        miners: Vec<MinerWorker>,
        ledger: CoordinatorHandle,
        consumer: Arc<dyn TipConsumer>,
        readiness_poll: Duration,
        rng: StdRng,
    ) -> Self {
        Self {
            clients,
            pools,
            miners,
            ledger,
            consumer,
            readiness_poll,
            rng,
            completed_rounds: 0,
        }
    }

    pub fn completed_rounds(&self) -> u64 {
        self.completed_rounds
    }

    pub fn pools(&self) -> &[AssemblyPool] {
        &self.pools
    }

    /// Run the next round to completion.
    #[tracing::instrument(skip(self), fields(round = self.completed_rounds + 1))]
    pub async fn run_round(&mut self) -> Result<RoundReport> {
        let round = self.completed_rounds + 1;
        info!("====================== ROUND {} ======================", round);

        let delivered = self.distribute_updates()?;
        let merged = cross_verify_all(&mut self.pools);
        let readiness = self.await_readiness().await;
        let miners = self.seal_and_submit().await?;

        let (tip, canonical_height) = self.ledger.canonical_head().await?;
        info!(
            "[runtime] round {} canonical tip {} (miner {}, height {})",
            round,
            short_hex(&tip.content_hash),
            tip.producer_id,
            canonical_height
        );
        let canonical_tip = tip.content_hash;
        self.consumer.on_canonical_tip(round, tip).await;

        self.completed_rounds = round;
        Ok(RoundReport {
            round,
            delivered,
            merged,
            readiness,
            miners,
            canonical_tip,
            canonical_height,
        })
    }

    /// Every client sends one update to a randomly chosen miner.
    fn distribute_updates(&mut self) -> Result<usize> {
        if self.pools.is_empty() {
            return Ok(0);
        }
        let mut delivered = 0;
        for client in &self.clients {
            let update = client.produce_update(&mut self.rng)?;
            let target = self.rng.gen_range(0..self.pools.len());
            self.pools[target].receive(update);
            delivered += 1;
        }
        info!(
            "[runtime] {} client update(s) delivered to {} miner(s)",
            delivered,
            self.pools.len()
        );
        Ok(delivered)
    }

    /// Poll until every non-empty pool is ready. Empty pools are skipped.
    async fn await_readiness(&self) -> Vec<(MinerId, Readiness)> {
        loop {
            let states: Vec<(MinerId, Readiness)> = self
                .pools
                .iter()
                .filter(|p| !p.is_empty())
                .map(|p| (p.miner_id(), p.readiness()))
                .collect();
            if states.iter().all(|(_, r)| r.is_ready()) {
                for (miner, readiness) in &states {
                    if *readiness == Readiness::Timeout {
                        warn!("[runtime] miner {} proceeding on assembly timeout", miner);
                    }
                }
                return states;
            }
            tokio::time::sleep(self.readiness_poll).await;
        }
    }

    /// Seal every non-empty pool in parallel on the current canonical tip.
    async fn seal_and_submit(&mut self) -> Result<Vec<MinerReport>> {
        let predecessor = self.ledger.canonical_tip().await?.content_hash;
        let mut tasks = JoinSet::new();

        for (pool, miner) in self.pools.iter_mut().zip(&self.miners) {
            if pool.is_empty() {
                continue;
            }
            let updates = pool.snapshot_and_reset();
            let miner = miner.clone();
            let ledger = self.ledger.clone();
            let tip_rx = self.ledger.subscribe_tip();
            tasks.spawn(async move {
                miner
                    .seal_and_submit(predecessor, updates, &ledger, tip_rx)
                    .await
            });
        }

        let mut reports = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let report = joined.map_err(|e| RuntimeError::Task(e.to_string()))??;
            reports.push(report);
        }
        Ok(reports)
    }
}
