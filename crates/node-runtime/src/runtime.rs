//! # Node Runtime
//!
//! Builds the whole system from a [`NodeConfig`]: genesis, coordinator task,
//! one assembly pool and sealer per miner, and the simulated clients.

use crate::aggregator::TipConsumer;
use crate::clients::SimulatedClient;
use crate::config::NodeConfig;
use crate::error::{Result, RuntimeError};
use crate::miner::MinerWorker;
use crate::round::{RoundDriver, RoundReport};
use bfl_01_assembly_pool::AssemblyPool;
use bfl_02_pow_sealer::{ProofOfWorkSealer, SealerMetrics};
use bfl_04_coordinator::{
    Coordinator, CoordinatorHandle, CoordinatorService, LedgerApi, DEFAULT_QUEUE_CAPACITY,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared_types::{short_hex, Block, ClientId, MinerId, SystemTimeSource, TimeSource};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// A configured, running node.
pub struct NodeRuntime {
    config: NodeConfig,
    driver: RoundDriver,
    handle: CoordinatorHandle,
    coordinator_task: JoinHandle<Coordinator>,
    sealer_metrics: Arc<SealerMetrics>,
}

impl NodeRuntime {
    /// Build a runtime on the system clock.
    pub fn new(config: NodeConfig, consumer: Arc<dyn TipConsumer>) -> Result<Self> {
        Self::with_clock(config, consumer, Arc::new(SystemTimeSource))
    }

    /// Build a runtime whose pools and miners read `clock`.
    ///
    /// Must be called inside a tokio runtime: the coordinator task is
    /// spawned here.
    pub fn with_clock(
        config: NodeConfig,
        consumer: Arc<dyn TipConsumer>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self> {
        config.validate()?;
        let policy = config.miner.readiness_policy()?;
        let sealer_metrics = Arc::new(SealerMetrics::new());
        let sealer = ProofOfWorkSealer::from_config(config.miner.sealer_config())
            .with_metrics(Arc::clone(&sealer_metrics));

        let genesis = Block::genesis(config.system.genesis_timestamp);
        info!(
            "[runtime] genesis {} at {} ms, difficulty '{}'",
            short_hex(&genesis.content_hash),
            genesis.timestamp,
            config.miner.difficulty
        );
        let coordinator = Coordinator::new(genesis, config.miner.difficulty.clone());
        let (handle, coordinator_task) =
            CoordinatorService::spawn(coordinator, DEFAULT_QUEUE_CAPACITY);

        let mut rng = match config.system.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let clients = (0..config.system.num_clients)
            .map(|i| SimulatedClient::new(ClientId(i as u32), config.system.payload_bytes, &mut rng))
            .collect();

        let mut pools = Vec::with_capacity(config.system.num_miners);
        let mut miners = Vec::with_capacity(config.system.num_miners);
        for i in 0..config.system.num_miners {
            let id = MinerId(i as u32);
            pools.push(AssemblyPool::new(id, policy.clone(), Arc::clone(&clock)));
            miners.push(MinerWorker::new(
                id,
                sealer.clone(),
                Arc::clone(&clock),
                config.miner.cancel_stale_searches,
            ));
        }

        info!(
            "[runtime] {} client(s), {} miner(s), quorum threshold {}, timeout {:?}",
            config.system.num_clients,
            config.system.num_miners,
            policy.threshold(),
            policy.t_wait()
        );

        let driver = RoundDriver::new(
            clients,
            pools,
            miners,
            handle.clone(),
            consumer,
            config.miner.readiness_poll(),
            rng,
        );

        Ok(Self {
            config,
            driver,
            handle,
            coordinator_task,
            sealer_metrics,
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Handle to the coordinator, for callers that submit or query directly.
    pub fn handle(&self) -> &CoordinatorHandle {
        &self.handle
    }

    pub fn sealer_metrics(&self) -> &Arc<SealerMetrics> {
        &self.sealer_metrics
    }

    /// Run a single round.
    pub async fn run_round(&mut self) -> Result<RoundReport> {
        self.driver.run_round().await
    }

    /// Run every configured round.
    pub async fn run(&mut self) -> Result<Vec<RoundReport>> {
        let mut reports = Vec::new();
        while self.driver.completed_rounds() < self.config.system.rounds {
            reports.push(self.driver.run_round().await?);
        }
        let metrics = self.handle.metrics();
        info!(
            "[runtime] {} round(s) done: {} submitted, {} attached, {} orphaned, {} reorganization(s), {} sealed",
            reports.len(),
            metrics.get_submissions(),
            metrics.get_attached(),
            metrics.get_orphaned(),
            metrics.get_reorganizations(),
            self.sealer_metrics.get_blocks_sealed()
        );
        Ok(reports)
    }

    /// Write the canonical chain to the configured path.
    pub async fn export(&self) -> Result<usize> {
        self.export_to(&self.config.output.chain_path).await
    }

    pub async fn export_to(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref().to_path_buf();
        let written = self.handle.export(path.clone()).await?;
        info!("[runtime] exported {} block(s) to {}", written, path.display());
        Ok(written)
    }

    /// Stop the coordinator and return it with its final ledger.
    pub async fn shutdown(self) -> Result<Coordinator> {
        let Self {
            driver,
            handle,
            coordinator_task,
            ..
        } = self;
        drop(driver);
        drop(handle);
        coordinator_task
            .await
            .map_err(|e| RuntimeError::Task(e.to_string()))
    }
}
