//! # BlockFL Node
//!
//! Runs the configured number of rounds, then exports the canonical chain.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (`BFL_CONFIG` file, then `BFL_*` overrides)
//! 2. Create the fixed genesis block and start the coordinator task
//! 3. Create one assembly pool and sealer per miner, plus the clients
//! 4. Run the rounds
//! 5. Export the canonical chain and stop the coordinator
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::{Context, Result};
use node_runtime::aggregator::WeightSummaryConsumer;
use node_runtime::config::load_config;
use node_runtime::runtime::NodeRuntime;
use shared_types::short_hex;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config().context("loading configuration")?;

    let mut runtime = NodeRuntime::new(config, Arc::new(WeightSummaryConsumer::new()))
        .context("building node runtime")?;
    runtime.run().await.context("running rounds")?;
    runtime.export().await.context("exporting canonical chain")?;

    let coordinator = runtime.shutdown().await?;
    let tip = coordinator.canonical_tip();
    info!(
        "Final canonical tip {} at height {} ({} block(s) known)",
        short_hex(&tip.content_hash),
        coordinator.canonical_chain().len().saturating_sub(1),
        coordinator.ledger().block_count()
    );

    Ok(())
}
