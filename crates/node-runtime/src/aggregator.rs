//! Canonical tip hand-off.
//!
//! After every round the canonical tip is passed to a [`TipConsumer`]. The
//! consumer stands in for the external aggregator/evaluator; the bundled
//! [`WeightSummaryConsumer`] only records how many updates the tip carries
//! and their total sample weight.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{short_hex, Block, Hash, MinerId};
use std::sync::Arc;
use tracing::info;

/// Receives the canonical tip after each round.
#[async_trait]
pub trait TipConsumer: Send + Sync {
    async fn on_canonical_tip(&self, round: u64, tip: Arc<Block>);
}

/// What a consumer saw at the end of one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipSummary {
    pub round: u64,
    pub tip_hash: Hash,
    pub producer_id: MinerId,
    pub num_updates: usize,
    pub total_sample_weight: u64,
}

/// Logs and records a summary of each tip without reading payloads.
#[derive(Debug, Default)]
pub struct WeightSummaryConsumer {
    summaries: Mutex<Vec<TipSummary>>,
}

impl WeightSummaryConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summaries in round order.
    pub fn summaries(&self) -> Vec<TipSummary> {
        self.summaries.lock().clone()
    }
}

#[async_trait]
impl TipConsumer for WeightSummaryConsumer {
    async fn on_canonical_tip(&self, round: u64, tip: Arc<Block>) {
        let summary = TipSummary {
            round,
            tip_hash: tip.content_hash,
            producer_id: tip.producer_id,
            num_updates: tip.included_updates.len(),
            total_sample_weight: tip.total_sample_weight(),
        };
        info!(
            "[aggregator] round {}: tip {} from miner {} carries {} update(s), {} samples",
            round,
            short_hex(&summary.tip_hash),
            summary.producer_id,
            summary.num_updates,
            summary.total_sample_weight
        );
        self.summaries.lock().push(summary);
    }
}
