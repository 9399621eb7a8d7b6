//! Nonce search over a block template until the hash meets the difficulty prefix.

use super::cancel::CancellationFlag;
use super::template::BlockTemplate;
use crate::config::SealerConfig;
use crate::error::{Result, SealerError};
use crate::metrics::SealerMetrics;
use shared_types::hashing::{content_hash, UpdateSetDigest};
use shared_types::{short_hex, Block, Difficulty};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// How a search ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SealOutcome {
    /// A nonce satisfying the difficulty was found.
    Sealed(Block),
    /// The cancellation flag was raised before a nonce was found.
    Cancelled {
        /// Hashes computed before giving up
        attempts: u64,
    },
}

impl SealOutcome {
    pub fn into_block(self) -> Option<Block> {
        match self {
            SealOutcome::Sealed(block) => Some(block),
            SealOutcome::Cancelled { .. } => None,
        }
    }
}

/// Sequential nonce search against a fixed difficulty.
#[derive(Clone, Debug)]
pub struct ProofOfWorkSealer {
    difficulty: Difficulty,
    cancel_check_interval: u64,
    metrics: Arc<SealerMetrics>,
}

impl ProofOfWorkSealer {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::from_config(SealerConfig {
            difficulty,
            ..SealerConfig::default()
        })
    }

    pub fn from_config(config: SealerConfig) -> Self {
        Self {
            difficulty: config.difficulty,
            cancel_check_interval: config.cancel_check_interval.max(1),
            metrics: Arc::new(SealerMetrics::new()),
        }
    }

    /// Share a metrics collector across several sealers.
    pub fn with_metrics(mut self, metrics: Arc<SealerMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn metrics(&self) -> &Arc<SealerMetrics> {
        &self.metrics
    }

    /// Search nonces `0, 1, 2, ...` until the content hash meets the difficulty.
    ///
    /// The flag is polled every `cancel_check_interval` nonces, including
    /// before the first attempt.
    ///
    /// # Errors
    /// `NonceSpaceExhausted` if no `u64` nonce satisfies the target.
    #[tracing::instrument(
        skip(self, template, cancel),
        fields(producer = %template.producer_id, updates = template.included_updates.len())
    )]
    pub fn seal(&self, template: BlockTemplate, cancel: &CancellationFlag) -> Result<SealOutcome> {
        debug!(
            "[bfl-02] sealing on {} with {}",
            short_hex(&template.predecessor_hash),
            self.difficulty
        );

        let started = Instant::now();
        let digest = UpdateSetDigest::of(&template.included_updates);
        let mut nonce: u64 = 0;

        loop {
            if nonce % self.cancel_check_interval == 0 && cancel.is_cancelled() {
                self.metrics.record_cancelled(nonce);
                info!(
                    "[bfl-02] miner {} search cancelled after {} attempts",
                    template.producer_id, nonce
                );
                return Ok(SealOutcome::Cancelled { attempts: nonce });
            }

            let hash = content_hash(
                template.producer_id,
                &template.predecessor_hash,
                nonce,
                template.timestamp,
                &digest,
            );

            if self.difficulty.is_satisfied_by(&hash) {
                let attempts = nonce.saturating_add(1);
                let elapsed_ms = started.elapsed().as_millis() as u64;
                self.metrics.record_sealed(attempts, elapsed_ms);
                info!(
                    "[bfl-02] miner {} sealed {} (nonce={}, {}ms)",
                    template.producer_id,
                    short_hex(&hash),
                    nonce,
                    elapsed_ms
                );
                return Ok(SealOutcome::Sealed(template.into_block(nonce, hash)));
            }

            nonce = match nonce.checked_add(1) {
                Some(next) => next,
                None => {
                    return Err(SealerError::NonceSpaceExhausted { attempts: u64::MAX });
                }
            };
        }
    }
}
