//! Metrics collection for the sealer subsystem

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for proof-of-work sealing
#[derive(Debug, Default)]
pub struct SealerMetrics {
    /// Total blocks sealed
    pub blocks_sealed: AtomicU64,

    /// Total hashes computed (sealed and cancelled searches)
    pub hash_attempts: AtomicU64,

    /// Searches aborted through their cancellation flag
    pub searches_cancelled: AtomicU64,

    /// Total time spent in successful searches (milliseconds)
    pub sealing_time_ms: AtomicU64,
}

impl SealerMetrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful search
    pub fn record_sealed(&self, attempts: u64, duration_ms: u64) {
        self.blocks_sealed.fetch_add(1, Ordering::Relaxed);
        self.hash_attempts.fetch_add(attempts, Ordering::Relaxed);
        self.sealing_time_ms.fetch_add(duration_ms, Ordering::Relaxed);
    }

    /// Record a cancelled search
    pub fn record_cancelled(&self, attempts: u64) {
        self.searches_cancelled.fetch_add(1, Ordering::Relaxed);
        self.hash_attempts.fetch_add(attempts, Ordering::Relaxed);
    }

    pub fn get_blocks_sealed(&self) -> u64 {
        self.blocks_sealed.load(Ordering::Relaxed)
    }

    pub fn get_searches_cancelled(&self) -> u64 {
        self.searches_cancelled.load(Ordering::Relaxed)
    }

    pub fn get_hash_attempts(&self) -> u64 {
        self.hash_attempts.load(Ordering::Relaxed)
    }

    /// Get average attempts per sealed block
    pub fn get_avg_attempts_per_block(&self) -> f64 {
        let blocks = self.blocks_sealed.load(Ordering::Relaxed);
        if blocks == 0 {
            return 0.0;
        }
        self.hash_attempts.load(Ordering::Relaxed) as f64 / blocks as f64
    }

    /// Get average sealing time (milliseconds)
    pub fn get_avg_sealing_time(&self) -> f64 {
        let blocks = self.blocks_sealed.load(Ordering::Relaxed);
        if blocks == 0 {
            return 0.0;
        }
        self.sealing_time_ms.load(Ordering::Relaxed) as f64 / blocks as f64
    }
}
