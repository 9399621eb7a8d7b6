//! Metrics collection for the coordinator subsystem

use bfl_03_fork_ledger::{AddOutcome, CanonicalChange};
use std::sync::atomic::{AtomicU64, Ordering};

/// Submission outcome counters
#[derive(Debug, Default)]
pub struct CoordinatorMetrics {
    /// Blocks attached directly on submission
    pub attached: AtomicU64,

    /// Blocks held as orphans on submission
    pub orphaned: AtomicU64,

    /// Orphans attached later when their parent arrived
    pub reattached: AtomicU64,

    /// Resubmissions of known blocks
    pub duplicates: AtomicU64,

    /// Rejected blocks
    pub invalid: AtomicU64,

    /// Canonical switches to a competing fork
    pub reorganizations: AtomicU64,
}

impl CoordinatorMetrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one submission
    pub fn record_outcome(&self, outcome: &AddOutcome) {
        match outcome {
            AddOutcome::Attached {
                reattached,
                canonical,
                ..
            } => {
                self.attached.fetch_add(1, Ordering::Relaxed);
                self.reattached
                    .fetch_add(reattached.len() as u64, Ordering::Relaxed);
                if matches!(canonical, CanonicalChange::Reorganized { .. }) {
                    self.reorganizations.fetch_add(1, Ordering::Relaxed);
                }
            }
            AddOutcome::Orphaned { .. } => {
                self.orphaned.fetch_add(1, Ordering::Relaxed);
            }
            AddOutcome::Duplicate { .. } => {
                self.duplicates.fetch_add(1, Ordering::Relaxed);
            }
            AddOutcome::Invalid(_) => {
                self.invalid.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Total submissions seen
    pub fn get_submissions(&self) -> u64 {
        self.attached.load(Ordering::Relaxed)
            + self.orphaned.load(Ordering::Relaxed)
            + self.duplicates.load(Ordering::Relaxed)
            + self.invalid.load(Ordering::Relaxed)
    }

    pub fn get_attached(&self) -> u64 {
        self.attached.load(Ordering::Relaxed)
    }

    pub fn get_orphaned(&self) -> u64 {
        self.orphaned.load(Ordering::Relaxed)
    }

    pub fn get_reattached(&self) -> u64 {
        self.reattached.load(Ordering::Relaxed)
    }

    pub fn get_duplicates(&self) -> u64 {
        self.duplicates.load(Ordering::Relaxed)
    }

    pub fn get_invalid(&self) -> u64 {
        self.invalid.load(Ordering::Relaxed)
    }

    pub fn get_reorganizations(&self) -> u64 {
        self.reorganizations.load(Ordering::Relaxed)
    }
}
