//! Outcomes of submitting a block to the ledger.

use super::error::InvalidBlock;
use shared_types::Hash;

/// Effect of a submission on the canonical branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalChange {
    /// Canonical tip did not move.
    Unchanged,
    /// The new canonical branch extends the previous canonical tip.
    Advanced,
    /// The canonical branch switched to a competing fork, rolling back
    /// `depth` blocks of the previous canonical branch.
    Reorganized { depth: u64 },
}

/// Result of [`ForkAwareLedger::add`](super::ForkAwareLedger::add).
///
/// Every variant except `Invalid` is a success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Attached to a branch. `reattached` lists orphans that attached in the
    /// same call, in attachment order.
    Attached {
        hash: Hash,
        height: u64,
        reattached: Vec<Hash>,
        canonical: CanonicalChange,
    },
    /// Predecessor unknown; kept for later reattachment.
    Orphaned { hash: Hash, missing_parent: Hash },
    /// Already attached or orphaned; nothing changed.
    Duplicate { hash: Hash },
    /// Rejected and dropped.
    Invalid(InvalidBlock),
}

impl AddOutcome {
    /// Outcome category used in logs and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            AddOutcome::Attached { .. } => "attached",
            AddOutcome::Orphaned { .. } => "orphaned",
            AddOutcome::Duplicate { .. } => "duplicate",
            AddOutcome::Invalid(_) => "invalid",
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self, AddOutcome::Attached { .. })
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, AddOutcome::Invalid(_))
    }
}
