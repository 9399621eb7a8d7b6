//! # Assembly Pool - Pending Updates for One Miner
//!
//! ## Data Structures
//!
//! - `pending`: records in first-seen order (becomes `included_updates`)
//! - `origins`: O(1) dedup index by `origin_id`
//! - `first_update_at`: round clock, unset until the first record arrives

use super::policy::ReadinessPolicy;
use shared_types::{ClientId, MinerId, TimeSource, UpdateRecord};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Result of offering a record to a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// Appended to the pending list.
    Accepted,
    /// A record from the same origin is already pending; the new one was ignored.
    Duplicate,
}

/// Why a pool is (or is not) ready to seal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Neither quorum nor timeout reached.
    Pending,
    /// `len >= threshold`.
    Quorum,
    /// `T_wait` elapsed since the first record.
    Timeout,
}

impl Readiness {
    pub fn is_ready(self) -> bool {
        !matches!(self, Readiness::Pending)
    }
}

/// Per-miner buffer of pending update records.
///
/// INVARIANTS:
/// - At most one pending record per `origin_id` (first wins)
/// - `pending` keeps first-seen insertion order
/// - `first_update_at` is set iff `pending` is non-empty
pub struct AssemblyPool {
    miner_id: MinerId,
    policy: ReadinessPolicy,
    clock: Arc<dyn TimeSource>,
    pending: Vec<UpdateRecord>,
    origins: HashSet<ClientId>,
    first_update_at: Option<u64>,
}

impl fmt::Debug for AssemblyPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssemblyPool")
            .field("miner_id", &self.miner_id)
            .field("policy", &self.policy)
            .field("pending", &self.pending.len())
            .field("first_update_at", &self.first_update_at)
            .finish()
    }
}

impl AssemblyPool {
    /// Creates an empty pool for `miner_id`.
    pub fn new(miner_id: MinerId, policy: ReadinessPolicy, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            miner_id,
            policy,
            clock,
            pending: Vec::new(),
            origins: HashSet::new(),
            first_update_at: None,
        }
    }

    pub fn miner_id(&self) -> MinerId {
        self.miner_id
    }

    pub fn policy(&self) -> &ReadinessPolicy {
        &self.policy
    }

    /// Pending records in insertion order.
    pub fn pending(&self) -> &[UpdateRecord] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Checks whether a record from `origin` is pending.
    pub fn contains(&self, origin: ClientId) -> bool {
        self.origins.contains(&origin)
    }

    /// Time of the first record of the current round, if any.
    pub fn first_update_at(&self) -> Option<u64> {
        self.first_update_at
    }

    /// Offers a record to the pool. A record whose origin is already pending
    /// is ignored.
    pub fn receive(&mut self, record: UpdateRecord) -> ReceiveOutcome {
        if self.origins.contains(&record.origin_id) {
            debug!(
                "[bfl-01] miner {} ignored duplicate update from client {}",
                self.miner_id, record.origin_id
            );
            return ReceiveOutcome::Duplicate;
        }
        self.admit(record);
        ReceiveOutcome::Accepted
    }

    /// Merges every record from `records` whose origin is absent locally,
    /// in the order given. Returns the number of records added.
    pub fn merge_from(&mut self, records: &[UpdateRecord]) -> usize {
        let mut added = 0;
        for record in records {
            if !self.origins.contains(&record.origin_id) {
                self.admit(record.clone());
                added += 1;
            }
        }
        added
    }

    /// Pulls missing records from each peer in turn.
    ///
    /// Returns the number of records added.
    pub fn cross_verify<'a, I>(&mut self, peers: I) -> usize
    where
        I: IntoIterator<Item = &'a AssemblyPool>,
    {
        let mut added = 0;
        for peer in peers {
            if peer.miner_id == self.miner_id {
                continue;
            }
            added += self.merge_from(&peer.pending);
        }
        if added > 0 {
            debug!(
                "[bfl-01] miner {} merged {} update(s) during cross-verification",
                self.miner_id, added
            );
        }
        added
    }

    /// Current readiness. Quorum wins when both conditions hold.
    pub fn readiness(&self) -> Readiness {
        if self.pending.len() >= self.policy.threshold() {
            return Readiness::Quorum;
        }
        match self.first_update_at {
            Some(first) => {
                let elapsed = self.clock.now_millis().saturating_sub(first);
                if u128::from(elapsed) >= self.policy.t_wait().as_millis() {
                    Readiness::Timeout
                } else {
                    Readiness::Pending
                }
            }
            None => Readiness::Pending,
        }
    }

    /// True iff quorum or timeout has been reached.
    pub fn ready(&self) -> bool {
        self.readiness().is_ready()
    }

    /// Remaining time before the timeout fires, `None` while the round clock
    /// has not started. Zero once elapsed.
    pub fn time_until_timeout(&self) -> Option<Duration> {
        let first = self.first_update_at?;
        let elapsed = Duration::from_millis(self.clock.now_millis().saturating_sub(first));
        Some(self.policy.t_wait().saturating_sub(elapsed))
    }

    /// Takes the pending list and clears all round state.
    pub fn snapshot_and_reset(&mut self) -> Vec<UpdateRecord> {
        self.origins.clear();
        self.first_update_at = None;
        let snapshot = std::mem::take(&mut self.pending);
        info!(
            "[bfl-01] miner {} assembled {} update(s)",
            self.miner_id,
            snapshot.len()
        );
        snapshot
    }

    fn admit(&mut self, record: UpdateRecord) {
        if self.first_update_at.is_none() {
            self.first_update_at = Some(self.clock.now_millis());
        }
        self.origins.insert(record.origin_id);
        self.pending.push(record);
    }
}

/// Runs the cross-verification barrier across a whole miner set.
///
/// Every pool merges from a snapshot of all pools taken before any merge, so
/// the outcome does not depend on iteration order. Returns the total number of
/// records added.
pub fn cross_verify_all(pools: &mut [AssemblyPool]) -> usize {
    let snapshot: Vec<(MinerId, Vec<UpdateRecord>)> = pools
        .iter()
        .map(|p| (p.miner_id, p.pending.clone()))
        .collect();

    let mut total = 0;
    for pool in pools.iter_mut() {
        for (peer_id, records) in &snapshot {
            if *peer_id != pool.miner_id {
                total += pool.merge_from(records);
            }
        }
    }
    debug!(
        "[bfl-01] cross-verification across {} pool(s) merged {} update(s)",
        pools.len(),
        total
    );
    total
}
