//! # Assembly → Sealing → Ledger
//!
//! ```text
//! clients ──→ AssemblyPool(0..n) ──cross_verify_all──→ snapshot_and_reset
//!                                                          │
//!                                           ProofOfWorkSealer::seal
//!                                                          │
//!                                              ForkAwareLedger::add
//! ```

#[cfg(test)]
mod tests {
    use super::super::fixtures::{easy_difficulty, update};
    use bfl_01_assembly_pool::{
        cross_verify_all, AssemblyPool, Readiness, ReadinessPolicy, ReceiveOutcome,
    };
    use bfl_02_pow_sealer::{BlockTemplate, CancellationFlag, ProofOfWorkSealer};
    use bfl_03_fork_ledger::{AddOutcome, CanonicalChange, ForkAwareLedger};
    use shared_types::{Block, ClientId, ManualTimeSource, MinerId, TimeSource, UpdateRecord};
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::time::Duration;

    fn pools(count: u32, clock: &Arc<ManualTimeSource>) -> Vec<AssemblyPool> {
        (0..count)
            .map(|i| {
                AssemblyPool::new(MinerId(i), ReadinessPolicy::default(), clock.clone())
            })
            .collect()
    }

    fn origins(records: &[UpdateRecord]) -> BTreeSet<ClientId> {
        records.iter().map(|r| r.origin_id).collect()
    }

    /// h=5, delta=0.2, nd=10: six records stay below the threshold of seven,
    /// so only the timeout can make the pool ready.
    #[test]
    fn test_readiness_by_timeout_below_threshold() {
        let clock = Arc::new(ManualTimeSource::new(10_000));
        let mut pool = AssemblyPool::new(
            MinerId(0),
            ReadinessPolicy::new(5, 0.2, 10, Duration::from_secs(2)).unwrap(),
            clock.clone(),
        );
        assert_eq!(pool.policy().threshold(), 7);

        for origin in 0..6 {
            assert_eq!(pool.receive(update(origin, 50)), ReceiveOutcome::Accepted);
        }
        assert_eq!(pool.readiness(), Readiness::Pending);

        clock.advance(Duration::from_millis(1_999));
        assert_eq!(pool.readiness(), Readiness::Pending);

        clock.advance(Duration::from_millis(1));
        assert_eq!(pool.readiness(), Readiness::Timeout);

        pool.receive(update(6, 50));
        assert_eq!(pool.readiness(), Readiness::Quorum);
    }

    #[test]
    fn test_duplicate_origin_first_wins_across_cross_verification() {
        let clock = Arc::new(ManualTimeSource::new(0));
        let mut pools = pools(2, &clock);

        let first = UpdateRecord::new(ClientId(9), vec![1u8], Duration::ZERO, 10).unwrap();
        let second = UpdateRecord::new(ClientId(9), vec![2u8], Duration::ZERO, 10).unwrap();
        assert_eq!(pools[0].receive(first.clone()), ReceiveOutcome::Accepted);
        assert_eq!(pools[0].receive(second.clone()), ReceiveOutcome::Duplicate);
        assert_eq!(pools[1].receive(second.clone()), ReceiveOutcome::Accepted);

        // Both pools already hold client 9; neither copy is replaced.
        assert_eq!(cross_verify_all(&mut pools), 0);
        assert_eq!(pools[0].pending(), &[first]);
        assert_eq!(pools[1].pending(), &[second]);
    }

    #[test]
    fn test_cross_verified_pools_seal_attachable_blocks() {
        let clock = Arc::new(ManualTimeSource::new(5_000));
        let mut pools = pools(3, &clock);
        for origin in 0..9 {
            pools[(origin % 3) as usize].receive(update(origin, 100 + origin as u64));
        }

        assert_eq!(cross_verify_all(&mut pools), 18);
        for pool in &pools {
            assert_eq!(pool.len(), 9);
            assert_eq!(pool.readiness(), Readiness::Quorum);
        }

        let genesis = Block::genesis(0);
        let mut ledger = ForkAwareLedger::new(genesis.clone(), easy_difficulty());
        let sealer = ProofOfWorkSealer::new(easy_difficulty());

        let mut sealed = Vec::new();
        for pool in &mut pools {
            let template = BlockTemplate::new(
                pool.miner_id(),
                genesis.content_hash,
                pool.snapshot_and_reset(),
                clock.now_millis(),
            );
            let block = sealer
                .seal(template, &CancellationFlag::new())
                .unwrap()
                .into_block()
                .unwrap();
            assert!(easy_difficulty().is_satisfied_by(&block.content_hash));
            sealed.push(block);
        }

        // Same update set, different producers: distinct blocks.
        let expected: BTreeSet<ClientId> = (0..9).map(ClientId).collect();
        for block in &sealed {
            assert_eq!(origins(&block.included_updates), expected);
            assert_eq!(block.total_sample_weight(), (100..109).sum::<u64>());
        }

        let outcomes: Vec<AddOutcome> = sealed.iter().cloned().map(|b| ledger.add(b)).collect();
        assert!(matches!(
            outcomes[0],
            AddOutcome::Attached { canonical: CanonicalChange::Advanced, .. }
        ));
        for outcome in &outcomes[1..] {
            assert!(matches!(
                outcome,
                AddOutcome::Attached { height: 1, canonical: CanonicalChange::Unchanged, .. }
            ));
        }
        assert_eq!(ledger.branch_count(), 3);
        assert_eq!(ledger.canonical_tip().content_hash, sealed[0].content_hash);

        for pool in &pools {
            assert!(pool.is_empty());
            assert_eq!(pool.first_update_at(), None);
            assert_eq!(pool.readiness(), Readiness::Pending);
        }
    }
}
