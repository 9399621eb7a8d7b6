//! # Fork Resolution Through the Coordinator
//!
//! Sealed blocks are submitted through `CoordinatorHandle` (the `LedgerApi`
//! port), so every ledger mutation goes through the coordinator task.
//!
//! ## Scenarios
//!
//! 1. Concurrent fork: two blocks on genesis, either order
//! 2. Reattachment: child before parent
//! 3. Tampered payload rejected without touching ledger state
//! 4. Deterministic canonical tip for a fixed submission sequence
//! 5. Work and hash invariants for any submission order

#[cfg(test)]
mod tests {
    use super::super::fixtures::{easy_difficulty, seal_on};
    use bfl_03_fork_ledger::{AddOutcome, CanonicalChange, ForkAwareLedger};
    use bfl_04_coordinator::{Coordinator, CoordinatorHandle, CoordinatorService, LedgerApi};
    use proptest::prelude::*;
    use shared_types::{Block, Hash};
    use std::sync::Arc;

    fn start() -> (CoordinatorHandle, Block) {
        let genesis = Block::genesis(0);
        let (handle, _task) = CoordinatorService::spawn(
            Coordinator::new(genesis.clone(), easy_difficulty()),
            16,
        );
        (handle, genesis)
    }

    async fn tip_hash(handle: &CoordinatorHandle) -> Hash {
        handle.canonical_tip().await.unwrap().content_hash
    }

    #[tokio::test]
    async fn test_concurrent_fork_in_either_order() {
        for flip in [false, true] {
            let (handle, genesis) = start();
            let a1 = seal_on(&genesis, 0, &[1, 2]);
            let b1 = seal_on(&genesis, 1, &[1, 2]);
            let (first, second) = if flip { (b1, a1) } else { (a1, b1) };

            let first_outcome = handle.submit(first.clone()).await.unwrap();
            let second_outcome = handle.submit(second.clone()).await.unwrap();
            assert!(matches!(
                first_outcome,
                AddOutcome::Attached { height: 1, canonical: CanonicalChange::Advanced, .. }
            ));
            assert!(matches!(
                second_outcome,
                AddOutcome::Attached { height: 1, canonical: CanonicalChange::Unchanged, .. }
            ));
            assert_eq!(tip_hash(&handle).await, first.content_hash);

            // Resubmitting either block changes nothing.
            for block in [second.clone(), first.clone(), second.clone()] {
                assert!(matches!(
                    handle.submit(block).await.unwrap(),
                    AddOutcome::Duplicate { .. }
                ));
                assert_eq!(tip_hash(&handle).await, first.content_hash);
            }
            assert_eq!(handle.metrics().get_duplicates(), 3);
            assert_eq!(handle.metrics().get_reorganizations(), 0);
        }
    }

    #[tokio::test]
    async fn test_parallel_submitters_converge() {
        let (handle, genesis) = start();
        let a1 = seal_on(&genesis, 0, &[1]);
        let b1 = seal_on(&genesis, 1, &[1]);

        let tasks: Vec<_> = [a1.clone(), b1.clone()]
            .into_iter()
            .map(|block| {
                let handle = handle.clone();
                tokio::spawn(async move { handle.submit(block).await.unwrap() })
            })
            .collect();

        let mut advanced = Vec::new();
        for task in tasks {
            let outcome = task.await.unwrap();
            if let AddOutcome::Attached { hash, canonical: CanonicalChange::Advanced, .. } = outcome {
                advanced.push(hash);
            }
        }
        // Exactly one submission won the race and stays canonical.
        assert_eq!(advanced.len(), 1);
        assert_eq!(tip_hash(&handle).await, advanced[0]);
        assert_eq!(handle.current_tip_hash(), advanced[0]);

        // A block on the losing branch makes it strictly heavier.
        let loser = if advanced[0] == a1.content_hash { &b1 } else { &a1 };
        let extension = seal_on(loser, 2, &[3]);
        assert!(matches!(
            handle.submit(extension.clone()).await.unwrap(),
            AddOutcome::Attached { height: 2, canonical: CanonicalChange::Reorganized { depth: 1 }, .. }
        ));
        assert_eq!(tip_hash(&handle).await, extension.content_hash);
    }

    #[tokio::test]
    async fn test_child_before_parent_reattaches() {
        let (handle, genesis) = start();
        let a = seal_on(&genesis, 0, &[1]);
        let b = seal_on(&a, 1, &[2]);
        let c = seal_on(&b, 2, &[3]);

        assert_eq!(
            handle.submit(c.clone()).await.unwrap(),
            AddOutcome::Orphaned { hash: c.content_hash, missing_parent: b.content_hash }
        );
        assert_eq!(
            handle.submit(b.clone()).await.unwrap(),
            AddOutcome::Orphaned { hash: b.content_hash, missing_parent: a.content_hash }
        );
        assert_eq!(tip_hash(&handle).await, genesis.content_hash);

        match handle.submit(a.clone()).await.unwrap() {
            AddOutcome::Attached { hash, height, reattached, canonical } => {
                assert_eq!(hash, a.content_hash);
                assert_eq!(height, 1);
                assert_eq!(reattached, vec![b.content_hash, c.content_hash]);
                assert_eq!(canonical, CanonicalChange::Advanced);
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        let chain: Vec<Hash> = handle
            .canonical_chain()
            .await
            .unwrap()
            .iter()
            .map(|b| b.content_hash)
            .collect();
        assert_eq!(
            chain,
            vec![genesis.content_hash, a.content_hash, b.content_hash, c.content_hash]
        );
        assert_eq!(handle.metrics().get_orphaned(), 2);
        assert_eq!(handle.metrics().get_reattached(), 2);
    }

    #[tokio::test]
    async fn test_tampered_block_leaves_ledger_untouched() {
        let (handle, genesis) = start();
        let a = seal_on(&genesis, 0, &[1, 2]);
        handle.submit(a.clone()).await.unwrap();
        let before = handle.canonical_chain().await.unwrap();

        let mut forged = seal_on(&a, 1, &[3, 4]);
        let mut bytes = forged.included_updates[1].payload.to_vec();
        bytes[0] ^= 0x01;
        forged.included_updates[1].payload = bytes.into();

        let outcome = handle.submit(forged.clone()).await.unwrap();
        assert!(outcome.is_invalid());
        assert_eq!(handle.canonical_chain().await.unwrap(), before);
        assert_eq!(handle.metrics().get_invalid(), 1);

        // The untampered block at the same hash is still accepted afterwards.
        let honest = seal_on(&a, 1, &[3, 4]);
        assert_eq!(honest.content_hash, forged.content_hash);
        assert!(handle.submit(honest).await.unwrap().is_attached());
    }

    #[tokio::test]
    async fn test_same_sequence_same_tip() {
        let genesis = Block::genesis(0);
        let a1 = seal_on(&genesis, 0, &[1]);
        let b1 = seal_on(&genesis, 1, &[1]);
        let a2 = seal_on(&a1, 0, &[2]);
        let b2 = seal_on(&b1, 1, &[2]);
        let sequence = vec![b2, a1, b1, a2];

        let mut tips = Vec::new();
        for _ in 0..3 {
            let (handle, _) = start();
            for block in sequence.clone() {
                handle.submit(block).await.unwrap();
            }
            tips.push(tip_hash(&handle).await);
        }
        assert!(tips.windows(2).all(|w| w[0] == w[1]));
    }

    /// Genesis plus a small tree: each entry picks an earlier block as parent.
    fn sealed_tree(parents: &[usize]) -> (Block, Vec<Block>) {
        let genesis = Block::genesis(0);
        let mut all = vec![genesis.clone()];
        for (i, parent) in parents.iter().enumerate() {
            let parent = all[parent % all.len()].clone();
            all.push(seal_on(&parent, i as u32, &[i as u32]));
        }
        all.remove(0);
        (genesis, all)
    }

    fn check_invariants(ledger: &ForkAwareLedger) -> Result<(), TestCaseError> {
        let canonical = ledger.canonical();
        for branch in ledger.branches() {
            prop_assert!(canonical.work() >= branch.work());
        }
        for block in canonical.blocks() {
            prop_assert!(block.has_valid_hash());
        }
        prop_assert!(canonical.is_linked());
        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_invariants_for_any_submission_order(
            (parents, order) in prop::collection::vec(any::<usize>(), 1..7)
                .prop_flat_map(|parents| {
                    let n = parents.len();
                    (Just(parents), Just((0..n).collect::<Vec<_>>()).prop_shuffle())
                })
        ) {
            let (genesis, blocks) = sealed_tree(&parents);
            let mut ledger = ForkAwareLedger::new(genesis, easy_difficulty());
            for index in order {
                ledger.add(blocks[index].clone());
                check_invariants(&ledger)?;
            }
            prop_assert_eq!(ledger.orphan_count(), 0);
            prop_assert_eq!(ledger.block_count(), blocks.len() + 1);

            let before = Arc::clone(ledger.canonical_tip());
            prop_assert_eq!(ledger.resolve(), CanonicalChange::Unchanged);
            prop_assert_eq!(&before, ledger.canonical_tip());
        }
    }
}
