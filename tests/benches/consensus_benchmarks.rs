//! # BlockFL Consensus Benchmarks
//!
//! | Subsystem | Operation | Expectation |
//! |-----------|-----------|-------------|
//! | shared-types | content hash | dominated by update digests |
//! | bfl-02 PoW Sealer | seal | ~16^k attempts for a k-digit prefix |
//! | bfl-03 Fork Ledger | add | amortized O(1) per attached block |
//! | bfl-01 Assembly Pool | cross-verify | linear in pending records |

use bfl_01_assembly_pool::{cross_verify_all, AssemblyPool, ReadinessPolicy};
use bfl_02_pow_sealer::{BlockTemplate, CancellationFlag, ProofOfWorkSealer};
use bfl_03_fork_ledger::ForkAwareLedger;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use shared_types::{Block, ClientId, Difficulty, ManualTimeSource, MinerId, UpdateRecord};
use std::sync::Arc;
use std::time::Duration;

fn random_updates(count: u32, payload_bytes: usize) -> Vec<UpdateRecord> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let mut payload = vec![0u8; payload_bytes];
            rng.fill(payload.as_mut_slice());
            UpdateRecord::new(ClientId(i), payload, Duration::from_millis(100), 500)
                .expect("positive weight")
        })
        .collect()
}

// ============================================================================
// Content hashing
// ============================================================================

fn bench_content_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared-types-content-hash");

    for count in [1u32, 10, 100] {
        let block = Block {
            producer_id: MinerId(0),
            included_updates: random_updates(count, 1_024),
            predecessor_hash: [7u8; 32],
            seal_nonce: 42,
            timestamp: 1_700_000_000_000,
            content_hash: [0u8; 32],
        };
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("compute_hash", count), &block, |b, block| {
            b.iter(|| black_box(block.compute_hash()))
        });
    }

    group.finish();
}

// ============================================================================
// bfl-02: sealing
// ============================================================================

fn bench_sealing(c: &mut Criterion) {
    let mut group = c.benchmark_group("bfl-02-pow-sealer");
    group.sample_size(20);

    let updates = random_updates(10, 256);
    for prefix in ["0", "00", "000"] {
        let sealer = ProofOfWorkSealer::new(Difficulty::from_prefix(prefix).expect("hex prefix"));
        group.bench_with_input(BenchmarkId::new("seal", prefix), &updates, |b, updates| {
            let mut timestamp = 0u64;
            b.iter(|| {
                // A fresh timestamp per iteration changes the search space.
                timestamp += 1;
                let template =
                    BlockTemplate::new(MinerId(0), [1u8; 32], updates.clone(), timestamp);
                black_box(sealer.seal(template, &CancellationFlag::new()).expect("sealed"))
            })
        });
    }

    group.finish();
}

// ============================================================================
// bfl-03: ledger insertion
// ============================================================================

/// A linear chain of `len` blocks on `genesis` under trivial difficulty.
fn linear_chain(genesis: &Block, len: usize) -> Vec<Block> {
    let mut parent = genesis.clone();
    let mut chain = Vec::with_capacity(len);
    for i in 0..len {
        let mut block = Block {
            producer_id: MinerId((i % 3) as u32),
            included_updates: random_updates(4, 32),
            predecessor_hash: parent.content_hash,
            seal_nonce: 0,
            timestamp: parent.timestamp + 1,
            content_hash: [0u8; 32],
        };
        block.content_hash = block.compute_hash();
        parent = block.clone();
        chain.push(block);
    }
    chain
}

fn bench_ledger_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("bfl-03-fork-ledger");
    let genesis = Block::genesis(0);

    for len in [100usize, 1_000] {
        let chain = linear_chain(&genesis, len);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("add_in_order", len), &chain, |b, chain| {
            b.iter(|| {
                let mut ledger = ForkAwareLedger::new(genesis.clone(), Difficulty::trivial());
                for block in chain {
                    black_box(ledger.add(block.clone()));
                }
            })
        });

        // Worst case for the orphan pool: everything arrives before its parent.
        group.bench_with_input(BenchmarkId::new("add_reversed", len), &chain, |b, chain| {
            b.iter(|| {
                let mut ledger = ForkAwareLedger::new(genesis.clone(), Difficulty::trivial());
                for block in chain.iter().rev() {
                    black_box(ledger.add(block.clone()));
                }
            })
        });
    }

    group.finish();
}

// ============================================================================
// bfl-01: cross-verification
// ============================================================================

fn bench_cross_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("bfl-01-assembly-pool");
    let clock = Arc::new(ManualTimeSource::new(0));

    for clients in [10u32, 100] {
        let updates = random_updates(clients, 64);
        group.bench_with_input(
            BenchmarkId::new("cross_verify_all_3_miners", clients),
            &updates,
            |b, updates| {
                b.iter(|| {
                    let mut pools: Vec<AssemblyPool> = (0..3)
                        .map(|i| {
                            AssemblyPool::new(MinerId(i), ReadinessPolicy::default(), clock.clone())
                        })
                        .collect();
                    for (i, update) in updates.iter().enumerate() {
                        pools[i % 3].receive(update.clone());
                    }
                    black_box(cross_verify_all(&mut pools))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_content_hash,
    bench_sealing,
    bench_ledger_add,
    bench_cross_verify
);
criterion_main!(benches);
