//! # Assembly Pool Subsystem
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! Buffers the update records a miner has received during a round and decides
//! when enough have accumulated to seal a block.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | One pending record per origin (first wins) | `domain/pool.rs` - `receive()` |
//! | Insertion order preserved | `domain/pool.rs` - `pending` is a `Vec` |
//! | Round clock starts at the first record | `domain/pool.rs` - `admit()` |
//! | `threshold = h + floor(delta * nd)` | `domain/policy.rs` - `threshold()` |
//!
//! ## Round Lifecycle
//!
//! ```text
//! receive()* ──→ cross_verify() ──→ readiness() ∈ {Quorum, Timeout} ──→ snapshot_and_reset()
//!                  (barrier)                                              (round ends)
//! ```
//!
//! Readiness is reached by quorum (`len ≥ threshold`) or by timeout
//! (`T_wait` elapsed since the first record). Timeout is a liveness path, not
//! a failure: it guarantees progress when the quorum is unreachable.

pub mod domain;

pub use domain::{
    cross_verify_all, AssemblyPool, PolicyError, Readiness, ReadinessPolicy, ReceiveOutcome,
};

/// Subsystem identifier used in log tags
pub const SUBSYSTEM_ID: u8 = 1;
