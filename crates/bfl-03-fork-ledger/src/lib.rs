//! # Fork-Aware Ledger (Subsystem 3)
//!
//! Owns every known branch and every orphan block, attaches sealed blocks and
//! selects the canonical branch by cumulative work.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Every branch links genesis to its tip by `predecessor_hash` | `domain/ledger.rs` - `attach()` |
//! | Canonical work ≥ work of every branch | `domain/ledger.rs` - `resolve()` |
//! | A block is never both orphaned and attached | `domain/ledger.rs` - `add()` |
//! | Each hash is attached at most once | `domain/ledger.rs` - duplicate check |
//! | Invalid blocks leave no trace | `domain/ledger.rs` - `validate()` |
//!
//! ## Block Lifecycle
//!
//! ```text
//!                      ┌──→ Invalid (dropped)
//!   add(block) ────────┼──→ Duplicate (no-op)
//!                      ├──→ Orphaned ──(parent attaches)──┐
//!                      └──→ Attached ←────────────────────┘
//!                               │
//!                           resolve()
//!                               │
//!                    Canonical | NonCanonical
//! ```
//!
//! ## Fork Choice
//!
//! Every block contributes one unit of work. The current canonical branch is
//! kept unless another branch has strictly more work. When the canonical
//! branch must change, a branch extending the old canonical tip is preferred;
//! remaining ties go to the lexicographically smallest tip hash.

pub mod domain;

pub use domain::{AddOutcome, Branch, CanonicalChange, ForkAwareLedger, InvalidBlock};
