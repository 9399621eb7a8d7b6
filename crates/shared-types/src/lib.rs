//! # Shared Types Crate
//!
//! This crate contains the data model exchanged between miners, the
//! proof-of-work sealer, the fork-aware ledger and the coordinator.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `UpdateRecord` and `Block` are defined once
//!   here; no subsystem keeps its own block shape.
//! - **Opaque Payloads**: an update's payload is hashed but never interpreted.
//! - **Deterministic Hashing**: a block's content hash is a pure function of
//!   its producer, predecessor, nonce, timestamp and the set of its updates.

pub mod difficulty;
pub mod entities;
pub mod errors;
pub mod hashing;
pub mod time;

pub use difficulty::Difficulty;
pub use entities::*;
pub use errors::TypesError;
pub use hashing::{short_hex, HashHex};
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource};
