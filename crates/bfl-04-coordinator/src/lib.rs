//! # Coordinator (Subsystem 4)
//!
//! Single writer of the [`ForkAwareLedger`](bfl_03_fork_ledger::ForkAwareLedger).
//! Miners submit sealed blocks concurrently; the coordinator applies them one
//! at a time and exposes the canonical branch.
//!
//! ## Architecture
//!
//! ```text
//!   miner 0 ─┐
//!   miner 1 ─┼──→ CoordinatorHandle ──(mpsc)──→ CoordinatorService task
//!   miner n ─┘         │                               │ owns
//!                      │ ←──(oneshot reply)────────────┤
//!                      │ ←──(watch: canonical tip)─────┘
//!                                                  Coordinator ──→ ForkAwareLedger
//! ```
//!
//! ## Module Structure
//!
//! - [`domain`]: synchronous `Coordinator` and the chain export format
//! - [`ports`]: `LedgerApi` inbound port
//! - [`service`]: actor task and its cloneable handle
//! - [`metrics`]: submission outcome counters
//! - [`error`]: `CoordinatorError`, `ExportError`

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use domain::{
    load_chain_file, load_chain_records, verify_chain_records, write_chain_file,
    write_chain_records, ChainRecord, Coordinator,
};
pub use error::{CoordinatorError, ExportError, Result};
pub use metrics::CoordinatorMetrics;
pub use ports::LedgerApi;
pub use service::{CoordinatorHandle, CoordinatorService};

/// Default capacity of the submission queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;
