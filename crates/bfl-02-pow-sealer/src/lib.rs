//! # Proof-of-Work Sealer (Subsystem 2)
//!
//! Turns an assembled, unsealed block into a sealed block whose content hash
//! satisfies the configured [`Difficulty`](shared_types::Difficulty).
//!
//! ## Search
//!
//! The timestamp is fixed once per search; only `seal_nonce` varies, starting
//! at 0. The update-set digest is computed once, so each attempt hashes a
//! fixed-size preimage. There is no upper bound on attempts: a search ends
//! when a nonce is found or when its [`CancellationFlag`] is raised.
//!
//! ## Module Structure
//!
//! - [`domain`]: `BlockTemplate`, `CancellationFlag`, `ProofOfWorkSealer`
//! - [`service`]: async entry point on tokio's blocking pool
//! - [`config`]: `SealerConfig`
//! - [`metrics`]: `SealerMetrics` counters
//! - [`error`]: `SealerError`

pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod service;

pub use config::SealerConfig;
pub use domain::{BlockTemplate, CancellationFlag, ProofOfWorkSealer, SealOutcome};
pub use error::{Result, SealerError};
pub use metrics::SealerMetrics;

/// Default number of nonces between cancellation checks.
pub const DEFAULT_CANCEL_CHECK_INTERVAL: u64 = 4096;
