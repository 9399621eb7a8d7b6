//! # Node Runtime Library
//!
//! Wires the consensus subsystems into a runnable node. The `bfl-node`
//! binary is a thin wrapper around [`runtime::NodeRuntime`].
//!
//! ## Modules
//!
//! - [`config`]: TOML and environment configuration
//! - [`clients`]: simulated update producers
//! - [`miner`]: per-miner seal-and-submit worker
//! - [`round`]: distribution, readiness, parallel sealing per round
//! - [`aggregator`]: canonical tip hand-off
//! - [`runtime`]: construction and lifecycle

pub mod aggregator;
pub mod clients;
pub mod config;
pub mod error;
pub mod miner;
pub mod round;
pub mod runtime;

pub use error::{Result, RuntimeError};
pub use runtime::NodeRuntime;
