//! # Domain Layer - Assembly Pool Subsystem
//!
//! Pure business logic: no I/O, no async. Time is read through the
//! `TimeSource` port from `shared-types`.
//!
//! ## Components
//!
//! - `policy`: ReadinessPolicy (quorum threshold and `T_wait`)
//! - `pool`: AssemblyPool with origin dedup and cross-verification
//! - `errors`: PolicyError enumeration

pub mod errors;
pub mod policy;
pub mod pool;

pub use errors::*;
pub use policy::*;
pub use pool::*;
