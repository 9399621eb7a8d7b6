//! Domain layer for the fork-aware ledger.

pub mod branch;
pub mod error;
pub mod ledger;
pub mod outcome;

pub use branch::Branch;
pub use error::InvalidBlock;
pub use ledger::ForkAwareLedger;
pub use outcome::{AddOutcome, CanonicalChange};
