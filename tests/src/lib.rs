//! # BlockFL Test Suite
//!
//! Scenarios that cross crate boundaries. Per-crate behaviour is tested
//! beside the code.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── assembly_flow.rs     # pools → sealer → ledger
//!     ├── fork_resolution.rs   # forks, orphans, tampering through the coordinator
//!     └── runtime_rounds.rs    # full node rounds and chain export
//!
//! tests/benches/
//! └── consensus_benchmarks.rs  # sealing and ledger insertion
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p bfl-tests
//! cargo test -p bfl-tests integration::fork_resolution::
//! cargo bench -p bfl-tests
//! ```

pub mod integration;
