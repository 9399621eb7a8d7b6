//! Domain layer for proof-of-work sealing (synchronous, CPU-bound)

pub mod cancel;
pub mod sealer;
pub mod template;

pub use cancel::CancellationFlag;
pub use sealer::{ProofOfWorkSealer, SealOutcome};
pub use template::BlockTemplate;
