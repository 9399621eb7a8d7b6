//! Async sealing entry point.
//!
//! The search itself stays in the domain layer; this module only moves it
//! onto tokio's blocking pool so that several miners can seal in parallel
//! without stalling the runtime.

use crate::domain::{BlockTemplate, CancellationFlag, ProofOfWorkSealer, SealOutcome};
use crate::error::{Result, SealerError};
use tracing::error;

impl ProofOfWorkSealer {
    /// Run [`ProofOfWorkSealer::seal`] on the blocking pool.
    ///
    /// # Errors
    /// `TaskFailed` if the blocking task panicked, otherwise whatever the
    /// search itself reports.
    pub async fn seal_async(
        &self,
        template: BlockTemplate,
        cancel: CancellationFlag,
    ) -> Result<SealOutcome> {
        let sealer = self.clone();
        let producer = template.producer_id;
        tokio::task::spawn_blocking(move || sealer.seal(template, &cancel))
            .await
            .map_err(|e| {
                error!("[bfl-02] sealing task for miner {} failed: {}", producer, e);
                SealerError::TaskFailed(e.to_string())
            })?
    }
}
