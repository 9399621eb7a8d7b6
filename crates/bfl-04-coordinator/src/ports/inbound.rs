//! Driving ports (Inbound API)

use crate::error::Result;
use async_trait::async_trait;
use bfl_03_fork_ledger::AddOutcome;
use shared_types::Block;
use std::path::PathBuf;
use std::sync::Arc;

/// Primary ledger API used by miner workers and the runtime.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// Submit a sealed block. Orphaned, duplicate and invalid blocks are
    /// outcomes, not errors.
    async fn submit(&self, block: Block) -> Result<AddOutcome>;

    /// Last block of the canonical branch
    async fn canonical_tip(&self) -> Result<Arc<Block>>;

    /// Canonical tip together with its height, read in one step
    async fn canonical_head(&self) -> Result<(Arc<Block>, u64)>;

    /// Canonical branch, genesis first
    async fn canonical_chain(&self) -> Result<Vec<Arc<Block>>>;

    /// Persist the canonical branch; returns the number of records written
    async fn export(&self, path: PathBuf) -> Result<usize>;
}
