//! Coordinator actor.
//!
//! The [`Coordinator`] is moved into a tokio task that drains a command
//! queue one message at a time; ledger mutation is therefore serialized no
//! matter how many [`CoordinatorHandle`] clones submit concurrently. After
//! every submission the canonical tip hash is published on a `watch`
//! channel. Exports snapshot the canonical branch inside the task and write
//! the file on the blocking pool, so a slow disk never stalls submissions.

use crate::domain::{write_chain_file, Coordinator};
use crate::error::{CoordinatorError, ExportError, Result};
use crate::metrics::CoordinatorMetrics;
use crate::ports::LedgerApi;
use async_trait::async_trait;
use bfl_03_fork_ledger::AddOutcome;
use shared_types::{short_hex, Block, Hash};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

enum Command {
    Submit {
        block: Block,
        reply: oneshot::Sender<AddOutcome>,
    },
    CanonicalTip {
        reply: oneshot::Sender<Arc<Block>>,
    },
    CanonicalHead {
        reply: oneshot::Sender<(Arc<Block>, u64)>,
    },
    CanonicalChain {
        reply: oneshot::Sender<Vec<Arc<Block>>>,
    },
    Export {
        path: PathBuf,
        reply: oneshot::Sender<std::result::Result<usize, ExportError>>,
    },
}

/// Spawns the coordinator task.
pub struct CoordinatorService;

impl CoordinatorService {
    /// Move `coordinator` into a new task.
    ///
    /// The task stops once every handle is dropped and hands the coordinator
    /// back through its `JoinHandle`.
    pub fn spawn(
        coordinator: Coordinator,
        queue_capacity: usize,
    ) -> (CoordinatorHandle, JoinHandle<Coordinator>) {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let (tip_tx, tip_rx) = watch::channel(coordinator.canonical_tip().content_hash);
        let metrics = Arc::clone(coordinator.metrics());

        let task = tokio::spawn(run(coordinator, rx, tip_tx));
        info!("[bfl-04] coordinator service started");

        (
            CoordinatorHandle {
                tx,
                tip: tip_rx,
                metrics,
            },
            task,
        )
    }
}

async fn run(
    mut coordinator: Coordinator,
    mut rx: mpsc::Receiver<Command>,
    tip_tx: watch::Sender<Hash>,
) -> Coordinator {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Submit { block, reply } => {
                let outcome = coordinator.submit(block);
                let tip = coordinator.canonical_tip().content_hash;
                tip_tx.send_if_modified(|current| {
                    if *current == tip {
                        return false;
                    }
                    *current = tip;
                    true
                });
                // The submitter may have given up waiting.
                let _ = reply.send(outcome);
            }
            Command::CanonicalTip { reply } => {
                let _ = reply.send(coordinator.canonical_tip());
            }
            Command::CanonicalHead { reply } => {
                let _ = reply.send((coordinator.canonical_tip(), coordinator.canonical_height()));
            }
            Command::CanonicalChain { reply } => {
                let _ = reply.send(coordinator.canonical_chain());
            }
            Command::Export { path, reply } => {
                let chain = coordinator.canonical_chain();
                tokio::spawn(async move {
                    let _ = reply.send(export_snapshot(path, chain).await);
                });
            }
        }
    }

    info!(
        "[bfl-04] coordinator service stopped at tip {}",
        short_hex(&coordinator.canonical_tip().content_hash)
    );
    coordinator
}

async fn export_snapshot(
    path: PathBuf,
    chain: Vec<Arc<Block>>,
) -> std::result::Result<usize, ExportError> {
    tokio::task::spawn_blocking(move || {
        let written = write_chain_file(&path, &chain)?;
        info!(
            "[bfl-04] exported {} block(s) to {}",
            written,
            path.display()
        );
        Ok::<_, ExportError>(written)
    })
    .await
    .map_err(|e| {
        error!("[bfl-04] export task failed: {}", e);
        ExportError::TaskFailed(e.to_string())
    })?
}

/// Cloneable handle to a running coordinator.
#[derive(Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::Sender<Command>,
    tip: watch::Receiver<Hash>,
    metrics: Arc<CoordinatorMetrics>,
}

impl CoordinatorHandle {
    /// Receiver that observes every canonical tip change.
    pub fn subscribe_tip(&self) -> watch::Receiver<Hash> {
        self.tip.clone()
    }

    /// Most recently published canonical tip hash.
    pub fn current_tip_hash(&self) -> Hash {
        *self.tip.borrow()
    }

    pub fn metrics(&self) -> &Arc<CoordinatorMetrics> {
        &self.metrics
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| CoordinatorError::ServiceStopped)?;
        response.await.map_err(|_| CoordinatorError::ServiceStopped)
    }
}

#[async_trait]
impl LedgerApi for CoordinatorHandle {
    async fn submit(&self, block: Block) -> Result<AddOutcome> {
        debug!(
            "[bfl-04] queueing {} from miner {}",
            short_hex(&block.content_hash),
            block.producer_id
        );
        self.request(|reply| Command::Submit { block, reply }).await
    }

    async fn canonical_tip(&self) -> Result<Arc<Block>> {
        self.request(|reply| Command::CanonicalTip { reply }).await
    }

    async fn canonical_head(&self) -> Result<(Arc<Block>, u64)> {
        self.request(|reply| Command::CanonicalHead { reply }).await
    }

    async fn canonical_chain(&self) -> Result<Vec<Arc<Block>>> {
        self.request(|reply| Command::CanonicalChain { reply }).await
    }

    async fn export(&self, path: PathBuf) -> Result<usize> {
        Ok(self
            .request(|reply| Command::Export { path, reply })
            .await??)
    }
}
