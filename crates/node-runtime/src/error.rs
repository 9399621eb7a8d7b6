//! Runtime error type.

use crate::config::ConfigError;
use bfl_01_assembly_pool::PolicyError;
use bfl_02_pow_sealer::SealerError;
use bfl_04_coordinator::CoordinatorError;
use shared_types::TypesError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Failures that stop the round driver.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Readiness policy: {0}")]
    Policy(#[from] PolicyError),

    #[error("Update construction: {0}")]
    Types(#[from] TypesError),

    #[error("Sealing: {0}")]
    Sealer(#[from] SealerError),

    #[error("Coordinator: {0}")]
    Coordinator(#[from] CoordinatorError),

    #[error("Miner task failed: {0}")]
    Task(String),
}
