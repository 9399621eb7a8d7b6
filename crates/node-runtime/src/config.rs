//! # Node Configuration
//!
//! Unified configuration for the round driver, the miners and the export.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults
//! 2. TOML file named by `BFL_CONFIG`
//! 3. Environment overrides: `BFL_DIFFICULTY`, `BFL_ROUNDS`, `BFL_MINERS`,
//!    `BFL_CLIENTS`, `BFL_CHAIN_PATH`
//!
//! ```toml
//! [system]
//! num_clients = 10
//! num_miners = 3
//! rounds = 5
//!
//! [miner]
//! difficulty = "000"
//! h = 5
//! delta = 0.2
//! nd = 10
//! t_wait_ms = 2000
//!
//! [output]
//! chain_path = "chain.json"
//! ```

use bfl_01_assembly_pool::{PolicyError, ReadinessPolicy};
use bfl_02_pow_sealer::SealerConfig;
use serde::Deserialize;
use shared_types::Difficulty;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_ENV: &str = "BFL_CONFIG";

/// Complete node configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub system: SystemConfig,
    pub miner: MinerConfig,
    pub output: OutputConfig,
}

/// Population and round settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Simulated clients submitting one update per round.
    pub num_clients: usize,
    /// Miners assembling and sealing blocks.
    pub num_miners: usize,
    /// Rounds to run before exporting.
    pub rounds: u64,
    /// Size of each simulated update payload.
    pub payload_bytes: usize,
    /// Genesis timestamp (unix milliseconds); fixed so every run shares a genesis hash.
    pub genesis_timestamp: u64,
    /// Seed for client simulation; random when unset.
    pub seed: Option<u64>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            num_clients: 10,
            num_miners: 3,
            rounds: 5,
            payload_bytes: 64,
            genesis_timestamp: 0,
            seed: None,
        }
    }
}

/// Assembly and sealing settings shared by every miner.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Hex prefix a sealed block hash must start with.
    pub difficulty: Difficulty,
    /// Baseline quorum.
    pub h: usize,
    /// Fractional slack over `nd`.
    pub delta: f64,
    /// Expected population size.
    pub nd: usize,
    /// Assembly timeout from the first update of a round.
    pub t_wait_ms: u64,
    /// Interval between readiness checks while waiting.
    pub readiness_poll_ms: u64,
    /// Nonces tried between two cancellation checks.
    pub cancel_check_interval: u64,
    /// Abort searches whose predecessor stops being the canonical tip.
    pub cancel_stale_searches: bool,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            h: 5,
            delta: 0.2,
            nd: 10,
            t_wait_ms: 2_000,
            readiness_poll_ms: 100,
            cancel_check_interval: bfl_02_pow_sealer::DEFAULT_CANCEL_CHECK_INTERVAL,
            cancel_stale_searches: false,
        }
    }
}

impl MinerConfig {
    pub fn readiness_policy(&self) -> Result<ReadinessPolicy, PolicyError> {
        ReadinessPolicy::new(
            self.h,
            self.delta,
            self.nd,
            Duration::from_millis(self.t_wait_ms),
        )
    }

    pub fn sealer_config(&self) -> SealerConfig {
        SealerConfig {
            difficulty: self.difficulty.clone(),
            cancel_check_interval: self.cancel_check_interval,
        }
    }

    pub fn readiness_poll(&self) -> Duration {
        Duration::from_millis(self.readiness_poll_ms)
    }
}

/// Export settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where the canonical chain is written after the last round.
    pub chain_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            chain_path: PathBuf::from("chain.json"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl NodeConfig {
    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply `BFL_*` overrides obtained through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prefix) = lookup("BFL_DIFFICULTY") {
            self.miner.difficulty =
                Difficulty::from_prefix(prefix).map_err(|e| ConfigError::InvalidValue {
                    field: "BFL_DIFFICULTY",
                    reason: e.to_string(),
                })?;
        }
        if let Some(value) = lookup("BFL_ROUNDS") {
            self.system.rounds = parse_number("BFL_ROUNDS", &value)?;
        }
        if let Some(value) = lookup("BFL_MINERS") {
            self.system.num_miners = parse_number("BFL_MINERS", &value)?;
        }
        if let Some(value) = lookup("BFL_CLIENTS") {
            self.system.num_clients = parse_number("BFL_CLIENTS", &value)?;
        }
        if let Some(value) = lookup("BFL_CHAIN_PATH") {
            self.output.chain_path = PathBuf::from(value);
        }
        Ok(())
    }

    /// Reject settings the runtime cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.system.num_miners == 0 {
            return Err(ConfigError::InvalidValue {
                field: "system.num_miners",
                reason: "at least one miner is required".to_string(),
            });
        }
        if self.system.num_miners > u32::MAX as usize || self.system.num_clients > u32::MAX as usize
        {
            return Err(ConfigError::InvalidValue {
                field: "system",
                reason: "population does not fit 32-bit identifiers".to_string(),
            });
        }
        if self.miner.readiness_poll_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "miner.readiness_poll_ms",
                reason: "must be positive".to_string(),
            });
        }
        self.miner
            .readiness_policy()
            .map_err(|e| ConfigError::InvalidValue {
                field: "miner",
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })
}

/// Load configuration from `BFL_CONFIG` (if set) and the environment.
pub fn load_config() -> Result<NodeConfig, ConfigError> {
    let mut config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => {
            info!("Loading configuration from {}", path);
            NodeConfig::from_file(&path)?
        }
        Err(_) => NodeConfig::default(),
    };
    config.apply_env_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}
