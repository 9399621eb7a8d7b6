//! Simulated clients.
//!
//! Stand-ins for the participants that produce updates. Each round every
//! client emits one update with a random opaque payload and delivers it to a
//! randomly chosen miner.

use rand::Rng;
use shared_types::{ClientId, TypesError, UpdateRecord};
use std::ops::RangeInclusive;
use std::time::Duration;

/// Range of simulated local computation time, in milliseconds.
const COMPUTATION_MS: RangeInclusive<u64> = 50..=2_000;

/// Range of simulated sample counts.
const SAMPLE_WEIGHT: RangeInclusive<u64> = 100..=1_000;

#[derive(Debug, Clone)]
pub struct SimulatedClient {
    id: ClientId,
    payload_bytes: usize,
    sample_weight: u64,
}

impl SimulatedClient {
    /// A client with a fixed dataset size drawn from `rng`.
    pub fn new<R: Rng>(id: ClientId, payload_bytes: usize, rng: &mut R) -> Self {
        Self {
            id,
            payload_bytes,
            sample_weight: rng.gen_range(SAMPLE_WEIGHT),
        }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn sample_weight(&self) -> u64 {
        self.sample_weight
    }

    /// Produce this round's update.
    pub fn produce_update<R: Rng>(&self, rng: &mut R) -> Result<UpdateRecord, TypesError> {
        let mut payload = vec![0u8; self.payload_bytes];
        rng.fill(payload.as_mut_slice());
        let computation_time = Duration::from_millis(rng.gen_range(COMPUTATION_MS));
        UpdateRecord::new(self.id, payload, computation_time, self.sample_weight)
    }
}
