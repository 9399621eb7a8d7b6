//! Cross-subsystem scenarios.

pub mod assembly_flow;
pub mod fork_resolution;
pub mod runtime_rounds;

#[cfg(test)]
pub(crate) mod fixtures {
    use bfl_02_pow_sealer::{BlockTemplate, CancellationFlag, ProofOfWorkSealer};
    use shared_types::{Block, ClientId, Difficulty, MinerId, UpdateRecord};
    use std::time::Duration;

    /// One-hex-digit difficulty: cheap to seal, still a real search.
    pub fn easy_difficulty() -> Difficulty {
        Difficulty::from_prefix("0").unwrap()
    }

    pub fn update(origin: u32, weight: u64) -> UpdateRecord {
        UpdateRecord::new(
            ClientId(origin),
            vec![origin as u8, 0xAB, 0xCD],
            Duration::from_millis(origin as u64 * 10),
            weight,
        )
        .unwrap()
    }

    pub fn updates(origins: &[u32]) -> Vec<UpdateRecord> {
        origins.iter().map(|o| update(*o, 100)).collect()
    }

    /// Seal a block on `parent` with the real sealer.
    pub fn seal_on(parent: &Block, producer: u32, origins: &[u32]) -> Block {
        let template = BlockTemplate::new(
            MinerId(producer),
            parent.content_hash,
            updates(origins),
            parent.timestamp + 1_000,
        );
        ProofOfWorkSealer::new(easy_difficulty())
            .seal(template, &CancellationFlag::new())
            .unwrap()
            .into_block()
            .unwrap()
    }
}
