//! # Chain Export
//!
//! The canonical branch is persisted as a pretty-printed JSON array, one
//! record per block, genesis first. Payloads are omitted, so an export can
//! be checked for linkage and difficulty but its hashes cannot be recomputed.
//!
//! ```json
//! [
//!   {
//!     "producer_id": -1,
//!     "timestamp": 0,
//!     "seal_nonce": 0,
//!     "content_hash": "3f1c…",
//!     "predecessor_hash": "0000…",
//!     "num_updates": 0,
//!     "origin_ids": []
//!   }
//! ]
//! ```

use crate::error::ExportError;
use serde::{Deserialize, Serialize};
use shared_types::hashing::parse_hash;
use shared_types::{Block, ClientId, Difficulty, HashHex, MinerId, ZERO_HASH};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

/// One exported block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRecord {
    /// Producer, `-1` for genesis.
    pub producer_id: i64,
    /// Unix milliseconds.
    pub timestamp: u64,
    pub seal_nonce: u64,
    /// Lowercase hex.
    pub content_hash: String,
    /// Lowercase hex.
    pub predecessor_hash: String,
    pub num_updates: usize,
    /// Origins in inclusion order.
    pub origin_ids: Vec<ClientId>,
}

impl From<&Block> for ChainRecord {
    fn from(block: &Block) -> Self {
        Self {
            producer_id: block.producer_id.export_id(),
            timestamp: block.timestamp,
            seal_nonce: block.seal_nonce,
            content_hash: block.content_hash.to_hex(),
            predecessor_hash: block.predecessor_hash.to_hex(),
            num_updates: block.included_updates.len(),
            origin_ids: block.origin_ids().collect(),
        }
    }
}

/// Write `blocks` as pretty JSON. Returns the number of records written.
pub fn write_chain_records<W: Write>(
    mut writer: W,
    blocks: &[Arc<Block>],
) -> Result<usize, ExportError> {
    let records: Vec<ChainRecord> = blocks.iter().map(|b| ChainRecord::from(b.as_ref())).collect();
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(records.len())
}

/// Write `blocks` to a file, replacing it if present.
pub fn write_chain_file(
    path: impl AsRef<Path>,
    blocks: &[Arc<Block>],
) -> Result<usize, ExportError> {
    let file = File::create(path)?;
    write_chain_records(BufWriter::new(file), blocks)
}

/// Read an export.
pub fn load_chain_records<R: Read>(reader: R) -> Result<Vec<ChainRecord>, ExportError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Read an export from a file.
pub fn load_chain_file(path: impl AsRef<Path>) -> Result<Vec<ChainRecord>, ExportError> {
    let file = File::open(path)?;
    load_chain_records(BufReader::new(file))
}

/// Check that an export is a well-formed chain.
///
/// The first record must be a genesis record, every later record must
/// extend its predecessor and satisfy `difficulty`, and no record may list
/// an origin twice.
pub fn verify_chain_records(
    records: &[ChainRecord],
    difficulty: &Difficulty,
) -> Result<(), ExportError> {
    let first = records.first().ok_or(ExportError::Empty)?;
    if MinerId::from_export_id(first.producer_id) != Some(MinerId::GENESIS)
        || parse_field(0, "predecessor_hash", &first.predecessor_hash)? != ZERO_HASH
    {
        return Err(ExportError::InvalidRecord {
            index: 0,
            reason: "first record is not a genesis record".to_string(),
        });
    }

    let mut previous = parse_field(0, "content_hash", &first.content_hash)?;
    for (index, record) in records.iter().enumerate().skip(1) {
        let hash = parse_field(index, "content_hash", &record.content_hash)?;
        let predecessor = parse_field(index, "predecessor_hash", &record.predecessor_hash)?;

        match MinerId::from_export_id(record.producer_id) {
            Some(id) if !id.is_genesis() => {}
            _ => {
                return Err(ExportError::InvalidRecord {
                    index,
                    reason: format!("invalid producer id {}", record.producer_id),
                })
            }
        }
        if predecessor != previous {
            return Err(ExportError::BrokenLink { index });
        }
        if !difficulty.is_satisfied_by(&hash) {
            return Err(ExportError::InvalidRecord {
                index,
                reason: format!("hash does not satisfy {difficulty}"),
            });
        }
        check_origins(index, record)?;
        previous = hash;
    }
    Ok(())
}

fn parse_field(
    index: usize,
    field: &str,
    value: &str,
) -> Result<shared_types::Hash, ExportError> {
    parse_hash(value).map_err(|e| ExportError::InvalidRecord {
        index,
        reason: format!("{field}: {e}"),
    })
}

fn check_origins(index: usize, record: &ChainRecord) -> Result<(), ExportError> {
    if record.num_updates != record.origin_ids.len() {
        return Err(ExportError::InvalidRecord {
            index,
            reason: format!(
                "num_updates {} but {} origin ids",
                record.num_updates,
                record.origin_ids.len()
            ),
        });
    }
    let mut seen = HashSet::with_capacity(record.origin_ids.len());
    if let Some(origin) = record.origin_ids.iter().find(|o| !seen.insert(**o)) {
        return Err(ExportError::InvalidRecord {
            index,
            reason: format!("client {origin} listed twice"),
        });
    }
    Ok(())
}
