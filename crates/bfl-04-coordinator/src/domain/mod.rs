//! Domain layer: the synchronous coordinator and the export format.

pub mod coordinator;
pub mod persistence;

pub use coordinator::Coordinator;
pub use persistence::{
    load_chain_file, load_chain_records, verify_chain_records, write_chain_file,
    write_chain_records, ChainRecord,
};
