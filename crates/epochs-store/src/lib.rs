// crates/epochs-store/src/lib.rs
//
// epochs-store: Storage layer for the Epochs scheduler.
//
// Provides an in-memory store ordered by identifier, a RocksDB-backed
// persistent store, and the host-side administrative helpers (adding,
// deleting, listing records and importing/exporting genesis state).

pub mod admin;
pub mod memory;
pub mod rocks;

// Re-export key types for ergonomic access from downstream crates.
pub use admin::{
    add_epoch_record, all_epoch_records, delete_epoch_record, export_genesis, init_genesis,
};
pub use memory::MemoryEpochStore;
pub use rocks::RocksEpochStore;
