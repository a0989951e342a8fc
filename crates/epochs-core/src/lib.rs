// crates/epochs-core/src/lib.rs
//
// epochs-core: Core types, events, errors, and collaborator traits for the
// Epochs scheduler.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines the persisted EpochRecord, the events emitted at epoch
// boundaries, the error taxonomy, and the trait interfaces for the store
// and lifecycle sinks that the scheduler drives.

pub mod error;
pub mod event;
pub mod genesis;
pub mod record;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use epochs_core::EpochRecord;`

// Record types
pub use record::EpochRecord;

// Genesis
pub use genesis::EpochGenesis;

// Event types
pub use event::{
    EpochEvent, ATTRIBUTE_EPOCH_NUMBER, ATTRIBUTE_EPOCH_START_TIME, EVENT_TYPE_EPOCH_END,
    EVENT_TYPE_EPOCH_START,
};

// Error type
pub use error::EpochError;

// Traits
pub use traits::{EpochLifecycleSink, EpochStore};
