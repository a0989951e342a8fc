// crates/epochs-core/src/traits.rs

use crate::error::EpochError;
use crate::record::EpochRecord;

/// Trait for persistent EpochRecord storage.
///
/// Implemented by epochs-store (in-memory and RocksDB backends). Records are
/// addressed by identifier and visited in a stable order.
pub trait EpochStore: Send + Sync {
    /// Visit every record in stable order with its position.
    /// The visitor returns `Ok(false)` to stop the iteration early.
    fn iterate(
        &self,
        visitor: &mut dyn FnMut(usize, EpochRecord) -> Result<bool, EpochError>,
    ) -> Result<(), EpochError>;

    /// Retrieve a record by identifier.
    fn get(&self, identifier: &str) -> Result<Option<EpochRecord>, EpochError>;

    /// Save a record under its identifier. Overwrites if it already exists.
    fn set(&self, record: &EpochRecord) -> Result<(), EpochError>;

    /// Delete a record by identifier. Deleting a missing record is not an error.
    fn delete(&self, identifier: &str) -> Result<(), EpochError>;
}

/// Trait for collaborators notified at epoch boundaries.
///
/// Both hooks are invoked synchronously, in registration order. An error
/// aborts the enclosing tick pass.
pub trait EpochLifecycleSink: Send + Sync {
    /// Called once per start transition, after the record is persisted.
    fn before_epoch_start(&self, identifier: &str, epoch_number: u64) -> Result<(), EpochError>;

    /// Called once per end transition, before the record is persisted as ended.
    fn after_epoch_end(&self, identifier: &str, epoch_number: u64) -> Result<(), EpochError>;
}
