// crates/epochs-mint/src/hooks.rs
//
// Observers of committed mint distributions.

use crate::error::MintError;

/// Called by the `MintKeeper` after an epoch's provisions have been minted,
/// distributed and committed.
pub trait MintHooks: Send + Sync {
    /// `minted` is the full provisions of the epoch, before the developer
    /// share is burned.
    fn after_distribute_minted_coins(&self, minted: u64) -> Result<(), MintError>;
}
