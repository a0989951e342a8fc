use thiserror::Error;

use epochs_core::error::EpochError;

/// Errors raised while minting or distributing epoch provisions.
#[derive(Debug, Error)]
pub enum MintError {
    /// Parameter validation failed.
    #[error("Invalid mint params: {0}")]
    InvalidParams(String),

    /// An account does not hold enough to cover a transfer.
    #[error("Insufficient funds in {account}: need {needed}, have {available}")]
    InsufficientFunds {
        account: String,
        needed: u64,
        available: u64,
    },

    /// Arithmetic overflow in supply accounting.
    #[error("Supply overflow: {0}")]
    Overflow(String),

    /// Keeper state lock was poisoned by a panicking holder.
    #[error("Mint state unavailable: {0}")]
    State(String),
}

impl From<MintError> for EpochError {
    fn from(e: MintError) -> Self {
        EpochError::Sink(e.to_string())
    }
}
