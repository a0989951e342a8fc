// crates/epochs-mint/src/minter.rs
//
// Minter: current per-epoch provisions.

use serde::{Deserialize, Serialize};

use crate::params::{apply_ratio, MintParams};

/// Tracks how much is minted each epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minter {
    pub epoch_provisions: u64,
}

impl Minter {
    pub fn new(epoch_provisions: u64) -> Self {
        Self { epoch_provisions }
    }

    /// Minter at genesis, using the configured initial provisions.
    pub fn from_params(params: &MintParams) -> Self {
        Self::new(params.genesis_epoch_provisions)
    }

    /// Provisions after one reduction: `epoch_provisions * reduction_factor`,
    /// truncated to whole units.
    pub fn next_epoch_provisions(&self, params: &MintParams) -> u64 {
        apply_ratio(self.epoch_provisions, params.reduction_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halving() {
        let params = MintParams::default();
        let minter = Minter::from_params(&params);
        assert_eq!(minter.next_epoch_provisions(&params), 2_500_000);
    }

    #[test]
    fn test_reduction_truncates() {
        let params = MintParams {
            reduction_factor: 0.5,
            ..MintParams::default()
        };
        assert_eq!(Minter::new(3).next_epoch_provisions(&params), 1);
        assert_eq!(Minter::new(0).next_epoch_provisions(&params), 0);
    }

    #[test]
    fn test_reduction_uses_integer_arithmetic() {
        let params = MintParams {
            reduction_factor: 0.57,
            ..MintParams::default()
        };
        assert_eq!(Minter::new(100).next_epoch_provisions(&params), 57);
        let large = (1u64 << 60) + 1;
        let halving = MintParams::default();
        assert_eq!(Minter::new(large).next_epoch_provisions(&halving), 1u64 << 59);
    }
}
