// crates/epochs-daemon/src/sinks.rs
//
// Lifecycle sinks and mint hooks owned by the daemon.

use std::sync::atomic::{AtomicU64, Ordering};

use epochs_core::error::EpochError;
use epochs_core::traits::EpochLifecycleSink;
use epochs_mint::{MintError, MintHooks};

/// Logs every lifecycle hook.
pub struct LoggingSink;

impl EpochLifecycleSink for LoggingSink {
    fn before_epoch_start(&self, identifier: &str, epoch_number: u64) -> Result<(), EpochError> {
        tracing::debug!("before_epoch_start({}, {})", identifier, epoch_number);
        Ok(())
    }

    fn after_epoch_end(&self, identifier: &str, epoch_number: u64) -> Result<(), EpochError> {
        tracing::debug!("after_epoch_end({}, {})", identifier, epoch_number);
        Ok(())
    }
}

/// Totals the provisions reported by the mint keeper.
#[derive(Debug, Default)]
pub struct SupplyTracker {
    minted: AtomicU64,
    distributions: AtomicU64,
}

impl SupplyTracker {
    pub fn minted(&self) -> u64 {
        self.minted.load(Ordering::Relaxed)
    }

    pub fn distributions(&self) -> u64 {
        self.distributions.load(Ordering::Relaxed)
    }
}

impl MintHooks for SupplyTracker {
    fn after_distribute_minted_coins(&self, minted: u64) -> Result<(), MintError> {
        let total = self.minted.fetch_add(minted, Ordering::Relaxed).saturating_add(minted);
        let count = self.distributions.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!("Distribution {}: minted {} (total {})", count, minted, total);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epochs_mint::{MintKeeper, MintParams};
    use std::sync::Arc;

    #[test]
    fn test_supply_tracker_follows_keeper() {
        let tracker = Arc::new(SupplyTracker::default());
        let params = MintParams {
            genesis_epoch_provisions: 1_000,
            epoch_identifier: "day".to_string(),
            reduction_period_in_epochs: 2,
            developer_vesting_amount: 1_000,
            ..MintParams::default()
        };
        let keeper = MintKeeper::new(params).unwrap().with_hook(tracker.clone());

        for epoch in 0..3 {
            keeper.after_epoch_end("day", epoch).unwrap();
        }
        keeper.after_epoch_end("week", 0).unwrap();

        // 1000 + 1000 + 500 after the reduction at epoch 2.
        assert_eq!(tracker.minted(), 2_500);
        assert_eq!(tracker.distributions(), 3);
    }
}
