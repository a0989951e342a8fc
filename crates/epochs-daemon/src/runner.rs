// crates/epochs-daemon/src/runner.rs
//
// Tick loop for the epochs daemon.
//
// Waits one block delay at a time, stamps the tick, and hands it to the
// TickDriver. Events are published after the whole tick completes. A tick
// error is fatal: the loop stops and the error is returned to the caller.

use chrono::Utc;
use tokio::sync::broadcast;

use epochs_core::error::EpochError;
use epochs_core::event::EpochEvent;
use epochs_scheduler::TickDriver;

use crate::clock::BlockClock;
use crate::epoch_events;

/// Run ticks until ctrl-c, `max_ticks`, or a tick error.
///
/// Returns the number of ticks processed.
pub async fn run_tick_loop(
    mut driver: TickDriver,
    mut clock: BlockClock,
    event_tx: broadcast::Sender<EpochEvent>,
    max_ticks: Option<u64>,
) -> Result<u64, EpochError> {
    tracing::info!(
        "Tick loop started ({} sinks, max_ticks={:?})",
        driver.scheduler().sink_count(),
        max_ticks
    );

    loop {
        if let Some(max) = max_ticks {
            if driver.ticks() >= max {
                tracing::info!("Reached max_ticks={}", max);
                break;
            }
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Tick loop received shutdown signal");
                break;
            }
            _ = tokio::time::sleep(clock.next_delay()) => {
                let now = clock.stamp(Utc::now());
                let report = driver.tick(now).map_err(|e| {
                    tracing::error!("Tick at {} failed: {}", now, e);
                    e
                })?;
                epoch_events::publish(&event_tx, &report);
            }
        }
    }

    Ok(driver.ticks())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use epochs_core::record::EpochRecord;
    use epochs_core::traits::EpochStore;
    use epochs_scheduler::EpochScheduler;
    use epochs_store::MemoryEpochStore;

    #[tokio::test]
    async fn test_loop_stops_at_max_ticks_and_publishes() {
        let record =
            EpochRecord::new("fast", Utc::now(), Duration::from_millis(5)).unwrap();
        let store = Arc::new(MemoryEpochStore::with_records(vec![record]));
        let driver = TickDriver::new(EpochScheduler::new(store.clone()));
        let clock = BlockClock::new(Duration::from_millis(10), Duration::ZERO);
        let (tx, mut rx) = broadcast::channel(256);

        let ticks = run_tick_loop(driver, clock, tx, Some(6)).await.unwrap();
        assert_eq!(ticks, 6);

        // Ticks are 10ms apart and epochs last 5ms: every tick after the
        // first alternates between ending and starting an epoch.
        let first = rx.recv().await.unwrap();
        assert_eq!(first.event_type(), "epoch_start");
        assert_eq!(first.epoch_number(), 0);
        let r = store.get("fast").unwrap().unwrap();
        assert!(r.epoch_counting_started);
        assert!(r.current_epoch >= 1);
    }
}
