// crates/epochs-daemon/src/epoch_events.rs
//
// Epoch event fan-out for the daemon.
//
// The tick loop publishes every epoch_start / epoch_end event on a tokio
// broadcast channel. Subscribers (the event logger here, indexers in a
// larger host) receive them in emission order.

use tokio::sync::broadcast;

use epochs_core::event::EpochEvent;
use epochs_scheduler::TickReport;

/// Publish all events of a tick. Returns how many were published.
///
/// Having no subscribers is not an error: events are dropped.
pub fn publish(tx: &broadcast::Sender<EpochEvent>, report: &TickReport) -> usize {
    let mut published = 0;
    for event in report.events() {
        if tx.send(event.clone()).is_ok() {
            published += 1;
        }
    }
    published
}

/// Log events as they arrive until the channel closes.
pub async fn run_event_logger(mut rx: broadcast::Receiver<EpochEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                let attributes = event
                    .attributes()
                    .into_iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join(" ");
                tracing::info!(
                    "event {} [{}] {}",
                    event.event_type(),
                    event.identifier(),
                    attributes
                );
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("Event logger lagged, skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
