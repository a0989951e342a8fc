// crates/epochs-scheduler/src/driver.rs
//
// TickDriver: the host-facing entry point for one tick.
//
// Runs the start pass for every track, then the end pass, with the same tick
// time. Tick times must be non-decreasing; a tick earlier than the previous
// one is rejected before any record is read.

use chrono::{DateTime, Utc};

use epochs_core::error::EpochError;
use epochs_core::event::EpochEvent;

use crate::scheduler::EpochScheduler;

/// Everything a single tick emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Tick time.
    pub now: DateTime<Utc>,
    /// Events from the start pass, in record order.
    pub started: Vec<EpochEvent>,
    /// Events from the end pass, in record order.
    pub ended: Vec<EpochEvent>,
}

impl TickReport {
    /// All events of the tick: start pass first, then end pass.
    pub fn events(&self) -> impl Iterator<Item = &EpochEvent> {
        self.started.iter().chain(self.ended.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.started.is_empty() && self.ended.is_empty()
    }
}

/// Drives an `EpochScheduler` one tick at a time.
pub struct TickDriver {
    scheduler: EpochScheduler,
    last_tick: Option<DateTime<Utc>>,
    ticks: u64,
}

impl TickDriver {
    pub fn new(scheduler: EpochScheduler) -> Self {
        Self {
            scheduler,
            last_tick: None,
            ticks: 0,
        }
    }

    pub fn scheduler(&self) -> &EpochScheduler {
        &self.scheduler
    }

    /// Time of the most recently accepted tick, including a tick whose
    /// passes later failed.
    pub fn last_tick(&self) -> Option<DateTime<Utc>> {
        self.last_tick
    }

    /// Number of ticks whose start and end passes both completed.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Process one tick: start pass, then end pass.
    ///
    /// Any store or sink error aborts the tick and is returned as is; effects
    /// already applied earlier in the tick are not rolled back.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<TickReport, EpochError> {
        if let Some(previous) = self.last_tick {
            if now < previous {
                tracing::warn!("Rejected tick at {}: previous tick was {}", now, previous);
                return Err(EpochError::NonMonotonicTick { previous, now });
            }
        }
        // Records may be mutated from here on, so the tick time is recorded
        // even if a pass fails.
        self.last_tick = Some(now);

        let started = self.scheduler.on_tick_start_phase(now)?;
        let ended = self.scheduler.on_tick_end_phase(now)?;
        self.ticks += 1;

        tracing::trace!(
            "Tick {} at {}: {} started, {} ended",
            self.ticks,
            now,
            started.len(),
            ended.len()
        );

        Ok(TickReport {
            now,
            started,
            ended,
        })
    }
}
