// crates/epochs-scheduler/src/transition.rs
//
// Pure epoch transitions.
//
// Each evaluation takes one record and the tick time and returns the new
// record together with the hook to fire and the event to emit. Nothing here
// touches a store or a sink; the scheduler applies the returned effects.
//
// A boundary is always split across two ticks: the end pass of tick N marks
// the epoch ended, the start pass of tick N+1 opens the next one.

use chrono::{DateTime, Utc};

use epochs_core::error::EpochError;
use epochs_core::event::EpochEvent;
use epochs_core::record::EpochRecord;

/// Which evaluation pass produced a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    End,
}

/// A lifecycle notification owed to every registered sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleHook {
    BeforeEpochStart {
        identifier: String,
        epoch_number: u64,
    },
    AfterEpochEnd {
        identifier: String,
        epoch_number: u64,
    },
}

/// One side effect of a transition, in the order it must be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write the updated record back to the store.
    Persist(EpochRecord),
    /// Invoke the hook on every sink, in registration order.
    Notify(LifecycleHook),
    /// Publish the event.
    Emit(EpochEvent),
}

/// The outcome of a state change on one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub phase: Phase,
    pub record: EpochRecord,
    pub hook: LifecycleHook,
    pub event: EpochEvent,
}

impl Transition {
    /// Effects in application order.
    ///
    /// A start is persisted before sinks hear about it. An end is announced
    /// before it is persisted, so a sink reading the record inside
    /// `after_epoch_end` still sees the epoch as running.
    pub fn effects(self) -> Vec<Effect> {
        match self.phase {
            Phase::Start => vec![
                Effect::Persist(self.record),
                Effect::Notify(self.hook),
                Effect::Emit(self.event),
            ],
            Phase::End => vec![
                Effect::Notify(self.hook),
                Effect::Persist(self.record),
                Effect::Emit(self.event),
            ],
        }
    }
}

/// Start evaluation for one record.
///
/// Starts counting at epoch 0 on the first tick at or after `start_time`,
/// and opens the next epoch when the previous tick's end pass marked the
/// current one ended. Returns `None` when nothing is due.
pub fn evaluate_start(
    record: &EpochRecord,
    now: DateTime<Utc>,
) -> Result<Option<Transition>, EpochError> {
    let mut next = record.clone();

    if !record.epoch_counting_started {
        if now < record.start_time {
            return Ok(None);
        }
        next.epoch_counting_started = true;
        next.current_epoch_ended = false;
        next.current_epoch = 0;
        next.current_epoch_start_time = now;
    } else if record.current_epoch_ended {
        next.current_epoch_ended = false;
        next.current_epoch = record.current_epoch.checked_add(1).ok_or_else(|| {
            EpochError::InvalidState(format!("{}: epoch counter overflow", record.identifier))
        })?;
        next.current_epoch_start_time = now;
    } else {
        return Ok(None);
    }

    let hook = LifecycleHook::BeforeEpochStart {
        identifier: next.identifier.clone(),
        epoch_number: next.current_epoch,
    };
    let event = EpochEvent::Start {
        identifier: next.identifier.clone(),
        epoch_number: next.current_epoch,
        start_time: now,
    };
    Ok(Some(Transition {
        phase: Phase::Start,
        record: next,
        hook,
        event,
    }))
}

/// End evaluation for one record.
///
/// Marks the current epoch ended once `now` has reached
/// `current_epoch_start_time + duration`. A tick that lands several
/// durations past the estimate still ends exactly one epoch.
pub fn evaluate_end(
    record: &EpochRecord,
    now: DateTime<Utc>,
) -> Result<Option<Transition>, EpochError> {
    if !record.epoch_counting_started {
        return Ok(None);
    }
    // Already ended and waiting for the next start pass.
    if record.current_epoch_ended {
        return Ok(None);
    }
    if now < record.estimated_end()? {
        return Ok(None);
    }

    let mut next = record.clone();
    next.current_epoch_ended = true;

    let hook = LifecycleHook::AfterEpochEnd {
        identifier: next.identifier.clone(),
        epoch_number: next.current_epoch,
    };
    let event = EpochEvent::End {
        identifier: next.identifier.clone(),
        epoch_number: next.current_epoch,
    };
    Ok(Some(Transition {
        phase: Phase::End,
        record: next,
        hook,
        event,
    }))
}
