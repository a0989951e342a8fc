// crates/epochs-scheduler/src/scheduler.rs
//
// EpochScheduler: applies the start and end passes to every track.
//
// A pass first computes the transitions for all records from a snapshot of
// the store, then applies each transition's effects in record order. Sinks
// are bound at construction and dispatched sequentially in registration
// order. The first store or sink error aborts the pass.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use epochs_core::error::EpochError;
use epochs_core::event::EpochEvent;
use epochs_core::record::EpochRecord;
use epochs_core::traits::{EpochLifecycleSink, EpochStore};

use crate::transition::{evaluate_end, evaluate_start, Effect, LifecycleHook, Phase, Transition};

type Evaluator = fn(&EpochRecord, DateTime<Utc>) -> Result<Option<Transition>, EpochError>;

/// Runs epoch start/end evaluation over all tracks in a store.
pub struct EpochScheduler {
    store: Arc<dyn EpochStore>,
    sinks: Vec<Arc<dyn EpochLifecycleSink>>,
}

impl EpochScheduler {
    /// Create a scheduler over `store` with no sinks.
    pub fn new(store: Arc<dyn EpochStore>) -> Self {
        Self {
            store,
            sinks: Vec::new(),
        }
    }

    /// Register a sink. Sinks are notified in the order they are added.
    pub fn with_sink(mut self, sink: Arc<dyn EpochLifecycleSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// The store this scheduler evaluates.
    pub fn store(&self) -> &Arc<dyn EpochStore> {
        &self.store
    }

    /// Number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Start pass for the tick at `now`. Returns the emitted start events.
    pub fn on_tick_start_phase(&self, now: DateTime<Utc>) -> Result<Vec<EpochEvent>, EpochError> {
        self.run_pass(Phase::Start, now, evaluate_start)
    }

    /// End pass for the tick at `now`. Returns the emitted end events.
    pub fn on_tick_end_phase(&self, now: DateTime<Utc>) -> Result<Vec<EpochEvent>, EpochError> {
        self.run_pass(Phase::End, now, evaluate_end)
    }

    fn run_pass(
        &self,
        phase: Phase,
        now: DateTime<Utc>,
        evaluate: Evaluator,
    ) -> Result<Vec<EpochEvent>, EpochError> {
        let started = Instant::now();

        let mut transitions = Vec::new();
        self.store.iterate(&mut |_, record| {
            if let Some(transition) = evaluate(&record, now)? {
                transitions.push(transition);
            }
            Ok(true)
        })?;

        let mut events = Vec::with_capacity(transitions.len());
        for transition in transitions {
            if let Some(event) = self.apply(transition)? {
                events.push(event);
            }
        }

        tracing::debug!(
            "{:?} pass at {} complete: {} transitions in {:?}",
            phase,
            now,
            events.len(),
            started.elapsed()
        );
        Ok(events)
    }

    /// Apply one transition's effects in order, returning its event.
    fn apply(&self, transition: Transition) -> Result<Option<EpochEvent>, EpochError> {
        let mut emitted = None;
        for effect in transition.effects() {
            match effect {
                Effect::Persist(record) => self.store.set(&record)?,
                Effect::Notify(hook) => self.notify(&hook)?,
                Effect::Emit(event) => {
                    log_event(&event);
                    emitted = Some(event);
                }
            }
        }
        Ok(emitted)
    }

    fn notify(&self, hook: &LifecycleHook) -> Result<(), EpochError> {
        for sink in &self.sinks {
            match hook {
                LifecycleHook::BeforeEpochStart {
                    identifier,
                    epoch_number,
                } => sink.before_epoch_start(identifier, *epoch_number)?,
                LifecycleHook::AfterEpochEnd {
                    identifier,
                    epoch_number,
                } => sink.after_epoch_end(identifier, *epoch_number)?,
            }
        }
        Ok(())
    }
}

fn log_event(event: &EpochEvent) {
    match event {
        EpochEvent::Start {
            identifier,
            epoch_number,
            start_time,
        } => tracing::info!(
            "=== EPOCH START === {} epoch {} at {}",
            identifier,
            epoch_number,
            start_time
        ),
        EpochEvent::End {
            identifier,
            epoch_number,
        } => tracing::info!("=== EPOCH END === {} epoch {}", identifier, epoch_number),
    }
}
