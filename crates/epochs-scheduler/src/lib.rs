// crates/epochs-scheduler/src/lib.rs
//
// epochs-scheduler: Deterministic epoch scheduling for the Epochs workspace.
//
// Partitions a stream of timestamped ticks into numbered epochs on any number
// of independently configured tracks. Each tick runs a start pass and then an
// end pass over every track; boundaries fire lifecycle hooks on the registered
// sinks and emit epoch_start / epoch_end events.

pub mod driver;
pub mod scheduler;
pub mod transition;

pub use driver::{TickDriver, TickReport};
pub use scheduler::EpochScheduler;
pub use transition::{evaluate_end, evaluate_start, Effect, LifecycleHook, Phase, Transition};
