// crates/epochs-core/src/record.rs
//
// EpochRecord: the persisted state of one named epoch track.
//
// A record is created by the host with counting not yet started and is then
// mutated only by the scheduler's start and end evaluation passes.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EpochError;

/// Persisted state for one named epoch track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochRecord {
    /// Unique track name. Stable key, never changed after creation.
    pub identifier: String,
    /// Earliest tick time at which counting may begin.
    pub start_time: DateTime<Utc>,
    /// Nominal length of one epoch. Strictly positive.
    pub duration: Duration,
    /// Index of the epoch currently in progress (0 before counting starts).
    pub current_epoch: u64,
    /// Tick time at which the current epoch began.
    /// Equal to `start_time` until counting starts.
    pub current_epoch_start_time: DateTime<Utc>,
    /// False until the first tick at or after `start_time` is observed.
    pub epoch_counting_started: bool,
    /// Set by an end evaluation, cleared by the next start evaluation.
    pub current_epoch_ended: bool,
}

impl EpochRecord {
    /// Create a validated record whose counting has not yet started.
    pub fn new(
        identifier: impl Into<String>,
        start_time: DateTime<Utc>,
        duration: Duration,
    ) -> Result<Self, EpochError> {
        let record = Self {
            identifier: identifier.into(),
            start_time,
            duration,
            current_epoch: 0,
            current_epoch_start_time: start_time,
            epoch_counting_started: false,
            current_epoch_ended: false,
        };
        record.validate()?;
        Ok(record)
    }

    /// Check the record-level invariants.
    pub fn validate(&self) -> Result<(), EpochError> {
        if self.identifier.trim().is_empty() {
            return Err(EpochError::InvalidRecord(
                "identifier must not be empty".to_string(),
            ));
        }
        if self.duration.is_zero() {
            return Err(EpochError::InvalidRecord(format!(
                "{}: duration must be positive",
                self.identifier
            )));
        }
        if TimeDelta::from_std(self.duration).is_err() {
            return Err(EpochError::InvalidRecord(format!(
                "{}: duration {:?} is out of range",
                self.identifier, self.duration
            )));
        }
        if self.current_epoch_ended && !self.epoch_counting_started {
            return Err(EpochError::InvalidRecord(format!(
                "{}: current epoch marked ended before counting started",
                self.identifier
            )));
        }
        Ok(())
    }

    /// Estimated end of the current epoch: `current_epoch_start_time + duration`.
    pub fn estimated_end(&self) -> Result<DateTime<Utc>, EpochError> {
        let delta = TimeDelta::from_std(self.duration).map_err(|e| {
            EpochError::InvalidState(format!("{}: duration out of range: {}", self.identifier, e))
        })?;
        self.current_epoch_start_time
            .checked_add_signed(delta)
            .ok_or_else(|| {
                EpochError::InvalidState(format!(
                    "{}: estimated epoch end overflows",
                    self.identifier
                ))
            })
    }
}
