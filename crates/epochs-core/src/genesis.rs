// crates/epochs-core/src/genesis.rs
//
// Initial set of epoch tracks loaded by the host before the first tick.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EpochError;
use crate::record::EpochRecord;

/// A set of epoch records to seed a store with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochGenesis {
    pub epochs: Vec<EpochRecord>,
}

impl EpochGenesis {
    pub fn new(epochs: Vec<EpochRecord>) -> Self {
        Self { epochs }
    }

    /// The conventional `day` and `week` tracks, counting from `start_time`.
    pub fn standard(start_time: DateTime<Utc>) -> Self {
        let day = EpochRecord {
            identifier: "day".to_string(),
            start_time,
            duration: Duration::from_secs(24 * 60 * 60),
            current_epoch: 0,
            current_epoch_start_time: start_time,
            epoch_counting_started: false,
            current_epoch_ended: false,
        };
        let week = EpochRecord {
            identifier: "week".to_string(),
            duration: Duration::from_secs(7 * 24 * 60 * 60),
            ..day.clone()
        };
        Self {
            epochs: vec![day, week],
        }
    }

    /// Validate every record and reject duplicate identifiers.
    pub fn validate(&self) -> Result<(), EpochError> {
        let mut seen = HashSet::new();
        for record in &self.epochs {
            record.validate()?;
            if !seen.insert(record.identifier.as_str()) {
                return Err(EpochError::DuplicateIdentifier(record.identifier.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_standard_genesis_is_valid() {
        let genesis = EpochGenesis::standard(Utc.timestamp_opt(0, 0).unwrap());
        assert!(genesis.validate().is_ok());
        let ids: Vec<&str> = genesis.epochs.iter().map(|e| e.identifier.as_str()).collect();
        assert_eq!(ids, vec!["day", "week"]);
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let start = Utc.timestamp_opt(0, 0).unwrap();
        let a = EpochRecord::new("day", start, Duration::from_secs(60)).unwrap();
        let b = EpochRecord::new("day", start, Duration::from_secs(120)).unwrap();
        let err = EpochGenesis::new(vec![a, b]).validate().unwrap_err();
        assert!(matches!(err, EpochError::DuplicateIdentifier(id) if id == "day"));
    }

    #[test]
    fn test_invalid_record_rejected() {
        let start = Utc.timestamp_opt(0, 0).unwrap();
        let mut bad = EpochRecord::new("hour", start, Duration::from_secs(3_600)).unwrap();
        bad.duration = Duration::ZERO;
        assert!(EpochGenesis::new(vec![bad]).validate().is_err());
    }
}
