// crates/epochs-core/src/event.rs
//
// Events emitted by the scheduler at epoch boundaries, consumed by
// telemetry and indexing collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const EVENT_TYPE_EPOCH_START: &str = "epoch_start";
pub const EVENT_TYPE_EPOCH_END: &str = "epoch_end";

pub const ATTRIBUTE_EPOCH_NUMBER: &str = "epoch_number";
pub const ATTRIBUTE_EPOCH_START_TIME: &str = "epoch_start_time";

/// An epoch boundary event for one track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpochEvent {
    /// A new epoch began on `identifier`.
    Start {
        identifier: String,
        epoch_number: u64,
        start_time: DateTime<Utc>,
    },
    /// The current epoch of `identifier` was observed to have ended.
    End {
        identifier: String,
        epoch_number: u64,
    },
}

impl EpochEvent {
    /// Wire name of the event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            EpochEvent::Start { .. } => EVENT_TYPE_EPOCH_START,
            EpochEvent::End { .. } => EVENT_TYPE_EPOCH_END,
        }
    }

    /// Identifier of the track this event belongs to.
    pub fn identifier(&self) -> &str {
        match self {
            EpochEvent::Start { identifier, .. } | EpochEvent::End { identifier, .. } => identifier,
        }
    }

    pub fn epoch_number(&self) -> u64 {
        match self {
            EpochEvent::Start { epoch_number, .. } | EpochEvent::End { epoch_number, .. } => {
                *epoch_number
            }
        }
    }

    /// Key/value attributes in their textual form: decimal epoch number and,
    /// for start events, the Unix timestamp (seconds) of the epoch start.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            EpochEvent::Start {
                epoch_number,
                start_time,
                ..
            } => vec![
                (ATTRIBUTE_EPOCH_NUMBER, epoch_number.to_string()),
                (ATTRIBUTE_EPOCH_START_TIME, start_time.timestamp().to_string()),
            ],
            EpochEvent::End { epoch_number, .. } => {
                vec![(ATTRIBUTE_EPOCH_NUMBER, epoch_number.to_string())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_start_event_attributes() {
        let event = EpochEvent::Start {
            identifier: "day".to_string(),
            epoch_number: 7,
            start_time: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        };
        assert_eq!(event.event_type(), "epoch_start");
        assert_eq!(
            event.attributes(),
            vec![
                ("epoch_number", "7".to_string()),
                ("epoch_start_time", "1700000000".to_string()),
            ]
        );
    }

    #[test]
    fn test_end_event_attributes() {
        let event = EpochEvent::End {
            identifier: "week".to_string(),
            epoch_number: 12,
        };
        assert_eq!(event.event_type(), "epoch_end");
        assert_eq!(event.identifier(), "week");
        assert_eq!(event.attributes(), vec![("epoch_number", "12".to_string())]);
    }
}
