// crates/epochs-daemon/src/clock.rs
//
// BlockClock: irregular tick cadence for the daemon.
//
// Real block production is not periodic. The clock waits the nominal block
// interval plus or minus a random jitter between ticks, and stamps each tick
// with wall-clock time clamped so that tick times never go backwards.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;

/// Produces tick delays and monotone tick timestamps.
pub struct BlockClock {
    interval: Duration,
    jitter: Duration,
    last: Option<DateTime<Utc>>,
}

impl BlockClock {
    pub fn new(interval: Duration, jitter: Duration) -> Self {
        Self {
            interval,
            jitter,
            last: None,
        }
    }

    /// Delay until the next tick: `interval ± jitter`, never negative.
    pub fn next_delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.interval;
        }
        let jitter_ms = self.jitter.as_millis() as i64;
        let offset = rand::thread_rng().gen_range(-jitter_ms..=jitter_ms);
        let delay = self.interval.as_millis() as i64 + offset;
        Duration::from_millis(delay.max(0) as u64)
    }

    /// Timestamp for a tick observed at wall-clock time `now`.
    ///
    /// If the wall clock stepped backwards, the previous tick time is reused.
    pub fn stamp(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let stamped = match self.last {
            Some(last) if now < last => {
                tracing::warn!("Wall clock went backwards ({} < {}); holding tick time", now, last);
                last
            }
            _ => now,
        };
        self.last = Some(stamped);
        stamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_delay_without_jitter_is_interval() {
        let clock = BlockClock::new(Duration::from_millis(500), Duration::ZERO);
        assert_eq!(clock.next_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_delay_within_jitter_bounds() {
        let clock = BlockClock::new(Duration::from_millis(1_000), Duration::from_millis(300));
        for _ in 0..200 {
            let delay = clock.next_delay();
            assert!(delay >= Duration::from_millis(700));
            assert!(delay <= Duration::from_millis(1_300));
        }
    }

    #[test]
    fn test_delay_never_negative() {
        let clock = BlockClock::new(Duration::from_millis(10), Duration::from_millis(50));
        for _ in 0..200 {
            assert!(clock.next_delay() <= Duration::from_millis(60));
        }
    }

    #[test]
    fn test_stamp_is_monotone() {
        let mut clock = BlockClock::new(Duration::from_secs(1), Duration::ZERO);
        let t = |s| Utc.timestamp_opt(s, 0).unwrap();
        assert_eq!(clock.stamp(t(10)), t(10));
        assert_eq!(clock.stamp(t(8)), t(10));
        assert_eq!(clock.stamp(t(12)), t(12));
    }
}
