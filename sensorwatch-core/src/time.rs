//! Clock abstraction
//!
//! Components never read the system clock directly. They hold an
//! `Arc<dyn TimeSource>` so tests can substitute a [`ManualClock`] and move
//! time forward explicitly:
//! - [`SystemClock`] for real runs (wall clock, milliseconds since the Unix epoch)
//! - [`ManualClock`] for deterministic tests, shared between clones

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use log::warn;

/// Timestamp in milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Source of time for the system
///
/// `now()` must be callable from any thread since the monitor reads the clock
/// from its background tick loop.
pub trait TimeSource: Send + Sync {
    /// Current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Whether this source tracks wall clock time
    fn is_wall_clock(&self) -> bool;

    /// Minimum measurable difference in milliseconds
    fn precision_ms(&self) -> u32 {
        1
    }

    /// Current time as a UTC date-time
    fn now_utc(&self) -> DateTime<Utc> {
        to_datetime(self.now())
    }
}

/// Wall clock backed by `std::time::SystemTime`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Timestamp::try_from(millis).unwrap_or(Timestamp::MAX)
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Manually driven clock for tests
///
/// Clones share the same underlying time, so a test can keep one handle and
/// advance it while a component owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    timestamp: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock frozen at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp: Arc::new(AtomicU64::new(timestamp)),
        }
    }

    /// Jump to an absolute timestamp
    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.store(timestamp, Ordering::SeqCst);
    }

    /// Move time forward
    pub fn advance(&self, ms: u64) {
        self.timestamp.fetch_add(ms, Ordering::SeqCst);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.timestamp.load(Ordering::SeqCst)
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

/// Convert a millisecond timestamp into a UTC date-time
///
/// Timestamps past the representable range fall back to the Unix epoch,
/// with a warning.
pub fn to_datetime(timestamp: Timestamp) -> DateTime<Utc> {
    let converted = i64::try_from(timestamp)
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single());

    match converted {
        Some(dt) => dt,
        None => {
            warn!("timestamp {} ms is out of range, using the Unix epoch", timestamp);
            DateTime::<Utc>::UNIX_EPOCH
        }
    }
}

/// Elapsed milliseconds between two timestamps, zero if time went backwards
pub fn delta_ms(earlier: Timestamp, later: Timestamp) -> u64 {
    later.saturating_sub(earlier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(1000);
        assert_eq!(clock.now(), 1000);

        clock.advance(500);
        assert_eq!(clock.now(), 1500);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(0);
        let handle = clock.clone();

        handle.set(42_000);
        assert_eq!(clock.now(), 42_000);
    }

    #[test]
    fn system_clock_is_wall_clock() {
        let clock = SystemClock;
        assert!(clock.is_wall_clock());
        // Anything after 2020-01-01
        assert!(clock.now() > 1_577_836_800_000);
    }

    #[test]
    fn datetime_conversion() {
        let dt = to_datetime(1_700_000_000_123);
        assert_eq!(dt.timestamp_millis(), 1_700_000_000_123);
        assert_eq!(to_datetime(u64::MAX), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn out_of_range_timestamps_fall_back_to_epoch() {
        // Fits in i64 but lies past chrono's last representable year
        let too_late = i64::MAX as u64;
        assert_eq!(to_datetime(too_late), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(to_datetime(0), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn delta_never_negative() {
        assert_eq!(delta_ms(1000, 1500), 500);
        assert_eq!(delta_ms(1500, 1000), 0);
    }
}
