//! Time-Related Constants

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Seconds per hour.
pub const SECONDS_PER_HOUR: u32 = 3600;

/// Hours per day.
pub const HOURS_PER_DAY: u32 = 24;

// ===== MONITOR LOOP =====

/// Interval between monitoring ticks (milliseconds).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// How long `stop` waits for the tick loop to exit (milliseconds).
///
/// A loop that overruns this is left to finish on its own and a warning is
/// logged.
pub const DEFAULT_JOIN_TIMEOUT_MS: u64 = 2000;
