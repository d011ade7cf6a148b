//! Buffer Sizes
//!
//! Capacities for every bounded collection in SensorWatch.

// ===== ROLLING HISTORY =====

/// Readings retained per sensor.
///
/// 100 samples covers a little over a minute and a half at the default
/// one-second tick, enough for two full trend windows.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Default number of readings returned by a history query.
pub const DEFAULT_HISTORY_QUERY_LIMIT: usize = 50;

// ===== ALERTS =====

/// Alerts retained in the rolling alert log.
pub const DEFAULT_ALERT_CAPACITY: usize = 50;

/// Alerts included in a status snapshot.
pub const RECENT_ALERTS_IN_STATUS: usize = 10;

// ===== STREAM STAGING =====

/// Items a stream buffer can stage before rejecting admissions.
pub const DEFAULT_STREAM_CAPACITY: usize = 100;

/// Fill fraction at which a driver is expected to flush a stream buffer.
pub const DEFAULT_FLUSH_FRACTION: f64 = 0.7;
