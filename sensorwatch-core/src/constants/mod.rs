//! Constants for SensorWatch
//!
//! Centralised defaults used across the monitor and the processing pipeline.
//!
//! ## Organization
//!
//! - **Buffers**: capacities of rolling histories, alert logs and staging areas
//! - **Time**: tick intervals, timeouts and unit conversions
//! - **Thresholds**: classification margins, trend windows and probabilities

/// Capacities of bounded collections.
pub mod buffers;

/// Time-related constants for intervals and timeouts.
pub mod time;

/// Classification margins, trend windows and default probabilities.
pub mod thresholds;

// Re-export commonly used constants for convenience
pub use buffers::{
    DEFAULT_ALERT_CAPACITY, DEFAULT_FLUSH_FRACTION, DEFAULT_HISTORY_CAPACITY,
    DEFAULT_HISTORY_QUERY_LIMIT, DEFAULT_STREAM_CAPACITY, RECENT_ALERTS_IN_STATUS,
};

pub use time::{DEFAULT_JOIN_TIMEOUT_MS, DEFAULT_TICK_INTERVAL_MS, MS_PER_SECOND};

pub use thresholds::{
    CRITICAL_ANOMALY_SHARE, DEFAULT_ANOMALY_CHANCE, DEFAULT_FAILURE_RATE,
    DEFAULT_TREND_RESAMPLE_EVERY, READING_PRECISION, TIER_MARGIN, TREND_TOLERANCE, TREND_WINDOW,
};
