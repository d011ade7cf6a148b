//! Classification and Analytics Thresholds

// ===== TIER CLASSIFICATION =====

/// Relative margin beyond the normal range that separates `warning` from
/// `critical`.
///
/// A sensor with normal range [18, 28] is `warning` up to 30.8 and
/// `critical` above it.
pub const TIER_MARGIN: f64 = 0.10;

// ===== TREND DETECTION =====

/// Readings per trend window. Two windows are compared.
pub const TREND_WINDOW: usize = 10;

/// Relative change between windows required to report a trend.
pub const TREND_TOLERANCE: f64 = 0.05;

// ===== SIMULATION =====

/// Probability that a generated reading is replaced by an anomaly.
pub const DEFAULT_ANOMALY_CHANCE: f64 = 0.15;

/// Share of anomalies that are critical rather than warning.
pub const CRITICAL_ANOMALY_SHARE: f64 = 0.7;

/// Ticks between re-sampling each sensor's trend bias.
pub const DEFAULT_TREND_RESAMPLE_EVERY: u64 = 20;

/// Probability that a batch item fails in the demonstration processor.
pub const DEFAULT_FAILURE_RATE: f64 = 0.05;

/// Decimal places kept on sensor readings.
pub const READING_PRECISION: u32 = 2;
