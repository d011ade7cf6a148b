//! Monitor configuration
//!
//! ## Presets
//!
//! | preset | interval | anomaly chance | seed |
//! |--------|----------|----------------|------|
//! | `default()` | 1 s | 15% | OS entropy |
//! | `fast()` | 100 ms | 15% | OS entropy |
//! | `quiet()` | 1 s | 0% | OS entropy |
//!
//! Any field missing from a JSON document falls back to its default:
//!
//! ```
//! use sensorwatch_monitor::MonitorConfig;
//!
//! let config = MonitorConfig::from_json_str(r#"{ "interval_ms": 250, "seed": 42 }"#)?;
//! assert_eq!(config.interval_ms, 250);
//! assert_eq!(config.history_capacity, 100);
//! # Ok::<(), sensorwatch_monitor::MonitorError>(())
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use sensorwatch_core::check_probability;
use sensorwatch_core::constants::{
    DEFAULT_ALERT_CAPACITY, DEFAULT_ANOMALY_CHANCE, DEFAULT_HISTORY_CAPACITY,
    DEFAULT_JOIN_TIMEOUT_MS, DEFAULT_TICK_INTERVAL_MS, DEFAULT_TREND_RESAMPLE_EVERY,
};

use crate::errors::{MonitorError, MonitorResult};

/// Tunables of a [`SensorMonitor`](crate::SensorMonitor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Time between ticks of the background loop
    pub interval_ms: u64,
    /// Readings kept per sensor
    pub history_capacity: usize,
    /// Alerts kept in the rolling log
    pub alert_capacity: usize,
    /// Probability that a reading is forced into an anomaly
    pub anomaly_chance: f64,
    /// Trend biases are resampled every this many cycles (0 disables)
    pub trend_resample_every: u64,
    /// How long `stop` waits for the tick thread
    pub join_timeout_ms: u64,
    /// Seed for reproducible runs; OS entropy when absent
    pub seed: Option<u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_TICK_INTERVAL_MS,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            alert_capacity: DEFAULT_ALERT_CAPACITY,
            anomaly_chance: DEFAULT_ANOMALY_CHANCE,
            trend_resample_every: DEFAULT_TREND_RESAMPLE_EVERY,
            join_timeout_ms: DEFAULT_JOIN_TIMEOUT_MS,
            seed: None,
        }
    }
}

impl MonitorConfig {
    /// Ten ticks per second, for demos
    pub fn fast() -> Self {
        Self {
            interval_ms: 100,
            ..Self::default()
        }
    }

    /// No injected anomalies; only genuine excursions raise alerts
    pub fn quiet() -> Self {
        Self {
            anomaly_chance: 0.0,
            ..Self::default()
        }
    }

    /// Parse from JSON, then validate
    pub fn from_json_str(json: &str) -> MonitorResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| MonitorError::config(format!("malformed monitor config: {}", e)))?;
        if !value.is_object() {
            return Err(MonitorError::config("monitor config must be a JSON object"));
        }
        let config: Self = serde_json::from_value(value)
            .map_err(|e| MonitorError::config(format!("malformed monitor config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the tick interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the per-sensor history capacity
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Set the alert log capacity
    pub fn with_alert_capacity(mut self, capacity: usize) -> Self {
        self.alert_capacity = capacity;
        self
    }

    /// Set the anomaly probability
    pub fn with_anomaly_chance(mut self, chance: f64) -> Self {
        self.anomaly_chance = chance;
        self
    }

    /// Set the trend resample period in cycles
    pub fn with_trend_resample_every(mut self, cycles: u64) -> Self {
        self.trend_resample_every = cycles;
        self
    }

    /// Set how long `stop` waits for the tick thread
    pub fn with_join_timeout(mut self, timeout: Duration) -> Self {
        self.join_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Seed the random source
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Tick interval as a duration
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Join timeout as a duration
    pub fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }

    /// Check every setting is usable
    pub fn validate(&self) -> MonitorResult<()> {
        if self.interval_ms == 0 {
            return Err(MonitorError::config("interval_ms must be positive"));
        }
        if self.history_capacity == 0 {
            return Err(MonitorError::config("history_capacity must be positive"));
        }
        if self.alert_capacity == 0 {
            return Err(MonitorError::config("alert_capacity must be positive"));
        }
        check_probability(self.anomaly_chance)?;
        Ok(())
    }
}
