//! Status snapshot and export document
//!
//! Both are plain serialisable values copied out of the monitor state under
//! the lock. Maps are ordered by sensor id so the JSON output is stable.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sensorwatch_core::constants::RECENT_ALERTS_IN_STATUS;
use sensorwatch_core::round_to;

use crate::analytics::SensorAnalytics;
use crate::events::{Alert, SensorReading};
use crate::tier::TierCounts;

use super::state::MonitorState;

/// Session-wide counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Readings recorded since the monitor was built
    pub total_readings: u64,
    /// When the monitor was built
    pub session_start: DateTime<Utc>,
    /// Whole seconds since `session_start`, as of the last cycle
    pub uptime_seconds: u64,
    /// Share of non-normal readings, three decimals
    pub anomaly_rate: f64,
}

/// Tick loop timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Moving average of cycle time in seconds, four decimals
    pub avg_processing_time: f64,
    /// Sensors sampled per second during the last cycle
    pub readings_per_second: f64,
}

/// Everything the monitor knows, at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Whether the tick thread is running
    pub running: bool,
    /// Completed cycles
    pub cycle_count: u64,
    /// Newest reading per sensor
    pub current_readings: BTreeMap<String, SensorReading>,
    /// Session counters
    pub statistics: Statistics,
    /// Readings seen per tier
    pub alert_count: TierCounts,
    /// Newest alerts, oldest first
    pub recent_alerts: Vec<Alert>,
    /// Analytics per sensor with history
    pub analytics: BTreeMap<String, SensorAnalytics>,
    /// Tick loop timing
    pub performance: PerformanceMetrics,
}

impl StatusSnapshot {
    pub(crate) fn capture(state: &MonitorState, running: bool) -> Self {
        Self {
            running,
            cycle_count: state.cycle_count,
            current_readings: state.current_readings(),
            statistics: Statistics {
                total_readings: state.total_readings,
                session_start: state.session_start,
                uptime_seconds: state.uptime_seconds,
                anomaly_rate: state.anomaly_rate(),
            },
            alert_count: state.tier_counts,
            recent_alerts: state.alerts.tail(RECENT_ALERTS_IN_STATUS).cloned().collect(),
            analytics: state.all_analytics(),
            performance: PerformanceMetrics {
                avg_processing_time: round_to(state.performance.avg_processing_time, 4),
                readings_per_second: state.performance.readings_per_second,
            },
        }
    }
}

/// Full dump of a monitor session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    /// When the export was taken
    pub export_time: DateTime<Utc>,
    /// Status at export time
    pub status: StatusSnapshot,
    /// Every retained reading per sensor, oldest first
    pub full_history: BTreeMap<String, Vec<SensorReading>>,
}

impl ExportDocument {
    pub(crate) fn capture(state: &MonitorState, running: bool) -> Self {
        Self {
            export_time: state.now_utc(),
            status: StatusSnapshot::capture(state, running),
            full_history: state.full_history(),
        }
    }
}
