//! Readings and alerts
//!
//! A [`SensorReading`] is created once per tick per sensor and never mutated
//! afterwards. Non-normal readings derive an [`Alert`]; failed ticks produce a
//! system alert that carries no sensor data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sensors::SensorConfig;
use crate::tier::Tier;

/// Sensor id used by alerts raised for tick failures
pub const SYSTEM_SENSOR_ID: &str = "system";

/// One sensor value at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Sensor that produced the value
    pub sensor_id: String,
    /// When the value was taken (serialised as ISO-8601)
    pub timestamp: DateTime<Utc>,
    /// Value, rounded to two decimals
    pub value: f64,
    /// Unit of the value
    pub unit: String,
    /// Tier the value was classified into
    pub status: Tier,
}

/// Record of a non-normal reading or a failed tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// When the alert was raised
    pub timestamp: DateTime<Utc>,
    /// Sensor id, or `system` for tick failures
    pub sensor: String,
    /// Display name of the sensor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_name: Option<String>,
    /// Offending value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Unit of the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Severity
    pub status: Tier,
    /// Human readable summary
    pub message: String,
}

impl Alert {
    /// Derive an alert from a reading of `sensor`
    ///
    /// The message reads like `WARNING: Temperature at 29.1°C`.
    pub fn from_reading(reading: &SensorReading, sensor: &SensorConfig) -> Self {
        Self {
            timestamp: reading.timestamp,
            sensor: reading.sensor_id.clone(),
            sensor_name: Some(sensor.name.clone()),
            value: Some(reading.value),
            unit: Some(reading.unit.clone()),
            status: reading.status,
            message: format!(
                "{}: {} at {}{}",
                reading.status.as_str().to_uppercase(),
                sensor.name,
                reading.value,
                reading.unit
            ),
        }
    }

    /// Critical alert for a tick that failed
    pub fn system_error(timestamp: DateTime<Utc>, error: impl std::fmt::Display) -> Self {
        Self {
            timestamp,
            sensor: SYSTEM_SENSOR_ID.to_string(),
            sensor_name: None,
            value: None,
            unit: None,
            status: Tier::Critical,
            message: format!("System error: {}", error),
        }
    }

    /// Whether this alert came from a failed tick rather than a reading
    pub fn is_system(&self) -> bool {
        self.sensor == SYSTEM_SENSOR_ID
    }
}
