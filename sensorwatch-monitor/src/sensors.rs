//! Sensor definitions
//!
//! A [`SensorConfig`] is static for the life of a monitor: display name,
//! unit, hard bounds every generated value is clamped into, the normal
//! sub-range used for tier classification, and the signal profile that picks
//! its value generator.

use serde::{Deserialize, Serialize};

use sensorwatch_core::check_range;

use crate::errors::{MonitorError, MonitorResult};

/// Inclusive range of values considered normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalRange {
    /// Lowest normal value
    pub low: f64,
    /// Highest normal value
    pub high: f64,
}

impl NormalRange {
    /// Create a range, swapping the ends if given out of order
    pub fn new(low: f64, high: f64) -> Self {
        if low > high {
            Self { low: high, high: low }
        } else {
            Self { low, high }
        }
    }

    /// Whether `value` is inside the range, boundaries included
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Which signal generator drives a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalProfile {
    /// Random walk with a per-sensor drift
    #[default]
    RandomWalk,
    /// Sinusoidal daily cycle peaking at noon
    Diurnal,
    /// Oscillating base load with occasional spikes
    LoadSpikes,
}

/// Static configuration of one sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Unique id, e.g. `temp_01`
    pub id: String,
    /// Display name used in alert messages
    pub name: String,
    /// Unit appended to values
    pub unit: String,
    /// Hard lower bound
    pub min: f64,
    /// Hard upper bound
    pub max: f64,
    /// Values considered normal
    pub normal_range: NormalRange,
    /// Generator used by default for this sensor
    #[serde(default)]
    pub profile: SignalProfile,
}

impl SensorConfig {
    /// Sensor whose normal range spans its full bounds
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit: unit.into(),
            min,
            max,
            normal_range: NormalRange::new(min, max),
            profile: SignalProfile::default(),
        }
    }

    /// Set the normal sub-range
    pub fn with_normal_range(mut self, low: f64, high: f64) -> Self {
        self.normal_range = NormalRange::new(low, high);
        self
    }

    /// Set the signal profile
    pub fn with_profile(mut self, profile: SignalProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Clamp a value into the hard bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Distance between the hard bounds
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check the bounds are usable
    ///
    /// The normal range may extend past the hard bounds; it only has to be
    /// finite.
    pub fn validate(&self) -> MonitorResult<()> {
        if self.id.trim().is_empty() {
            return Err(MonitorError::config("sensor id must not be empty"));
        }

        check_range(self.min, self.max).map_err(|_| {
            MonitorError::config(format!(
                "sensor {} has invalid bounds [{}, {}]",
                self.id, self.min, self.max
            ))
        })?;

        check_range(self.normal_range.low, self.normal_range.high).map_err(|_| {
            MonitorError::config(format!("sensor {} has an invalid normal range", self.id))
        })?;

        Ok(())
    }
}

/// The five sensors of the reference plant
///
/// | id | name | unit | bounds | normal | profile |
/// |----|------|------|--------|--------|---------|
/// | temp_01 | Temperature | °C | 15–35 | 18–28 | diurnal |
/// | press_01 | Pressure | bar | 0.8–1.5 | 0.95–1.2 | random walk |
/// | flow_01 | Flow Rate | L/min | 0–100 | 20–80 | random walk |
/// | cpu_01 | CPU Usage | % | 0–100 | 0–75 | load spikes |
/// | mem_01 | Memory | GB | 0–32 | 0–24 | random walk |
pub fn default_sensors() -> Vec<SensorConfig> {
    vec![
        SensorConfig::new("temp_01", "Temperature", "°C", 15.0, 35.0)
            .with_normal_range(18.0, 28.0)
            .with_profile(SignalProfile::Diurnal),
        SensorConfig::new("press_01", "Pressure", "bar", 0.8, 1.5).with_normal_range(0.95, 1.2),
        SensorConfig::new("flow_01", "Flow Rate", "L/min", 0.0, 100.0)
            .with_normal_range(20.0, 80.0),
        SensorConfig::new("cpu_01", "CPU Usage", "%", 0.0, 100.0)
            .with_normal_range(0.0, 75.0)
            .with_profile(SignalProfile::LoadSpikes),
        SensorConfig::new("mem_01", "Memory", "GB", 0.0, 32.0).with_normal_range(0.0, 24.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_is_valid() {
        let sensors = default_sensors();
        assert_eq!(sensors.len(), 5);
        for sensor in &sensors {
            sensor.validate().unwrap();
        }
        assert_eq!(sensors[0].profile, SignalProfile::Diurnal);
        assert_eq!(sensors[3].profile, SignalProfile::LoadSpikes);
    }

    #[test]
    fn clamps_into_bounds() {
        let sensor = SensorConfig::new("x", "X", "u", 0.0, 10.0);
        assert_eq!(sensor.clamp(-3.0), 0.0);
        assert_eq!(sensor.clamp(12.0), 10.0);
        assert_eq!(sensor.clamp(4.2), 4.2);
    }

    #[test]
    fn normal_range_orders_ends() {
        let range = NormalRange::new(5.0, 1.0);
        assert_eq!(range.low, 1.0);
        assert_eq!(range.high, 5.0);
        assert!(range.contains(1.0));
        assert!(range.contains(5.0));
        assert!(!range.contains(5.01));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let sensor = SensorConfig::new("bad", "Bad", "u", 10.0, 0.0);
        assert!(matches!(
            sensor.validate(),
            Err(MonitorError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn rejects_empty_id() {
        let sensor = SensorConfig::new("  ", "Blank", "u", 0.0, 1.0);
        assert!(sensor.validate().is_err());
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{
            "id": "flow_02", "name": "Flow", "unit": "L/min",
            "min": 0.0, "max": 50.0,
            "normal_range": { "low": 10.0, "high": 40.0 }
        }"#;
        let sensor: SensorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(sensor.profile, SignalProfile::RandomWalk);
        assert_eq!(sensor.normal_range.high, 40.0);
    }
}
