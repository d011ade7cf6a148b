//! Builder for [`SensorMonitor`]

use std::collections::HashMap;
use std::sync::Arc;

use sensorwatch_core::{Entropy, SeededEntropy, SystemClock, TimeSource};

use crate::config::MonitorConfig;
use crate::errors::{MonitorError, MonitorResult};
use crate::sensors::{default_sensors, SensorConfig};
use crate::signal::{source_for, SignalSource};

use super::state::MonitorState;
use super::SensorMonitor;

/// Configures sensors, signal sources, clock and randomness of a monitor
///
/// Anything not set falls back to the reference plant: the five default
/// sensors, their profile sources, the system clock and an entropy source
/// seeded from `MonitorConfig::seed`.
///
/// ```
/// use sensorwatch_core::ManualClock;
/// use sensorwatch_monitor::signal::from_fn;
/// use sensorwatch_monitor::{MonitorConfig, SensorConfig, SensorMonitor};
///
/// let monitor = SensorMonitor::builder()
///     .config(MonitorConfig::quiet())
///     .sensor(SensorConfig::new("boiler", "Boiler", "°C", 20.0, 120.0).with_normal_range(60.0, 90.0))
///     .signal_source("boiler", from_fn(|_, _| 75.0))
///     .clock(ManualClock::new(0))
///     .build()?;
///
/// let report = monitor.run_cycle()?;
/// assert_eq!(report.readings[0].value, 75.0);
/// # Ok::<(), sensorwatch_monitor::MonitorError>(())
/// ```
#[derive(Default)]
pub struct SensorMonitorBuilder {
    config: MonitorConfig,
    sensors: Vec<SensorConfig>,
    sources: HashMap<String, Box<dyn SignalSource>>,
    clock: Option<Arc<dyn TimeSource>>,
    entropy: Option<Box<dyn Entropy + Send>>,
}

impl SensorMonitorBuilder {
    /// Builder with default configuration and no sensors registered yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the configuration
    pub fn config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Register one sensor
    pub fn sensor(mut self, sensor: SensorConfig) -> Self {
        self.sensors.push(sensor);
        self
    }

    /// Register several sensors
    pub fn sensors(mut self, sensors: impl IntoIterator<Item = SensorConfig>) -> Self {
        self.sensors.extend(sensors);
        self
    }

    /// Override the signal source of a sensor
    pub fn signal_source(
        mut self,
        sensor_id: impl Into<String>,
        source: impl SignalSource + 'static,
    ) -> Self {
        self.sources.insert(sensor_id.into(), Box::new(source));
        self
    }

    /// Use a specific clock
    pub fn clock(mut self, clock: impl TimeSource + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Use a specific randomness source, ignoring `MonitorConfig::seed`
    pub fn entropy(mut self, entropy: impl Entropy + Send + 'static) -> Self {
        self.entropy = Some(Box::new(entropy));
        self
    }

    /// Validate and assemble the monitor
    pub fn build(mut self) -> MonitorResult<SensorMonitor> {
        let sensors = if self.sensors.is_empty() {
            default_sensors()
        } else {
            std::mem::take(&mut self.sensors)
        };

        if let Some(id) = self
            .sources
            .keys()
            .find(|id| !sensors.iter().any(|sensor| &sensor.id == *id))
        {
            return Err(MonitorError::UnknownSensor { id: id.clone() });
        }

        let paired: Vec<_> = sensors
            .into_iter()
            .map(|sensor| {
                let source = self
                    .sources
                    .remove(&sensor.id)
                    .unwrap_or_else(|| source_for(sensor.profile));
                (sensor, source)
            })
            .collect();

        let entropy = self
            .entropy
            .unwrap_or_else(|| Box::new(SeededEntropy::new(self.config.seed)));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let state = MonitorState::new(&self.config, paired, entropy, clock)?;
        Ok(SensorMonitor::from_state(self.config, state))
    }
}
