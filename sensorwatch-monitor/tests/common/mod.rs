//! Shared fixtures for the monitor integration tests
//!
//! Every monitor built here is deterministic: a manual clock, a constant or
//! seeded entropy source, and signal sources whose output depends only on
//! the tick number.

#![allow(dead_code)]

use sensorwatch_core::{ConstantEntropy, ManualClock};
use sensorwatch_monitor::signal::{from_fn, SignalContext};
use sensorwatch_monitor::{MonitorConfig, SensorConfig, SensorMonitor, SensorMonitorBuilder};

/// 2023-11-14T22:13:20Z
pub const START_MS: u64 = 1_700_000_000_000;

/// Sensor over [0, 1000] whose whole span is normal
pub fn wide_sensor(id: &str) -> SensorConfig {
    SensorConfig::new(id, id.to_uppercase(), "u", 0.0, 1000.0)
}

/// Sensor over [0, 100] with normal range [20, 80]
pub fn flow_sensor(id: &str) -> SensorConfig {
    SensorConfig::new(id, "Flow Rate", "L/min", 0.0, 100.0).with_normal_range(20.0, 80.0)
}

/// Builder with no anomalies, a manual clock and fixed entropy
pub fn quiet_builder(clock: &ManualClock) -> SensorMonitorBuilder {
    SensorMonitor::builder()
        .config(MonitorConfig::quiet())
        .clock(clock.clone())
        .entropy(ConstantEntropy(0.5))
}

/// Single sensor reading `value_at(tick)` every cycle
pub fn scripted_monitor<F>(config: MonitorConfig, sensor: SensorConfig, value_at: F) -> SensorMonitor
where
    F: Fn(u64) -> f64 + Send + 'static,
{
    let id = sensor.id.clone();
    SensorMonitor::builder()
        .config(config)
        .sensor(sensor)
        .signal_source(id, from_fn(move |ctx: &SignalContext<'_>, _| value_at(ctx.tick)))
        .clock(ManualClock::new(START_MS))
        .entropy(ConstantEntropy(0.5))
        .build()
        .expect("valid scripted monitor")
}

/// Run `cycles` manual cycles, panicking on failure
pub fn run_cycles(monitor: &SensorMonitor, cycles: usize) {
    for _ in 0..cycles {
        monitor.run_cycle().expect("cycle succeeds");
    }
}
