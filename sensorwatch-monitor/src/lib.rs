//! SensorWatch Monitor
//!
//! Fabricates readings for a set of sensors on a fixed tick, classifies each
//! reading into a tier, keeps a bounded rolling history per sensor and a
//! bounded alert log, and answers analytics and status queries on demand.
//!
//! ## Tick
//!
//! Every cycle, for each sensor in registration order:
//! 1. the sensor's [`SignalSource`](signal::SignalSource) produces a raw value
//! 2. the value is clamped into the sensor's hard bounds
//! 3. it is classified as `normal`, `warning` or `critical`
//! 4. with a small probability it is forced into an anomaly
//! 5. it is rounded, appended to history and alerted on if not normal
//!
//! ## Threading
//!
//! [`SensorMonitor::start`] runs cycles on one background thread; every query
//! locks the same state the thread updates, so readers always see whole
//! cycles. Tests usually skip the thread and call
//! [`SensorMonitor::run_cycle`] with a seeded entropy source and a manual
//! clock.
//!
//! ```no_run
//! use std::time::Duration;
//! use sensorwatch_monitor::{MonitorConfig, SensorMonitor};
//!
//! let monitor = SensorMonitor::new(MonitorConfig::fast())?;
//! monitor.start()?;
//! std::thread::sleep(Duration::from_secs(2));
//! monitor.stop();
//!
//! monitor.write_export(std::io::stdout())?;
//! # Ok::<(), sensorwatch_monitor::MonitorError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod analytics;
pub mod config;
pub mod errors;
pub mod events;
pub mod monitor;
pub mod sensors;
pub mod signal;
pub mod tier;

// Public API
pub use analytics::{SensorAnalytics, Trend};
pub use config::MonitorConfig;
pub use errors::{MonitorError, MonitorResult};
pub use events::{Alert, SensorReading};
pub use monitor::{
    CycleReport, ExportDocument, PerformanceMetrics, SensorMonitor, SensorMonitorBuilder,
    Statistics, StatusSnapshot,
};
pub use sensors::{default_sensors, NormalRange, SensorConfig, SignalProfile};
pub use tier::{classify, Tier, TierCounts};
