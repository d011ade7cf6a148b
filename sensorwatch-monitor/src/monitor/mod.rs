//! Sensor monitor handle and its tick thread
//!
//! ## Lifecycle
//!
//! ```text
//!            start()                 stop()
//! stopped ───────────▶ running ───────────────▶ stopped
//!    ▲  start() while running: false   │
//!    └──── stop() while stopped: false ┘
//! ```
//!
//! `start` spawns one background thread that runs a cycle, then sleeps on a
//! channel for the configured interval. `stop` clears the running flag and
//! sends on that channel so the thread wakes at once, then waits for it to
//! report back for at most the join timeout. A thread that misses the timeout
//! is detached with a warning.
//!
//! The monitor can also be driven by hand with [`SensorMonitor::run_cycle`],
//! which is what the tests do.

mod builder;
mod state;
mod status;

use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{info, warn};
use parking_lot::Mutex;

use sensorwatch_core::constants::DEFAULT_HISTORY_QUERY_LIMIT;

use crate::analytics::SensorAnalytics;
use crate::config::MonitorConfig;
use crate::errors::{MonitorError, MonitorResult};
use crate::events::{Alert, SensorReading};
use crate::sensors::SensorConfig;

pub use builder::SensorMonitorBuilder;
pub use state::CycleReport;
pub use status::{ExportDocument, PerformanceMetrics, Statistics, StatusSnapshot};

use state::MonitorState;

/// Name given to the tick thread
const THREAD_NAME: &str = "sensorwatch-tick";

/// Handle to the background tick thread
struct Worker {
    handle: JoinHandle<()>,
    wake: Sender<()>,
    done: Receiver<()>,
}

/// Simulated sensor monitor
///
/// All methods take `&self`; the monitor can be shared behind an `Arc` and
/// queried from any thread while the tick loop runs.
///
/// ```
/// use sensorwatch_monitor::{MonitorConfig, SensorMonitor};
///
/// let monitor = SensorMonitor::new(MonitorConfig::default().with_seed(3))?;
/// for _ in 0..5 {
///     monitor.run_cycle()?;
/// }
///
/// let status = monitor.status();
/// assert_eq!(status.cycle_count, 5);
/// assert_eq!(status.statistics.total_readings, 25);
/// # Ok::<(), sensorwatch_monitor::MonitorError>(())
/// ```
pub struct SensorMonitor {
    config: MonitorConfig,
    state: Arc<Mutex<MonitorState>>,
    running: Arc<AtomicBool>,
    worker: Mutex<Option<Worker>>,
}

impl SensorMonitor {
    /// Monitor over the default sensor set
    pub fn new(config: MonitorConfig) -> MonitorResult<Self> {
        Self::builder().config(config).build()
    }

    /// Start configuring a monitor
    pub fn builder() -> SensorMonitorBuilder {
        SensorMonitorBuilder::new()
    }

    pub(crate) fn from_state(config: MonitorConfig, state: MonitorState) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(state)),
            running: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }

    /// Configuration the monitor was built with
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Whether the tick thread is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawn the tick thread
    ///
    /// Returns `Ok(false)` if it was already running.
    pub fn start(&self) -> MonitorResult<bool> {
        let mut worker = self.worker.lock();
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }

        let (wake_tx, wake_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();
        let state = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);
        let interval = self.config.interval();

        let spawned = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                tick_loop(&state, &running, &wake_rx, interval);
                let _ = done_tx.send(());
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(MonitorError::Spawn(e));
            }
        };

        *worker = Some(Worker {
            handle,
            wake: wake_tx,
            done: done_rx,
        });
        info!("Monitoring system started ({:?} interval)", interval);
        Ok(true)
    }

    /// Stop the tick thread
    ///
    /// Returns `false` if it was not running. Never waits longer than the
    /// configured join timeout.
    pub fn stop(&self) -> bool {
        let worker = {
            let mut slot = self.worker.lock();
            if !self.running.swap(false, Ordering::SeqCst) {
                return false;
            }
            slot.take()
        };

        if let Some(worker) = worker {
            let _ = worker.wake.send(());
            let timeout = self.config.join_timeout();
            match worker.done.recv_timeout(timeout) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    if worker.handle.join().is_err() {
                        warn!("Monitoring thread terminated abnormally");
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!("Monitoring thread did not stop within {:?}, detaching", timeout);
                }
            }
        }

        info!("Monitoring system stopped");
        true
    }

    /// Run one cycle on the calling thread
    ///
    /// A failing or panicking cycle is recorded as a system alert, exactly as
    /// in the background loop, and the error is returned.
    pub fn run_cycle(&self) -> MonitorResult<CycleReport> {
        guarded_cycle(&self.state)
    }

    /// Full status snapshot
    pub fn status(&self) -> StatusSnapshot {
        let state = self.state.lock();
        StatusSnapshot::capture(&state, self.is_running())
    }

    /// Analytics for one sensor; `None` if unknown or without history
    pub fn analytics(&self, sensor_id: &str) -> Option<SensorAnalytics> {
        self.state.lock().analytics(sensor_id)
    }

    /// Newest `limit` readings of a sensor, oldest first
    ///
    /// `limit` defaults to 50; `Some(0)` returns every retained reading.
    /// Unknown sensors yield an empty list.
    pub fn sensor_history(&self, sensor_id: &str, limit: Option<usize>) -> Vec<SensorReading> {
        self.state
            .lock()
            .history(sensor_id, limit.unwrap_or(DEFAULT_HISTORY_QUERY_LIMIT))
    }

    /// Newest reading of a sensor
    pub fn current_reading(&self, sensor_id: &str) -> Option<SensorReading> {
        let state = self.state.lock();
        let position = state.position(sensor_id).ok()?;
        state.sensors[position].current.clone()
    }

    /// Every retained alert, oldest first
    pub fn alerts(&self) -> Vec<Alert> {
        self.state.lock().alerts.to_vec()
    }

    /// Registered sensors, in registration order
    pub fn sensors(&self) -> Vec<SensorConfig> {
        self.state
            .lock()
            .sensors
            .iter()
            .map(|slot| slot.config.clone())
            .collect()
    }

    /// Record a critical reading far outside the bounds of a sensor
    ///
    /// Picks a random sensor when `sensor_id` is `None`.
    pub fn trigger_anomaly(&self, sensor_id: Option<&str>) -> MonitorResult<SensorReading> {
        self.state.lock().trigger_anomaly(sensor_id)
    }

    /// Status plus the full retained history
    pub fn export(&self) -> ExportDocument {
        let state = self.state.lock();
        ExportDocument::capture(&state, self.is_running())
    }

    /// Write the export document as pretty-printed JSON
    pub fn write_export<W: Write>(&self, writer: W) -> MonitorResult<()> {
        let document = self.export();
        serde_json::to_writer_pretty(writer, &document)?;
        Ok(())
    }

    /// Export document as a pretty-printed JSON string
    pub fn to_json(&self) -> MonitorResult<String> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }
}

impl Drop for SensorMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for SensorMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorMonitor")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .finish()
    }
}

/// Run a cycle, converting errors and panics into a system alert
fn guarded_cycle(state: &Mutex<MonitorState>) -> MonitorResult<CycleReport> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| state.lock().run_cycle()));
    let error = match outcome {
        Ok(Ok(report)) => return Ok(report),
        Ok(Err(e)) => e,
        Err(payload) => MonitorError::CyclePanicked {
            message: panic_message(payload.as_ref()),
        },
    };
    state.lock().record_system_error(&error);
    Err(error)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn tick_loop(
    state: &Mutex<MonitorState>,
    running: &AtomicBool,
    wake: &Receiver<()>,
    interval: Duration,
) {
    while running.load(Ordering::SeqCst) {
        // Failures are already recorded as system alerts
        let _ = guarded_cycle(state);

        match wake.recv_timeout(interval) {
            Ok(()) | Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::from_fn;
    use crate::tier::Tier;
    use sensorwatch_core::{ConstantEntropy, ManualClock, SeededEntropy};

    fn quiet_monitor() -> SensorMonitor {
        SensorMonitor::builder()
            .config(MonitorConfig::quiet().with_seed(11))
            .build()
            .unwrap()
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let monitor = quiet_monitor();
        assert!(!monitor.stop());
        assert!(monitor.start().unwrap());
        assert!(!monitor.start().unwrap());
        assert!(monitor.is_running());
        assert!(monitor.stop());
        assert!(!monitor.is_running());
        assert!(!monitor.stop());
    }

    #[test]
    fn manual_cycles_fill_history() {
        let monitor = quiet_monitor();
        for _ in 0..3 {
            monitor.run_cycle().unwrap();
        }
        let status = monitor.status();
        assert_eq!(status.cycle_count, 3);
        assert_eq!(status.statistics.total_readings, 15);
        assert_eq!(status.current_readings.len(), 5);
        assert_eq!(monitor.sensor_history("temp_01", None).len(), 3);
        assert_eq!(monitor.sensor_history("temp_01", Some(2)).len(), 2);
        assert!(monitor.sensor_history("nope", None).is_empty());
    }

    #[test]
    fn invalid_values_become_system_alerts() {
        let monitor = SensorMonitor::builder()
            .sensor(SensorConfig::new("x", "X", "u", 0.0, 10.0))
            .signal_source("x", from_fn(|_, _| f64::NAN))
            .config(MonitorConfig::quiet())
            .entropy(ConstantEntropy(0.5))
            .build()
            .unwrap();

        let err = monitor.run_cycle().unwrap_err();
        assert!(matches!(err, MonitorError::InvalidValue { .. }));

        let alerts = monitor.alerts();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].is_system());
        assert_eq!(monitor.status().cycle_count, 0);
    }

    #[test]
    fn panicking_sources_become_system_alerts() {
        let monitor = SensorMonitor::builder()
            .sensor(SensorConfig::new("x", "X", "u", 0.0, 10.0))
            .signal_source("x", from_fn(|_, _| panic!("sensor unplugged")))
            .config(MonitorConfig::quiet())
            .build()
            .unwrap();

        let err = monitor.run_cycle().unwrap_err();
        assert!(matches!(err, MonitorError::CyclePanicked { .. }));
        assert_eq!(
            monitor.alerts()[0].message,
            "System error: Monitoring cycle panicked: sensor unplugged"
        );
    }

    #[test]
    fn trigger_anomaly_records_critical_reading() {
        let clock = ManualClock::new(1_700_000_000_000);
        let monitor = SensorMonitor::builder()
            .config(MonitorConfig::quiet())
            .clock(clock)
            .entropy(SeededEntropy::from_seed(5))
            .build()
            .unwrap();

        let reading = monitor.trigger_anomaly(Some("flow_01")).unwrap();
        assert_eq!(reading.status, Tier::Critical);
        assert!(reading.value == 120.0 || reading.value == -20.0);
        assert_eq!(monitor.status().alert_count.critical, 1);

        assert!(matches!(
            monitor.trigger_anomaly(Some("missing")),
            Err(MonitorError::UnknownSensor { .. })
        ));
        assert!(monitor.trigger_anomaly(None).is_ok());
    }

    #[test]
    fn export_serializes() {
        let monitor = quiet_monitor();
        monitor.run_cycle().unwrap();

        let mut buffer = Vec::new();
        monitor.write_export(&mut buffer).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(json["status"]["cycle_count"], 1);
        assert_eq!(json["full_history"]["cpu_01"].as_array().unwrap().len(), 1);
    }
}
