//! Error Types for the Sensor Monitor
//!
//! ## Error Categories
//!
//! ### Configuration
//! - `InvalidConfig`: a sensor or monitor setting is inconsistent
//! - `DuplicateSensor`: two sensors share an id
//! - `Core`: a bounded collection or probability was rejected
//!
//! ### Tick failures
//! - `UnknownSensor`: a query or anomaly named a sensor that is not registered
//! - `InvalidValue`: a signal source produced NaN or infinity
//! - `CyclePanicked`: a signal source panicked mid-tick
//!
//! ### Lifecycle and export
//! - `Spawn`: the tick thread could not be started
//! - `Export`: the export document could not be serialised or written
//!
//! Tick failures never escape the background loop. They are turned into a
//! critical system alert and the next tick runs as usual:
//!
//! ```rust,ignore
//! match state.run_cycle() {
//!     Ok(report) => log::debug!("cycle {} ok", report.cycle),
//!     Err(e) => state.record_system_error(&e),
//! }
//! ```

use sensorwatch_core::CoreError;
use thiserror::Error;

/// Result type for monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Errors raised by the sensor monitor
#[derive(Error, Debug)]
pub enum MonitorError {
    /// No sensor registered under this id
    #[error("Unknown sensor: {id}")]
    UnknownSensor {
        /// The requested sensor id
        id: String,
    },

    /// Signal source produced a value that is not a number
    #[error("Sensor {sensor} produced invalid value {value}")]
    InvalidValue {
        /// Sensor whose source misbehaved
        sensor: String,
        /// The offending value
        value: f64,
    },

    /// A tick panicked before completing
    #[error("Monitoring cycle panicked: {message}")]
    CyclePanicked {
        /// Panic payload, when it was a string
        message: String,
    },

    /// Sensor or monitor settings are inconsistent
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong
        reason: String,
    },

    /// Two sensors registered with the same id
    #[error("Sensor {id} registered twice")]
    DuplicateSensor {
        /// The duplicated id
        id: String,
    },

    /// Rejected by a shared building block
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Tick thread could not be spawned
    #[error("Failed to spawn monitoring thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// Export document could not be produced
    #[error("Export failed: {0}")]
    Export(#[from] serde_json::Error),
}

impl MonitorError {
    /// Shorthand for an [`MonitorError::InvalidConfig`]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
