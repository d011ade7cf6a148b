//! Error Types for Shared Building Blocks
//!
//! These are construction-time errors only. Nothing in the hot path of a
//! buffer push or a clock read can fail, so the variants describe bad
//! parameters handed to a constructor or a config validator.

use thiserror::Error;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the shared building blocks
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CoreError {
    /// A bounded collection was asked to hold nothing
    #[error("Capacity must be greater than zero")]
    ZeroCapacity,

    /// A probability was outside `[0, 1]` or not a number
    #[error("Probability {value} outside [0, 1]")]
    InvalidProbability {
        /// The rejected value
        value: f64,
    },

    /// A range had its lower end above its upper end
    #[error("Invalid range [{low}, {high}]")]
    InvalidRange {
        /// Lower end
        low: f64,
        /// Upper end
        high: f64,
    },
}
