//! Error Types for the Processing Pipeline
//!
//! Item-level errors never abort a batch. The batch processor catches them,
//! records a [`ProcessingFailure`](crate::batch::ProcessingFailure) and moves
//! on to the next record. A full stream buffer is not an error at all; the
//! admission simply returns `false` and bumps the overflow counter.

use sensorwatch_core::CoreError;
use thiserror::Error;

/// Result type for pipeline operations
pub type ProcessingResult<T> = Result<T, ProcessingError>;

/// Errors raised while processing records
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessingError {
    /// The failure policy rejected this item
    #[error("Processing error for item {item_id}")]
    InjectedFailure {
        /// Id of the rejected record
        item_id: String,
    },

    /// Record value is NaN or infinite
    #[error("Item {item_id} has non-finite value {value}")]
    InvalidValue {
        /// Id of the record
        item_id: String,
        /// The offending value
        value: f64,
    },

    /// Processing rules are unusable
    #[error("Invalid processing rules: {reason}")]
    InvalidRules {
        /// What was wrong
        reason: String,
    },

    /// Rejected by a shared building block
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ProcessingError {
    /// Shorthand for [`ProcessingError::InvalidRules`]
    pub fn rules(reason: impl Into<String>) -> Self {
        Self::InvalidRules {
            reason: reason.into(),
        }
    }
}
