//! SensorWatch Processing Pipeline
//!
//! Two synchronous components, each driven by repeated calls from the
//! outside:
//!
//! - [`DataProcessor`] runs batches of [`Record`]s through a
//!   scale / threshold / round transform, collecting per-item failures
//!   without aborting the batch
//! - [`StreamBuffer`](stream::StreamBuffer) stages items up to a fixed
//!   capacity, counts rejected admissions, and flushes everything through a
//!   per-kind transform table
//!
//! Both take `&mut self` for every mutation; neither spawns threads.
//!
//! ```
//! use sensorwatch_pipeline::failure::ChanceFailure;
//! use sensorwatch_pipeline::{DataProcessor, ProcessingRules, RecordGenerator};
//!
//! let mut generator = RecordGenerator::seeded(11);
//! let mut processor = DataProcessor::new(ProcessingRules::default())?
//!     .with_failure_policy(ChanceFailure::demo(11));
//!
//! for _ in 0..3 {
//!     let batch = generator.generate_batch(5);
//!     let result = processor.process_batch(&batch);
//!     assert_eq!(result.statistics.successful + result.statistics.failed, 5);
//! }
//! assert_eq!(processor.summary().batches_processed, 3);
//! # Ok::<(), sensorwatch_pipeline::ProcessingError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod batch;
pub mod errors;
pub mod failure;
pub mod record;
pub mod rules;
pub mod stream;

// Public API
pub use batch::{
    BatchResult, BatchStatistics, DataProcessor, ProcessingFailure, ProcessorState,
    ProcessorSummary,
};
pub use errors::{ProcessingError, ProcessingResult};
pub use failure::{ChanceFailure, FailurePolicy, NeverFail};
pub use record::{Category, Priority, ProcessedRecord, Record, RecordGenerator, RecordStatus};
pub use rules::ProcessingRules;
pub use stream::{Checkpoint, Payload, PayloadKind, StreamBuffer, StreamMetrics, StreamState};
