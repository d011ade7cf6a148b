//! Shared building blocks for SensorWatch
//!
//! Everything the monitor and the processing pipeline have in common lives
//! here: a fixed-capacity rolling buffer, clock abstractions, an injectable
//! randomness source and a handful of numeric helpers.
//!
//! Key constraints:
//! - Rolling buffers never grow past their capacity
//! - Every source of time and randomness can be replaced in tests
//! - No panics on bad input, errors are returned instead
//!
//! ```no_run
//! use sensorwatch_core::{CircularBuffer, Entropy, SeededEntropy};
//!
//! let mut history = CircularBuffer::with_capacity(100)?;
//! let mut entropy = SeededEntropy::from_seed(7);
//!
//! for _ in 0..150 {
//!     history.push(entropy.uniform(0.0, 10.0));
//! }
//! assert_eq!(history.len(), 100);
//! # Ok::<(), sensorwatch_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod buffer;
pub mod constants;
pub mod entropy;
pub mod errors;
pub mod numeric;
pub mod time;

// Public API
pub use buffer::CircularBuffer;
pub use entropy::{ConstantEntropy, Entropy, ScriptedEntropy, SeededEntropy};
pub use errors::{CoreError, CoreResult};
pub use numeric::{check_probability, check_range, mean, round_to};
pub use time::{ManualClock, SystemClock, TimeSource, Timestamp};

/// Crate version, shared by every SensorWatch crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
