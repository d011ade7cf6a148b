//! Failure injection
//!
//! The batch processor asks its [`FailurePolicy`] about every record it
//! transforms. A policy that answers `true` turns that record into a
//! per-item failure; the rest of the batch carries on.

use std::fmt;

use sensorwatch_core::constants::DEFAULT_FAILURE_RATE;
use sensorwatch_core::{check_probability, Entropy, SeededEntropy};

use crate::errors::ProcessingResult;
use crate::record::Record;

/// Decides whether a record should fail
pub trait FailurePolicy: Send {
    /// `true` to fail this record
    fn should_fail(&mut self, record: &Record) -> bool;
}

/// Never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverFail;

impl FailurePolicy for NeverFail {
    fn should_fail(&mut self, _record: &Record) -> bool {
        false
    }
}

/// Fails each record independently with a fixed probability
pub struct ChanceFailure {
    rate: f64,
    entropy: Box<dyn Entropy + Send>,
}

impl ChanceFailure {
    /// Fail with probability `rate`, drawing from `entropy`
    pub fn new(rate: f64, entropy: impl Entropy + Send + 'static) -> ProcessingResult<Self> {
        Ok(Self {
            rate: check_probability(rate)?,
            entropy: Box::new(entropy),
        })
    }

    /// The 5% failure rate of the demonstration processor, seeded
    pub fn demo(seed: u64) -> Self {
        Self {
            rate: DEFAULT_FAILURE_RATE,
            entropy: Box::new(SeededEntropy::from_seed(seed)),
        }
    }

    /// Configured probability
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl FailurePolicy for ChanceFailure {
    fn should_fail(&mut self, _record: &Record) -> bool {
        self.entropy.chance(self.rate)
    }
}

impl fmt::Debug for ChanceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChanceFailure").field("rate", &self.rate).finish()
    }
}

/// Policy backed by a predicate
pub struct FailWhen<F>(F);

impl<F> FailurePolicy for FailWhen<F>
where
    F: FnMut(&Record) -> bool + Send,
{
    fn should_fail(&mut self, record: &Record) -> bool {
        (self.0)(record)
    }
}

/// Fail every record matching `predicate`
///
/// ```
/// use sensorwatch_pipeline::failure::fail_when;
///
/// // Deterministically reject anything from category C
/// let policy = fail_when(|record| record.category == sensorwatch_pipeline::Category::C);
/// # let _ = policy;
/// ```
pub fn fail_when<F>(predicate: F) -> FailWhen<F>
where
    F: FnMut(&Record) -> bool + Send,
{
    FailWhen(predicate)
}
