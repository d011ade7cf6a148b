//! Batch processor
//!
//! Runs every record of a batch through a fixed pipeline:
//!
//! ```text
//! value ─▶ × multiplier ─▶ > threshold? ─▶ round ─▶ stamp
//!                          │
//!                          └─ above_threshold + alert
//! ```
//!
//! Classification looks at the scaled value before rounding. A record that
//! fails (non-finite value or an injected failure) is reported in the
//! batch's failure list and never stops the rest of the batch.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use sensorwatch_core::{mean, round_to, SystemClock, TimeSource};

use crate::errors::{ProcessingError, ProcessingResult};
use crate::failure::{FailurePolicy, NeverFail};
use crate::record::{ProcessedRecord, Record, RecordStatus};
use crate::rules::ProcessingRules;

/// Lifecycle of a [`DataProcessor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorState {
    /// Nothing processed yet
    #[default]
    Idle,
    /// A batch is in flight
    Processing,
    /// Last batch finished without failures
    Completed,
    /// Last batch had at least one failure
    Error,
}

impl fmt::Display for ProcessorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProcessorState::Idle => "idle",
            ProcessorState::Processing => "processing",
            ProcessorState::Completed => "completed",
            ProcessorState::Error => "error",
        })
    }
}

/// A record that could not be processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingFailure {
    /// Id of the record
    pub item_id: String,
    /// Error message
    pub error: String,
    /// When the failure happened
    pub timestamp: DateTime<Utc>,
}

/// Aggregates of one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStatistics {
    /// Sequence number of the batch
    pub batch_number: u64,
    /// Records submitted
    pub total_items: usize,
    /// Records processed
    pub successful: usize,
    /// Records that failed
    pub failed: usize,
    /// Wall time in seconds, three decimals
    pub processing_time: f64,
    /// Mean processed value, two decimals; 0 with no successes
    pub avg_value: f64,
    /// Processed records above the threshold
    pub alerts: usize,
}

/// Everything produced by one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Processed records, in input order
    pub results: Vec<ProcessedRecord>,
    /// Failed records, in input order
    pub failures: Vec<ProcessingFailure>,
    /// Aggregates
    pub statistics: BatchStatistics,
}

/// Life-of-instance totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorSummary {
    /// Records processed across all batches
    pub total_processed: u64,
    /// Records failed across all batches
    pub total_errors: u64,
    /// Batches run
    pub batches_processed: u64,
    /// Current lifecycle state
    pub current_state: ProcessorState,
    /// Successful share as a percentage, one decimal; 0 before any attempt
    pub success_rate: f64,
}

/// Transform-and-threshold batch processor
///
/// ```
/// use sensorwatch_pipeline::{DataProcessor, ProcessingRules, RecordGenerator};
///
/// let mut generator = RecordGenerator::seeded(1);
/// let mut processor = DataProcessor::new(ProcessingRules::default())?;
///
/// let result = processor.process_batch(&generator.generate_batch(5));
/// assert_eq!(result.statistics.successful, 5);
/// assert_eq!(processor.summary().success_rate, 100.0);
/// # Ok::<(), sensorwatch_pipeline::ProcessingError>(())
/// ```
pub struct DataProcessor {
    rules: ProcessingRules,
    failure_policy: Box<dyn FailurePolicy>,
    clock: Arc<dyn TimeSource>,
    processed_count: u64,
    error_count: u64,
    batch_number: u64,
    state: ProcessorState,
    results: Vec<ProcessedRecord>,
}

impl DataProcessor {
    /// Processor that never injects failures
    pub fn new(rules: ProcessingRules) -> ProcessingResult<Self> {
        rules.validate()?;
        Ok(Self {
            rules,
            failure_policy: Box::new(NeverFail),
            clock: Arc::new(SystemClock),
            processed_count: 0,
            error_count: 0,
            batch_number: 0,
            state: ProcessorState::Idle,
            results: Vec::new(),
        })
    }

    /// Replace the failure policy
    pub fn with_failure_policy(mut self, policy: impl FailurePolicy + 'static) -> Self {
        self.failure_policy = Box::new(policy);
        self
    }

    /// Stamp records with a specific clock
    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    /// Rules in effect
    pub fn rules(&self) -> &ProcessingRules {
        &self.rules
    }

    /// Current lifecycle state
    pub fn state(&self) -> ProcessorState {
        self.state
    }

    /// Sequence number of the most recent batch
    pub fn batch_number(&self) -> u64 {
        self.batch_number
    }

    /// Every record processed so far, oldest first
    pub fn results(&self) -> &[ProcessedRecord] {
        &self.results
    }

    /// Transform one record
    ///
    /// Does not touch the counters or the results log; only
    /// [`process_batch`](Self::process_batch) does.
    pub fn process_item(&mut self, record: &Record) -> ProcessingResult<ProcessedRecord> {
        if !record.value.is_finite() {
            return Err(ProcessingError::InvalidValue {
                item_id: record.id.clone(),
                value: record.value,
            });
        }

        let scaled = record.value * self.rules.multiplier;
        let above = scaled > self.rules.threshold;

        if self.failure_policy.should_fail(record) {
            return Err(ProcessingError::InjectedFailure {
                item_id: record.id.clone(),
            });
        }

        Ok(ProcessedRecord {
            id: record.id.clone(),
            category: record.category,
            priority: record.priority,
            created_at: record.created_at,
            original_value: record.value,
            value: round_to(scaled, self.rules.round_digits),
            status: if above {
                RecordStatus::AboveThreshold
            } else {
                RecordStatus::Normal
            },
            alert: above,
            batch_number: self.batch_number,
            processed_at: self.clock.now_utc(),
        })
    }

    /// Process every record, collecting successes and failures separately
    pub fn process_batch(&mut self, records: &[Record]) -> BatchResult {
        self.batch_number += 1;
        self.state = ProcessorState::Processing;
        debug!("batch {}: processing {} records", self.batch_number, records.len());

        let started = Instant::now();
        let mut results = Vec::with_capacity(records.len());
        let mut failures = Vec::new();

        for record in records {
            match self.process_item(record) {
                Ok(processed) => {
                    self.processed_count += 1;
                    results.push(processed);
                }
                Err(e) => {
                    warn!("batch {}: {}", self.batch_number, e);
                    self.error_count += 1;
                    failures.push(ProcessingFailure {
                        item_id: record.id.clone(),
                        error: e.to_string(),
                        timestamp: self.clock.now_utc(),
                    });
                }
            }
        }

        let values: Vec<f64> = results.iter().map(|r: &ProcessedRecord| r.value).collect();
        let statistics = BatchStatistics {
            batch_number: self.batch_number,
            total_items: records.len(),
            successful: results.len(),
            failed: failures.len(),
            processing_time: round_to(started.elapsed().as_secs_f64(), 3),
            avg_value: mean(&values).map(|m| round_to(m, 2)).unwrap_or(0.0),
            alerts: results.iter().filter(|r| r.alert).count(),
        };

        self.results.extend(results.iter().cloned());
        self.state = if failures.is_empty() {
            ProcessorState::Completed
        } else {
            ProcessorState::Error
        };
        info!(
            "batch {}: {}/{} processed, {} alerts",
            statistics.batch_number, statistics.successful, statistics.total_items, statistics.alerts
        );

        BatchResult {
            results,
            failures,
            statistics,
        }
    }

    /// Totals since the processor was created
    pub fn summary(&self) -> ProcessorSummary {
        let attempted = self.processed_count + self.error_count;
        let success_rate = if attempted > 0 {
            round_to(self.processed_count as f64 / attempted as f64 * 100.0, 1)
        } else {
            0.0
        };

        ProcessorSummary {
            total_processed: self.processed_count,
            total_errors: self.error_count,
            batches_processed: self.batch_number,
            current_state: self.state,
            success_rate,
        }
    }
}

impl fmt::Debug for DataProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataProcessor")
            .field("rules", &self.rules)
            .field("state", &self.state)
            .field("batch_number", &self.batch_number)
            .field("processed_count", &self.processed_count)
            .field("error_count", &self.error_count)
            .finish()
    }
}
