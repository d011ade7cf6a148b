//! Records and their processed form
//!
//! A [`Record`] is immutable once generated. Processing never mutates it;
//! it produces a separate [`ProcessedRecord`] that carries the original
//! fields alongside the transformed value.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sensorwatch_core::{Entropy, SeededEntropy, SystemClock, TimeSource};

/// Category tag of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Category A
    A,
    /// Category B
    B,
    /// Category C
    C,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 3] = [Category::A, Category::B, Category::C];
}

/// Priority tag of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority
    Low,
    /// Medium priority
    Medium,
    /// High priority
    High,
}

impl Priority {
    /// Every priority, lowest first
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];
}

/// One input item of the batch processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier, `item_<batch>_<index>` when generated
    pub id: String,
    /// Raw value
    pub value: f64,
    /// Category tag
    pub category: Category,
    /// Priority tag
    pub priority: Priority,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl Record {
    /// Build a record stamped with `created_at`
    pub fn new(
        id: impl Into<String>,
        value: f64,
        category: Category,
        priority: Priority,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            value,
            category,
            priority,
            created_at,
        }
    }
}

/// Outcome of the threshold check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Scaled value at or below the threshold
    Normal,
    /// Scaled value strictly above the threshold
    AboveThreshold,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordStatus::Normal => "normal",
            RecordStatus::AboveThreshold => "above_threshold",
        })
    }
}

/// A record after the transform-and-threshold pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedRecord {
    /// Id of the source record
    pub id: String,
    /// Category of the source record
    pub category: Category,
    /// Priority of the source record
    pub priority: Priority,
    /// Creation time of the source record
    pub created_at: DateTime<Utc>,
    /// Value before scaling
    pub original_value: f64,
    /// Scaled and rounded value
    pub value: f64,
    /// Threshold classification of the scaled value
    pub status: RecordStatus,
    /// Set when above the threshold
    pub alert: bool,
    /// Batch sequence number at processing time
    pub batch_number: u64,
    /// When the record was processed
    pub processed_at: DateTime<Utc>,
}

/// Fabricates batches of random records
///
/// ```
/// use sensorwatch_pipeline::RecordGenerator;
///
/// let mut generator = RecordGenerator::seeded(7);
/// let batch = generator.generate_batch(3);
/// assert_eq!(batch[2].id, "item_0_2");
/// assert_eq!(generator.generate_batch(1)[0].id, "item_1_0");
/// ```
pub struct RecordGenerator {
    entropy: Box<dyn Entropy + Send>,
    clock: Arc<dyn TimeSource>,
    batch_number: u64,
}

impl RecordGenerator {
    /// Generator over the system clock and the given randomness
    pub fn new(entropy: impl Entropy + Send + 'static) -> Self {
        Self {
            entropy: Box::new(entropy),
            clock: Arc::new(SystemClock),
            batch_number: 0,
        }
    }

    /// Reproducible generator
    pub fn seeded(seed: u64) -> Self {
        Self::new(SeededEntropy::from_seed(seed))
    }

    /// Stamp records with a specific clock
    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    /// Batches generated so far
    pub fn batches_generated(&self) -> u64 {
        self.batch_number
    }

    /// `size` records with values uniform in `[0, 100)`
    pub fn generate_batch(&mut self, size: usize) -> Vec<Record> {
        let created_at = self.clock.now_utc();
        let batch = (0..size)
            .map(|index| {
                let value = self.entropy.uniform(0.0, 100.0);
                let category = Category::ALL[self.entropy.pick_index(Category::ALL.len())];
                let priority = Priority::ALL[self.entropy.pick_index(Priority::ALL.len())];
                Record::new(
                    format!("item_{}_{}", self.batch_number, index),
                    value,
                    category,
                    priority,
                    created_at,
                )
            })
            .collect();

        self.batch_number += 1;
        batch
    }
}

impl fmt::Debug for RecordGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordGenerator")
            .field("batch_number", &self.batch_number)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensorwatch_core::{ManualClock, ScriptedEntropy};

    #[test]
    fn generated_values_in_range() {
        let mut generator = RecordGenerator::seeded(42);
        let batch = generator.generate_batch(200);
        assert_eq!(batch.len(), 200);
        assert!(batch.iter().all(|r| (0.0..100.0).contains(&r.value)));
    }

    #[test]
    fn scripted_draws_pick_tags() {
        // value, category, priority
        let entropy = ScriptedEntropy::new(vec![0.25, 0.5, 0.9]);
        let clock = ManualClock::new(0);
        let mut generator = RecordGenerator::new(entropy).with_clock(Arc::new(clock));

        let record = &generator.generate_batch(1)[0];
        assert_eq!(record.value, 25.0);
        assert_eq!(record.category, Category::B);
        assert_eq!(record.priority, Priority::High);
        assert_eq!(record.created_at.timestamp_millis(), 0);
    }

    #[test]
    fn batch_numbers_advance() {
        let mut generator = RecordGenerator::seeded(1);
        generator.generate_batch(0);
        generator.generate_batch(2);
        assert_eq!(generator.batches_generated(), 2);
        assert_eq!(generator.generate_batch(1)[0].id, "item_2_0");
    }

    #[test]
    fn tags_serialize_like_their_labels() {
        assert_eq!(serde_json::to_string(&Category::C).unwrap(), "\"C\"");
        assert_eq!(serde_json::to_string(&Priority::Medium).unwrap(), "\"medium\"");
        assert_eq!(
            serde_json::to_string(&RecordStatus::AboveThreshold).unwrap(),
            "\"above_threshold\""
        );
    }
}
