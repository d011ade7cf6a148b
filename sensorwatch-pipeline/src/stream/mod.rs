//! Bounded stream buffer
//!
//! Items are admitted one at a time into a staging area of fixed capacity.
//! A full staging area rejects new items instead of evicting old ones; the
//! rejection is counted as an overflow. [`StreamBuffer::flush`] drains the
//! whole staging area through the transform table in admission order.
//!
//! ```text
//! receive() ─▶ [ staged 0 | staged 1 | ... | staged N-1 ] ─▶ flush() ─▶ transformed
//!    │ full
//!    └──▶ buffer_overflows += 1
//! ```
//!
//! Named checkpoints snapshot the stream position and counters at any time.

mod transform;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use sensorwatch_core::constants::DEFAULT_STREAM_CAPACITY;
use sensorwatch_core::time::delta_ms;
use sensorwatch_core::{round_to, CoreError, SystemClock, TimeSource, Timestamp};

use crate::errors::ProcessingResult;

pub use transform::{Payload, PayloadKind, TransformTable, TransformedItem};

/// An admitted item waiting for the next flush
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedItem {
    /// Stream position assigned on admission
    pub position: u64,
    /// The item
    pub payload: Payload,
    /// Admission time, milliseconds since the Unix epoch
    pub received_at: Timestamp,
}

/// Counters of a stream buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMetrics {
    /// Items admitted
    pub items_received: u64,
    /// Items flushed
    pub items_processed: u64,
    /// Admissions rejected because the buffer was full
    pub buffer_overflows: u64,
    /// Checkpoints taken
    pub checkpoint_saves: u64,
}

/// Named snapshot of a stream buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint name
    pub name: String,
    /// Stream position at the time
    pub position: u64,
    /// When it was taken
    pub timestamp: DateTime<Utc>,
    /// Counters at the time, before this checkpoint was counted
    pub metrics: StreamMetrics,
    /// Items staged at the time
    pub buffer_size: usize,
}

/// Point-in-time view of a stream buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamState {
    /// Items currently staged
    pub buffer_count: usize,
    /// Staging capacity
    pub capacity: usize,
    /// Staged share of capacity as a percentage, one decimal
    pub buffer_usage: f64,
    /// Next position to assign
    pub stream_position: u64,
    /// Counters
    pub metrics: StreamMetrics,
    /// Checkpoint names, sorted
    pub checkpoints: Vec<String>,
}

/// Fixed-capacity staging area with overflow counting and checkpoints
///
/// ```
/// use sensorwatch_pipeline::stream::{Payload, StreamBuffer};
///
/// let mut stream = StreamBuffer::new(2)?;
/// assert!(stream.receive("a"));
/// assert!(stream.receive(21));
/// assert!(!stream.receive("dropped"));
///
/// let flushed = stream.flush();
/// assert_eq!(flushed[0].transformed, Payload::from("A"));
/// assert_eq!(flushed[1].transformed, Payload::Number(42.0));
/// assert_eq!(stream.metrics().buffer_overflows, 1);
/// # Ok::<(), sensorwatch_pipeline::ProcessingError>(())
/// ```
pub struct StreamBuffer {
    capacity: usize,
    staged: Vec<StagedItem>,
    position: u64,
    metrics: StreamMetrics,
    checkpoints: BTreeMap<String, Checkpoint>,
    transforms: TransformTable,
    clock: Arc<dyn TimeSource>,
}

impl StreamBuffer {
    /// Empty buffer staging at most `capacity` items
    pub fn new(capacity: usize) -> ProcessingResult<Self> {
        if capacity == 0 {
            return Err(CoreError::ZeroCapacity.into());
        }
        Ok(Self {
            capacity,
            staged: Vec::with_capacity(capacity),
            position: 0,
            metrics: StreamMetrics::default(),
            checkpoints: BTreeMap::new(),
            transforms: TransformTable::default(),
            clock: Arc::new(SystemClock),
        })
    }

    /// Use a specific transform table
    pub fn with_transforms(mut self, transforms: TransformTable) -> Self {
        self.transforms = transforms;
        self
    }

    /// Use a specific clock for admission times and latencies
    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    /// Staging capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Items currently staged
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    /// Nothing staged
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Staged items, oldest first
    pub fn staged(&self) -> &[StagedItem] {
        &self.staged
    }

    /// Counters
    pub fn metrics(&self) -> StreamMetrics {
        self.metrics
    }

    /// Next position to assign
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Stored checkpoint by name
    pub fn checkpoint_named(&self, name: &str) -> Option<&Checkpoint> {
        self.checkpoints.get(name)
    }

    /// Admit an item; `false` (and an overflow) if the buffer is full
    pub fn receive(&mut self, payload: impl Into<Payload>) -> bool {
        if self.staged.len() >= self.capacity {
            self.metrics.buffer_overflows += 1;
            warn!(
                "stream buffer full ({} items), rejected item at position {}",
                self.capacity, self.position
            );
            return false;
        }

        self.staged.push(StagedItem {
            position: self.position,
            payload: payload.into(),
            received_at: self.clock.now(),
        });
        self.position += 1;
        self.metrics.items_received += 1;
        true
    }

    /// Whether the staged share has reached `fraction` of capacity
    pub fn should_flush(&self, fraction: f64) -> bool {
        self.staged.len() as f64 >= self.capacity as f64 * fraction
    }

    /// Transform and drain every staged item, in admission order
    pub fn flush(&mut self) -> Vec<TransformedItem> {
        let now = self.clock.now();
        let transforms = &self.transforms;
        let flushed: Vec<TransformedItem> = self
            .staged
            .drain(..)
            .map(|item| TransformedItem {
                position: item.position,
                transformed: transforms.apply(&item.payload),
                original: item.payload,
                latency_ms: delta_ms(item.received_at, now),
            })
            .collect();

        self.metrics.items_processed += flushed.len() as u64;
        if !flushed.is_empty() {
            debug!("flushed {} items from stream buffer", flushed.len());
        }
        flushed
    }

    /// Snapshot position and counters under `name`
    ///
    /// A checkpoint with the same name is overwritten.
    pub fn checkpoint(&mut self, name: impl Into<String>) -> Checkpoint {
        let checkpoint = Checkpoint {
            name: name.into(),
            position: self.position,
            timestamp: self.clock.now_utc(),
            metrics: self.metrics,
            buffer_size: self.staged.len(),
        };
        self.checkpoints
            .insert(checkpoint.name.clone(), checkpoint.clone());
        self.metrics.checkpoint_saves += 1;
        debug!("checkpoint {} at position {}", checkpoint.name, checkpoint.position);
        checkpoint
    }

    /// Point-in-time view
    pub fn state(&self) -> StreamState {
        StreamState {
            buffer_count: self.staged.len(),
            capacity: self.capacity,
            buffer_usage: round_to(self.staged.len() as f64 / self.capacity as f64 * 100.0, 1),
            stream_position: self.position,
            metrics: self.metrics,
            checkpoints: self.checkpoints.keys().cloned().collect(),
        }
    }
}

impl Default for StreamBuffer {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_STREAM_CAPACITY,
            staged: Vec::with_capacity(DEFAULT_STREAM_CAPACITY),
            position: 0,
            metrics: StreamMetrics::default(),
            checkpoints: BTreeMap::new(),
            transforms: TransformTable::default(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl std::fmt::Debug for StreamBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamBuffer")
            .field("capacity", &self.capacity)
            .field("staged", &self.staged.len())
            .field("position", &self.position)
            .field("metrics", &self.metrics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensorwatch_core::ManualClock;

    fn buffer(capacity: usize) -> (StreamBuffer, ManualClock) {
        let clock = ManualClock::new(10_000);
        let stream = StreamBuffer::new(capacity)
            .unwrap()
            .with_clock(Arc::new(clock.clone()));
        (stream, clock)
    }

    #[test]
    fn rejects_zero_capacity() {
        assert!(StreamBuffer::new(0).is_err());
    }

    #[test]
    fn capacity_ten_admit_twelve() {
        let (mut stream, _) = buffer(10);
        let admitted: Vec<bool> = (0..12).map(|i| stream.receive(i)).collect();

        assert_eq!(admitted.iter().filter(|a| **a).count(), 10);
        assert!(admitted[..10].iter().all(|a| *a));
        assert!(!admitted[10] && !admitted[11]);
        assert_eq!(stream.metrics().buffer_overflows, 2);
        assert_eq!(stream.metrics().items_received, 10);
        assert_eq!(stream.position(), 10);
    }

    #[test]
    fn flush_preserves_order_and_empties() {
        let (mut stream, clock) = buffer(5);
        stream.receive("a");
        clock.advance(30);
        stream.receive(1.5);
        clock.advance(20);

        let flushed = stream.flush();
        assert!(stream.is_empty());
        assert_eq!(flushed.len(), 2);
        assert_eq!(flushed[0].position, 0);
        assert_eq!(flushed[0].latency_ms, 50);
        assert_eq!(flushed[1].position, 1);
        assert_eq!(flushed[1].transformed, Payload::Number(3.0));
        assert_eq!(flushed[1].latency_ms, 20);
        assert_eq!(stream.metrics().items_processed, 2);

        assert!(stream.flush().is_empty());
        assert_eq!(stream.metrics().items_processed, 2);
    }

    #[test]
    fn positions_continue_after_flush() {
        let (mut stream, _) = buffer(2);
        stream.receive("a");
        stream.flush();
        stream.receive("b");
        assert_eq!(stream.staged()[0].position, 1);
    }

    #[test]
    fn checkpoint_snapshots_then_counts() {
        let (mut stream, _) = buffer(4);
        stream.receive("a");
        stream.receive("b");

        let first = stream.checkpoint("cp");
        assert_eq!(first.position, 2);
        assert_eq!(first.buffer_size, 2);
        assert_eq!(first.metrics.checkpoint_saves, 0);
        assert_eq!(stream.metrics().checkpoint_saves, 1);

        stream.flush();
        let second = stream.checkpoint("cp");
        assert_eq!(second.buffer_size, 0);
        assert_eq!(second.metrics.checkpoint_saves, 1);
        assert_eq!(stream.checkpoint_named("cp").unwrap().buffer_size, 0);
        assert_eq!(stream.state().checkpoints, vec!["cp".to_string()]);
    }

    #[test]
    fn flush_threshold() {
        let (mut stream, _) = buffer(10);
        for i in 0..6 {
            stream.receive(i);
        }
        assert!(!stream.should_flush(0.7));
        stream.receive(6);
        assert!(stream.should_flush(0.7));
    }

    #[test]
    fn state_reports_usage() {
        let (mut stream, _) = buffer(3);
        stream.receive("a");
        let state = stream.state();
        assert_eq!(state.buffer_count, 1);
        assert_eq!(state.buffer_usage, 33.3);
        assert_eq!(state.stream_position, 1);
    }

    #[test]
    fn custom_transforms_are_used() {
        let (stream, _) = buffer(2);
        let mut stream = stream.with_transforms(TransformTable::identity());
        stream.receive("quiet");
        assert_eq!(stream.flush()[0].transformed, Payload::from("quiet"));
    }
}
