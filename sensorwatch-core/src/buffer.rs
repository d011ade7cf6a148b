//! Fixed-Capacity Circular Buffer for Rolling History
//!
//! ## Overview
//!
//! Sensor history, alert logs and any other "keep the last N" collection in
//! SensorWatch is backed by this ring buffer. When the buffer is full a push
//! overwrites the oldest entry, so the most recent `capacity` items are always
//! retained and memory use never grows after construction.
//!
//! ## Memory Layout
//!
//! Storage is a vector of `Option<T>` allocated once, at construction:
//!
//! ```text
//! CircularBuffer with capacity 5, after 7 pushes:
//! ┌─────┬─────┬─────┬─────┬─────┐
//! │  F  │  G  │  C  │  D  │  E  │  ← physical slots
//! └─────┴─────┴─────┴─────┴─────┘
//!              ↑
//!              └── write_pos = 2 (oldest item, next to be overwritten)
//!
//! Logical view (oldest → newest): [C, D, E, F, G]
//! ```
//!
//! ## Characteristics
//!
//! - `push()`: O(1), returns the evicted item when full
//! - `last()`: O(1)
//! - `iter()`: O(n), oldest to newest
//! - `tail(n)`: O(n), the newest `n` items, oldest first
//!
//! ## Usage Example
//!
//! ```rust
//! use sensorwatch_core::CircularBuffer;
//!
//! let mut history = CircularBuffer::with_capacity(3).unwrap();
//! for value in [1.0, 2.0, 3.0, 4.0] {
//!     history.push(value);
//! }
//!
//! let values: Vec<f64> = history.iter().copied().collect();
//! assert_eq!(values, vec![2.0, 3.0, 4.0]);
//! assert_eq!(history.last(), Some(&4.0));
//! ```

use crate::errors::{CoreError, CoreResult};

/// Fixed-capacity ring buffer that evicts its oldest item on overflow
///
/// ## Internal Invariants
///
/// - `write_pos < capacity`
/// - `len <= capacity`
/// - Slots `[0, len)` are occupied until the first wrap, after which every
///   slot is occupied and the oldest item sits at `write_pos`
///
/// ## Thread Safety
///
/// Not synchronised. Wrap it in a mutex when it is shared across threads.
#[derive(Debug, Clone)]
pub struct CircularBuffer<T> {
    /// Storage, allocated once
    data: Vec<Option<T>>,

    /// Index where the next write will occur
    write_pos: usize,

    /// Current number of stored items
    len: usize,
}

impl<T> CircularBuffer<T> {
    /// Creates an empty buffer holding at most `capacity` items
    ///
    /// A zero capacity is rejected since such a buffer could never retain
    /// anything.
    pub fn with_capacity(capacity: usize) -> CoreResult<Self> {
        if capacity == 0 {
            return Err(CoreError::ZeroCapacity);
        }

        let mut data = Vec::with_capacity(capacity);
        data.resize_with(capacity, || None);

        Ok(Self {
            data,
            write_pos: 0,
            len: 0,
        })
    }

    /// Adds an item, returning the evicted oldest item when the buffer was full
    ///
    /// ```rust
    /// # use sensorwatch_core::CircularBuffer;
    /// let mut buf = CircularBuffer::with_capacity(2).unwrap();
    /// assert_eq!(buf.push('a'), None);
    /// assert_eq!(buf.push('b'), None);
    /// assert_eq!(buf.push('c'), Some('a'));
    /// ```
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = self.data[self.write_pos].replace(item);
        self.write_pos = (self.write_pos + 1) % self.capacity();

        if self.len < self.capacity() {
            self.len += 1;
        }

        evicted
    }

    /// Maximum number of items the buffer retains
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Most recent item
    pub fn last(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }

        let idx = if self.write_pos == 0 {
            self.capacity() - 1
        } else {
            self.write_pos - 1
        };

        self.data[idx].as_ref()
    }

    /// Oldest item still retained
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> CircularBufferIter<'_, T> {
        CircularBufferIter {
            buffer: self,
            index: 0,
        }
    }

    /// Iterate over the newest `count` items, oldest first
    ///
    /// Yields everything when `count` exceeds the stored length.
    pub fn tail(&self, count: usize) -> CircularBufferIter<'_, T> {
        CircularBufferIter {
            buffer: self,
            index: self.len.saturating_sub(count),
        }
    }

    /// Remove every item
    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(|slot| *slot = None);
        self.write_pos = 0;
        self.len = 0;
    }

    /// Gets an item by its logical index (0 = oldest, len-1 = newest)
    ///
    /// Before the first wrap logical and physical indices match. Once full,
    /// the oldest item sits at `write_pos`, so the index is offset:
    ///
    /// ```text
    /// Physical:  [D, E, A, B, C]  (write_pos = 2)
    /// Logical:   [A, B, C, D, E]
    /// logical[i] = physical[(write_pos + i) % capacity]
    /// ```
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }

        let actual_index = if self.len < self.capacity() {
            index
        } else {
            (self.write_pos + index) % self.capacity()
        };

        self.data[actual_index].as_ref()
    }
}

impl<T: Clone> CircularBuffer<T> {
    /// Copy the contents into a vector, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

/// Iterator over circular buffer contents, oldest first
pub struct CircularBufferIter<'a, T> {
    buffer: &'a CircularBuffer<T>,
    index: usize,
}

impl<'a, T> Iterator for CircularBufferIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for CircularBufferIter<'_, T> {}

impl<'a, T> IntoIterator for &'a CircularBuffer<T> {
    type Item = &'a T;
    type IntoIter = CircularBufferIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
