//! Property tests for the rolling buffer
//!
//! The buffer is the backbone of every "keep the last N" collection, so its
//! bounds and ordering are checked against a plain vector model.

use proptest::prelude::*;
use sensorwatch_core::CircularBuffer;

proptest! {
    #[test]
    fn never_exceeds_capacity(capacity in 1usize..64, pushes in 0usize..300) {
        let mut buffer = CircularBuffer::with_capacity(capacity).unwrap();
        for i in 0..pushes {
            buffer.push(i);
            prop_assert!(buffer.len() <= capacity);
        }
        prop_assert_eq!(buffer.len(), pushes.min(capacity));
    }

    #[test]
    fn keeps_newest_in_order(capacity in 1usize..32, items in prop::collection::vec(any::<i32>(), 0..200)) {
        let mut buffer = CircularBuffer::with_capacity(capacity).unwrap();
        for item in &items {
            buffer.push(*item);
        }

        let expected: Vec<i32> = items
            .iter()
            .skip(items.len().saturating_sub(capacity))
            .copied()
            .collect();
        prop_assert_eq!(buffer.to_vec(), expected);
    }

    #[test]
    fn evicts_exactly_the_overflow(capacity in 1usize..32, extra in 0usize..50) {
        let mut buffer = CircularBuffer::with_capacity(capacity).unwrap();
        let evicted: Vec<usize> = (0..capacity + extra)
            .filter_map(|i| buffer.push(i))
            .collect();

        // The oldest `extra` items are gone and the newest is present
        prop_assert_eq!(evicted, (0..extra).collect::<Vec<_>>());
        prop_assert_eq!(buffer.first(), Some(&extra));
        prop_assert_eq!(buffer.last(), Some(&(capacity + extra - 1)));
    }
}
