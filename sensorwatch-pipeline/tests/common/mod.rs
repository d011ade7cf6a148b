//! Shared fixtures for the pipeline integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sensorwatch_core::time::to_datetime;
use sensorwatch_core::ManualClock;
use sensorwatch_pipeline::{Category, Priority, Record};

/// 2023-11-14T22:13:20Z
pub const START_MS: u64 = 1_700_000_000_000;

pub fn start_time() -> DateTime<Utc> {
    to_datetime(START_MS)
}

/// Manual clock plus a shareable handle for components
pub fn manual_clock() -> (ManualClock, Arc<ManualClock>) {
    let clock = ManualClock::new(START_MS);
    (clock.clone(), Arc::new(clock))
}

/// Records `item_0_<i>` with the given values
pub fn records(values: &[f64]) -> Vec<Record> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            Record::new(
                format!("item_0_{}", i),
                *value,
                Category::ALL[i % 3],
                Priority::ALL[i % 3],
                start_time(),
            )
        })
        .collect()
}
