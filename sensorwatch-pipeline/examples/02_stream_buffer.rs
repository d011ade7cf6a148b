//! Feed a mixed stream through a small buffer, flushing at 70% full
//!
//! Even items are text, odd items are numbers. Every flush is followed by a
//! checkpoint named after the item that triggered it.

use std::thread;
use std::time::Duration;

use sensorwatch_core::constants::DEFAULT_FLUSH_FRACTION;
use sensorwatch_pipeline::stream::{Payload, StreamBuffer};
use sensorwatch_pipeline::ProcessingResult;

fn main() -> ProcessingResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut stream = StreamBuffer::new(10)?;

    for i in 0..25 {
        let item = if i % 2 == 0 {
            Payload::from(format!("message_{}", i))
        } else {
            Payload::from(i * 10)
        };
        stream.receive(item);

        if stream.should_flush(DEFAULT_FLUSH_FRACTION) {
            let flushed = stream.flush();
            println!("flushed {} items:", flushed.len());
            for item in &flushed {
                println!(
                    "  #{:<3} {:>12} -> {:<12} ({} ms)",
                    item.position, item.original, item.transformed, item.latency_ms
                );
            }
            stream.checkpoint(format!("checkpoint_{}", i));
        }

        thread::sleep(Duration::from_millis(10));
    }

    let remaining = stream.flush();
    println!("final flush: {} items", remaining.len());

    let state = stream.state();
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&state).unwrap_or_default()
    );

    Ok(())
}
