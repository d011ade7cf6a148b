//! Generate random batches and push them through the processor
//!
//! Roughly one record in twenty fails on purpose; the failures are logged
//! at `warn` and reported per batch.

use sensorwatch_pipeline::{
    ChanceFailure, DataProcessor, ProcessingResult, ProcessingRules, RecordGenerator,
};

fn main() -> ProcessingResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let rules = ProcessingRules::from_json_str(r#"{ "multiply": 1.5, "threshold": 50.0 }"#)?;
    let mut generator = RecordGenerator::seeded(42);
    let mut processor = DataProcessor::new(rules)?.with_failure_policy(ChanceFailure::demo(42));

    for size in [10, 25, 5] {
        let batch = generator.generate_batch(size);
        let result = processor.process_batch(&batch);
        let stats = &result.statistics;

        println!(
            "batch {}: {}/{} ok, avg {:.2}, {} alert(s), {:.3} s",
            stats.batch_number,
            stats.successful,
            stats.total_items,
            stats.avg_value,
            stats.alerts,
            stats.processing_time
        );
        for failure in &result.failures {
            println!("  failed {}: {}", failure.item_id, failure.error);
        }
    }

    let summary = processor.summary();
    println!();
    println!(
        "{} processed, {} errors over {} batches ({}% success, state {})",
        summary.total_processed,
        summary.total_errors,
        summary.batches_processed,
        summary.success_rate,
        summary.current_state
    );

    if let Some(last) = processor.results().last() {
        println!();
        println!("{}", serde_json::to_string_pretty(last).unwrap_or_default());
    }

    Ok(())
}
