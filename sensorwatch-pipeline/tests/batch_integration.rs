//! Integration tests for the batch processor

mod common;

use sensorwatch_core::round_to;
use sensorwatch_pipeline::failure::fail_when;
use sensorwatch_pipeline::{
    ChanceFailure, DataProcessor, ProcessingRules, ProcessorState, Record, RecordGenerator,
    RecordStatus,
};

use common::{manual_clock, records};

#[test]
fn test_batch_of_five_without_failures() {
    let mut processor = DataProcessor::new(ProcessingRules::default()).unwrap();
    let batch = records(&[10.0, 20.0, 30.0, 40.0, 50.0]);

    let result = processor.process_batch(&batch);
    let stats = &result.statistics;

    assert_eq!(stats.batch_number, 1);
    assert_eq!(stats.total_items, 5);
    assert_eq!(stats.successful, 5);
    assert_eq!(stats.failed, 0);
    // 15, 30, 45, 60, 75
    assert_eq!(stats.avg_value, 45.0);
    assert_eq!(stats.alerts, 2);
    assert!(stats.processing_time >= 0.0);
    assert_eq!(processor.state(), ProcessorState::Completed);
}

#[test]
fn test_transformed_value_matches_rules() {
    let rules = ProcessingRules::default()
        .with_multiplier(1.5)
        .with_threshold(50.0)
        .with_round_digits(2);
    let mut processor = DataProcessor::new(rules).unwrap();

    let mut generator = RecordGenerator::seeded(99);
    let batch = generator.generate_batch(50);
    let result = processor.process_batch(&batch);

    for (record, processed) in batch.iter().zip(&result.results) {
        let scaled = record.value * 1.5;
        assert_eq!(processed.id, record.id);
        assert_eq!(processed.original_value, record.value);
        assert_eq!(processed.value, round_to(scaled, 2));
        assert_eq!(processed.alert, scaled > 50.0);
        assert_eq!(
            processed.status == RecordStatus::AboveThreshold,
            scaled > 50.0
        );
    }
}

#[test]
fn test_every_item_failing_still_completes_batch() {
    let mut processor = DataProcessor::new(ProcessingRules::default())
        .unwrap()
        .with_failure_policy(fail_when(|_: &Record| true));

    let result = processor.process_batch(&records(&[1.0, 2.0, 3.0]));
    assert_eq!(result.statistics.successful, 0);
    assert_eq!(result.statistics.failed, 3);
    assert_eq!(result.statistics.avg_value, 0.0);
    assert_eq!(result.failures.len(), 3);
    assert_eq!(processor.state(), ProcessorState::Error);
    assert!(processor.results().is_empty());
    assert_eq!(processor.summary().success_rate, 0.0);
}

#[test]
fn test_results_log_spans_batches() {
    let mut processor = DataProcessor::new(ProcessingRules::default()).unwrap();
    processor.process_batch(&records(&[1.0, 2.0]));
    processor.process_batch(&records(&[3.0]));

    let log = processor.results();
    assert_eq!(log.len(), 3);
    assert_eq!(log[0].batch_number, 1);
    assert_eq!(log[2].batch_number, 2);
}

#[test]
fn test_error_state_recovers_on_clean_batch() {
    let mut processor = DataProcessor::new(ProcessingRules::default())
        .unwrap()
        .with_failure_policy(fail_when(|r: &Record| r.value < 0.0));

    processor.process_batch(&records(&[-1.0, 5.0]));
    assert_eq!(processor.state(), ProcessorState::Error);

    processor.process_batch(&records(&[5.0]));
    assert_eq!(processor.state(), ProcessorState::Completed);

    let summary = processor.summary();
    assert_eq!(summary.total_processed, 2);
    assert_eq!(summary.total_errors, 1);
    assert_eq!(summary.success_rate, 66.7);
}

#[test]
fn test_chance_failure_is_reproducible() {
    let run = |seed: u64| {
        let mut generator = RecordGenerator::seeded(seed);
        let mut processor = DataProcessor::new(ProcessingRules::default())
            .unwrap()
            .with_failure_policy(ChanceFailure::demo(seed));
        let failed: Vec<String> = (0..10)
            .flat_map(|_| processor.process_batch(&generator.generate_batch(10)).failures)
            .map(|f| f.item_id)
            .collect();
        failed
    };

    assert_eq!(run(7), run(7));
}

#[test]
fn test_timestamps_come_from_the_clock() {
    let (clock, shared) = manual_clock();
    let mut generator = RecordGenerator::seeded(1).with_clock(shared.clone());
    let mut processor = DataProcessor::new(ProcessingRules::default())
        .unwrap()
        .with_clock(shared);

    let batch = generator.generate_batch(2);
    clock.advance(250);
    let result = processor.process_batch(&batch);

    let processed = &result.results[0];
    assert_eq!(
        (processed.processed_at - processed.created_at).num_milliseconds(),
        250
    );
}

#[test]
fn test_batch_result_serializes() {
    let mut processor = DataProcessor::new(ProcessingRules::default())
        .unwrap()
        .with_failure_policy(fail_when(|r: &Record| r.id == "item_0_1"));
    let result = processor.process_batch(&records(&[40.0, 10.0]));

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["results"][0]["status"], "above_threshold");
    assert_eq!(json["results"][0]["priority"], "low");
    assert_eq!(json["failures"][0]["item_id"], "item_0_1");
    assert_eq!(json["statistics"]["failed"], 1);

    let summary = serde_json::to_value(processor.summary()).unwrap();
    assert_eq!(summary["current_state"], "error");
}
