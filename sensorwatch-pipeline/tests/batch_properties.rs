//! Property tests for batch accounting

mod common;

use proptest::prelude::*;
use sensorwatch_core::round_to;
use sensorwatch_pipeline::{ChanceFailure, DataProcessor, ProcessingRules};

use common::records;

proptest! {
    #[test]
    fn successes_plus_failures_equal_batch_size(
        values in prop::collection::vec(-1000.0f64..1000.0, 0..64),
        rate in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let mut processor = DataProcessor::new(ProcessingRules::default())
            .unwrap()
            .with_failure_policy(ChanceFailure::new(rate, sensorwatch_core::SeededEntropy::from_seed(seed)).unwrap());

        let batch = records(&values);
        let result = processor.process_batch(&batch);

        prop_assert_eq!(result.statistics.successful + result.statistics.failed, batch.len());
        prop_assert_eq!(result.results.len(), result.statistics.successful);
        prop_assert_eq!(result.failures.len(), result.statistics.failed);

        let summary = processor.summary();
        prop_assert_eq!((summary.total_processed + summary.total_errors) as usize, batch.len());
    }

    #[test]
    fn transform_is_scale_then_round(
        value in -1000.0f64..1000.0,
        multiplier in -10.0f64..10.0,
        digits in 0u32..6,
    ) {
        let rules = ProcessingRules::default()
            .with_multiplier(multiplier)
            .with_round_digits(digits);
        let mut processor = DataProcessor::new(rules).unwrap();

        let processed = processor.process_item(&records(&[value])[0]).unwrap();
        prop_assert_eq!(processed.value, round_to(value * multiplier, digits));
        prop_assert_eq!(processed.alert, value * multiplier > 50.0);
    }
}
