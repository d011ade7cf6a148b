//! Small numeric helpers shared by the analytics and processing code

use crate::errors::{CoreError, CoreResult};

/// Round to a fixed number of decimal places
///
/// Halfway cases round away from zero.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Accept `value` only if it is a probability in `[0, 1]`
pub fn check_probability(value: f64) -> CoreResult<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(CoreError::InvalidProbability { value })
    }
}

/// Accept `[low, high]` only if both ends are finite and ordered
pub fn check_range(low: f64, high: f64) -> CoreResult<(f64, f64)> {
    if low.is_finite() && high.is_finite() && low <= high {
        Ok((low, high))
    } else {
        Err(CoreError::InvalidRange { low, high })
    }
}
