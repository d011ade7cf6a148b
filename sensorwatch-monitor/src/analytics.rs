//! Per-sensor analytics over the rolling history
//!
//! Trend detection compares the mean of the newest [`TREND_WINDOW`] readings
//! with the window before it. Until two full windows exist the oldest window
//! is used as the baseline, so the two may overlap. Fewer than
//! `TREND_WINDOW + 1` readings is always `stable`.

use std::fmt;

use serde::{Deserialize, Serialize};

use sensorwatch_core::constants::{TREND_TOLERANCE, TREND_WINDOW};
use sensorwatch_core::{mean, round_to};

/// Direction of recent readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Recent mean more than 5% above the baseline
    Increasing,
    /// Recent mean more than 5% below the baseline
    Decreasing,
    /// Neither
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        })
    }
}

/// Summary of one sensor's retained history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorAnalytics {
    /// Newest value
    pub current: f64,
    /// Mean, two decimals
    pub avg: f64,
    /// Minimum, two decimals
    pub min: f64,
    /// Maximum, two decimals
    pub max: f64,
    /// Direction of the newest readings
    pub trend: Trend,
    /// Readings considered
    pub count: usize,
}

impl SensorAnalytics {
    /// Analyse values ordered oldest first; `None` when empty
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let current = *values.last()?;
        let avg = mean(values)?;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            current,
            avg: round_to(avg, 2),
            min: round_to(min, 2),
            max: round_to(max, 2),
            trend: detect_trend(values),
            count: values.len(),
        })
    }
}

/// Classify the direction of values ordered oldest first
pub fn detect_trend(values: &[f64]) -> Trend {
    let len = values.len();
    if len <= TREND_WINDOW {
        return Trend::Stable;
    }

    let recent = &values[len - TREND_WINDOW..];
    let older = if len > 2 * TREND_WINDOW {
        &values[len - 2 * TREND_WINDOW..len - TREND_WINDOW]
    } else {
        &values[..TREND_WINDOW]
    };

    let (Some(recent_avg), Some(older_avg)) = (mean(recent), mean(older)) else {
        return Trend::Stable;
    };

    if recent_avg > older_avg * (1.0 + TREND_TOLERANCE) {
        Trend::Increasing
    } else if recent_avg < older_avg * (1.0 - TREND_TOLERANCE) {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windows(older: f64, recent: f64) -> Vec<f64> {
        let mut values = vec![older; 10];
        values.extend(std::iter::repeat(recent).take(10));
        values
    }

    #[test]
    fn rising_six_percent_is_increasing() {
        assert_eq!(detect_trend(&windows(100.0, 106.0)), Trend::Increasing);
    }

    #[test]
    fn falling_six_percent_is_decreasing() {
        assert_eq!(detect_trend(&windows(100.0, 94.0)), Trend::Decreasing);
    }

    #[test]
    fn small_change_is_stable() {
        assert_eq!(detect_trend(&windows(100.0, 104.0)), Trend::Stable);
        assert_eq!(detect_trend(&windows(50.0, 50.0)), Trend::Stable);
    }

    #[test]
    fn short_history_is_stable() {
        let values: Vec<f64> = (0..10).map(|i| i as f64 * 10.0).collect();
        assert_eq!(detect_trend(&values), Trend::Stable);
    }

    #[test]
    fn only_the_last_two_windows_matter() {
        // A steep early rise followed by two flat windows
        let mut values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        values.extend(windows(50.0, 50.0));
        assert_eq!(detect_trend(&values), Trend::Stable);
    }

    #[test]
    fn overlapping_windows_below_twenty_readings() {
        // 15 readings: baseline is the first 10, recent the last 10
        let mut values = vec![10.0; 5];
        values.extend(vec![20.0; 10]);
        assert_eq!(detect_trend(&values), Trend::Increasing);
    }

    #[test]
    fn summary_rounds_to_two_places() {
        let analytics = SensorAnalytics::from_values(&[1.0, 2.0, 2.0]).unwrap();
        assert_eq!(analytics.current, 2.0);
        assert_eq!(analytics.avg, 1.67);
        assert_eq!(analytics.min, 1.0);
        assert_eq!(analytics.max, 2.0);
        assert_eq!(analytics.count, 3);
        assert_eq!(analytics.trend, Trend::Stable);
    }

    #[test]
    fn empty_history_has_no_analytics() {
        assert!(SensorAnalytics::from_values(&[]).is_none());
    }
}
