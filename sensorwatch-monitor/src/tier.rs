//! Tier classification
//!
//! A reading is `normal` inside its sensor's normal range, `warning` when it
//! leaves the range by no more than [`TIER_MARGIN`] of the boundary's
//! magnitude, and `critical` beyond that:
//!
//! ```text
//!  critical │ warning │      normal       │ warning │ critical
//! ──────────┼─────────┼───────────────────┼─────────┼──────────
//!      low − 10%|low|  low             high   high + 10%|high|
//! ```
//!
//! Boundaries belong to the milder tier, so a value exactly at `high` is
//! normal and a value exactly at `high + 10%|high|` is still a warning.

use std::fmt;

use serde::{Deserialize, Serialize};

use sensorwatch_core::constants::TIER_MARGIN;

use crate::sensors::NormalRange;

/// Severity of a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Inside the normal range
    Normal,
    /// Outside the normal range, within the margin
    Warning,
    /// Beyond the margin
    Critical,
}

impl Tier {
    /// Lower-case name, as serialised
    pub const fn as_str(&self) -> &'static str {
        match self {
            Tier::Normal => "normal",
            Tier::Warning => "warning",
            Tier::Critical => "critical",
        }
    }

    /// Anything but normal
    pub const fn is_alert(&self) -> bool {
        !matches!(self, Tier::Normal)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a value against a normal range
pub fn classify(value: f64, range: &NormalRange) -> Tier {
    let critical_low = range.low - range.low.abs() * TIER_MARGIN;
    let critical_high = range.high + range.high.abs() * TIER_MARGIN;

    if value < critical_low || value > critical_high {
        Tier::Critical
    } else if !range.contains(value) {
        Tier::Warning
    } else {
        Tier::Normal
    }
}

/// Readings seen per tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    /// Normal readings
    pub normal: u64,
    /// Warning readings
    pub warning: u64,
    /// Critical readings
    pub critical: u64,
}

impl TierCounts {
    /// Count one reading
    pub fn record(&mut self, tier: Tier) {
        match tier {
            Tier::Normal => self.normal += 1,
            Tier::Warning => self.warning += 1,
            Tier::Critical => self.critical += 1,
        }
    }

    /// Count for a single tier
    pub fn get(&self, tier: Tier) -> u64 {
        match tier {
            Tier::Normal => self.normal,
            Tier::Warning => self.warning,
            Tier::Critical => self.critical,
        }
    }

    /// Warning plus critical
    pub fn non_normal(&self) -> u64 {
        self.warning + self.critical
    }

    /// All tiers
    pub fn total(&self) -> u64 {
        self.normal + self.warning + self.critical
    }
}
