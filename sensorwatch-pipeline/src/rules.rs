//! Processing rules of the batch processor

use serde::{Deserialize, Serialize};

use crate::errors::{ProcessingError, ProcessingResult};

/// Largest number of decimal places a rule may round to
pub const MAX_ROUND_DIGITS: u32 = 15;

/// Scale, threshold and rounding applied to every record
///
/// Defaults: multiply by 1.5, threshold 50, round to 2 places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingRules {
    /// Factor applied to every value
    #[serde(alias = "multiply")]
    pub multiplier: f64,
    /// Scaled values strictly above this are flagged
    pub threshold: f64,
    /// Decimal places kept on the scaled value
    pub round_digits: u32,
}

impl Default for ProcessingRules {
    fn default() -> Self {
        Self {
            multiplier: 1.5,
            threshold: 50.0,
            round_digits: 2,
        }
    }
}

impl ProcessingRules {
    /// Set the scale factor
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set the alert threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the rounding precision
    pub fn with_round_digits(mut self, digits: u32) -> Self {
        self.round_digits = digits;
        self
    }

    /// Parse from a JSON object, then validate
    ///
    /// Accepts `multiply` as an alias of `multiplier`. Anything other than an
    /// object (arrays included) is rejected.
    pub fn from_json_str(json: &str) -> ProcessingResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| ProcessingError::rules(format!("malformed rules: {}", e)))?;
        if !value.is_object() {
            return Err(ProcessingError::rules("rules must be a JSON object"));
        }
        let rules: Self = serde_json::from_value(value)
            .map_err(|e| ProcessingError::rules(format!("malformed rules: {}", e)))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Check the rules can be applied
    pub fn validate(&self) -> ProcessingResult<()> {
        if !self.multiplier.is_finite() {
            return Err(ProcessingError::rules("multiplier must be finite"));
        }
        if !self.threshold.is_finite() {
            return Err(ProcessingError::rules("threshold must be finite"));
        }
        if self.round_digits > MAX_ROUND_DIGITS {
            return Err(ProcessingError::rules(format!(
                "round_digits must be at most {}",
                MAX_ROUND_DIGITS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let rules = ProcessingRules::default();
        assert_eq!(rules.multiplier, 1.5);
        assert_eq!(rules.threshold, 50.0);
        assert_eq!(rules.round_digits, 2);
        rules.validate().unwrap();
    }

    #[test]
    fn loads_partial_json() {
        let rules = ProcessingRules::from_json_str(r#"{ "multiply": 2.0 }"#).unwrap();
        assert_eq!(rules.multiplier, 2.0);
        assert_eq!(rules.threshold, 50.0);
    }

    #[test]
    fn rejects_unusable_rules() {
        assert!(ProcessingRules::default()
            .with_multiplier(f64::NAN)
            .validate()
            .is_err());
        assert!(ProcessingRules::default()
            .with_threshold(f64::INFINITY)
            .validate()
            .is_err());
        assert!(ProcessingRules::default()
            .with_round_digits(16)
            .validate()
            .is_err());
        assert!(matches!(
            ProcessingRules::from_json_str("[]"),
            Err(ProcessingError::InvalidRules { .. })
        ));
    }

    #[test]
    fn positional_json_is_rejected() {
        for json in ["[]", "[3.0]", "[3.0, 10.0, 1]", "2.5", "null"] {
            assert!(
                matches!(
                    ProcessingRules::from_json_str(json),
                    Err(ProcessingError::InvalidRules { .. })
                ),
                "{} should be rejected",
                json
            );
        }
    }
}
