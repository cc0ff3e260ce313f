//! Export thresholds.
//!
//! Thresholds are collected once before anything is written. They come either
//! from the built-in defaults, a JSON file, or the command line.

use std::path::Path;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Acceptance thresholds of one export run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ExportThresholds {
    /// Events with a lower semblance are dropped
    pub min_pick_semblance: f64,
    /// Events with fewer observed P arrivals are dropped
    #[serde(deserialize_with = "deserialize_count")]
    pub min_receivers_number: usize,
    /// P picks at or below this confidence are dropped
    pub min_p_phase_confidence: f64,
    /// S picks at or below this confidence are dropped
    pub min_s_phase_confidence: f64,
    /// Picks with a larger absolute traveltime delay are dropped, seconds
    pub max_traveltime_delay: f64,
}

/// Receiver counts may be written as floats (`10.0`) but must be whole.
fn deserialize_count<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > usize::MAX as f64 {
        return Err(de::Error::custom(format!(
            "expected a non-negative whole number, got {value}"
        )));
    }
    Ok(value as usize)
}

impl Default for ExportThresholds {
    fn default() -> Self {
        Self {
            min_pick_semblance: 0.2,
            min_receivers_number: 10,
            min_p_phase_confidence: 0.3,
            min_s_phase_confidence: 0.3,
            max_traveltime_delay: 2.5,
        }
    }
}

impl ExportThresholds {
    pub fn from_json(json: &str) -> Result<Self> {
        let thresholds: Self = serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("malformed thresholds: {e}")))?;
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values no export could be run with.
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("min_pick_semblance", self.min_pick_semblance),
            ("min_p_phase_confidence", self.min_p_phase_confidence),
            ("min_s_phase_confidence", self.min_s_phase_confidence),
            ("max_traveltime_delay", self.max_traveltime_delay),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                return Err(Error::Configuration(format!("{name} must be a number, got {value}")));
            }
            if value < 0.0 {
                return Err(Error::Configuration(format!("{name} must not be negative, got {value}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let thresholds = ExportThresholds::default();
        assert_eq!(thresholds.min_pick_semblance, 0.2);
        assert_eq!(thresholds.min_receivers_number, 10);
        assert_eq!(thresholds.max_traveltime_delay, 2.5);
        assert!(thresholds.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let thresholds = ExportThresholds::from_json(r#"{"min_receivers_number": 4}"#).unwrap();
        assert_eq!(thresholds.min_receivers_number, 4);
        assert_eq!(thresholds.min_p_phase_confidence, 0.3);
    }

    #[test]
    fn receiver_count_accepts_whole_floats() {
        let thresholds = ExportThresholds::from_json(r#"{"min_receivers_number": 10.0}"#).unwrap();
        assert_eq!(thresholds.min_receivers_number, 10);
    }

    #[test]
    fn receiver_count_rejects_fractions_and_negatives() {
        for json in [
            r#"{"min_receivers_number": 2.5}"#,
            r#"{"min_receivers_number": -3}"#,
            r#"{"min_receivers_number": -3.0}"#,
        ] {
            let err = ExportThresholds::from_json(json).unwrap_err();
            assert!(matches!(err, Error::Configuration(_)), "{json}");
        }
    }

    #[test]
    fn non_numeric_is_configuration_error() {
        let err = ExportThresholds::from_json(r#"{"min_pick_semblance": "high"}"#).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn unknown_field_is_configuration_error() {
        let err = ExportThresholds::from_json(r#"{"min_semblance": 0.1}"#).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn negative_and_nan_rejected() {
        let mut thresholds = ExportThresholds::default();
        thresholds.max_traveltime_delay = -1.0;
        assert!(matches!(thresholds.validate(), Err(Error::Configuration(_))));
        thresholds.max_traveltime_delay = f64::NAN;
        assert!(matches!(thresholds.validate(), Err(Error::Configuration(_))));
    }
}
