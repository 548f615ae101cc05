//! Simulation configuration.

use super::table::{ControlPoint, Extrapolation, ProbabilityTable};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a simulation run, as read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Control points of the success curve, `[[draw_count, probability], ...]`
    pub probability_table: Vec<ControlPoint>,

    /// Number of independent trials
    pub num_trials: u64,

    /// Random seed for reproducibility (None = random)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Behavior below the first control point
    #[serde(default)]
    pub extrapolation: Extrapolation,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            probability_table: Vec::new(),
            num_trials: 10_000,
            seed: None,
            extrapolation: Extrapolation::Linear,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a config file. Validation is separate, see [`Self::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    pub fn build_table(&self) -> Result<ProbabilityTable> {
        Ok(ProbabilityTable::new(self.probability_table.clone())?
            .with_extrapolation(self.extrapolation))
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_trials == 0 {
            return Err(Error::InvalidConfig(
                "num_trials must be at least 1".to_string(),
            ));
        }
        self.build_table().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config = SimConfig::from_json_str(
            r#"{"probability_table": [[1, 0.006], [73, 0.006], [90, 1.0]], "num_trials": 100000}"#,
        )
        .unwrap();

        assert_eq!(config.num_trials, 100_000);
        assert_eq!(config.probability_table.len(), 3);
        assert_eq!(config.probability_table[1], ControlPoint::new(73, 0.006));
        assert_eq!(config.seed, None);
        assert_eq!(config.extrapolation, Extrapolation::Linear);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_optional_fields() {
        let config = SimConfig::from_json_str(
            r#"{"probability_table": [[1, 1.0]], "num_trials": 5, "seed": 7, "extrapolation": "clamp"}"#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.extrapolation, Extrapolation::Clamp);
        assert_eq!(
            config.build_table().unwrap().extrapolation(),
            Extrapolation::Clamp
        );
    }

    #[test]
    fn test_missing_field_is_json_error() {
        let err = SimConfig::from_json_str(r#"{"probability_table": [[1, 1.0]]}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_validate_rejects_zero_trials() {
        let config = SimConfig {
            probability_table: vec![ControlPoint::new(1, 1.0)],
            num_trials: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_bad_table() {
        let config = SimConfig::default();
        assert!(matches!(config.validate(), Err(Error::InvalidTable(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = SimConfig::load("/nonexistent/gacha_sim_config_12345.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
