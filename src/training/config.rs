//! Training configuration

use crate::error::{FlightPriceError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to do with a training row whose features cannot be extracted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidRowPolicy {
    /// Abort the whole run on the first invalid row
    #[default]
    Abort,
    /// Log the row and leave it out of training
    Skip,
}

/// Configuration for one training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Historical flights CSV
    pub data_path: PathBuf,
    /// Directory the artifacts are written to
    pub models_dir: PathBuf,
    /// Fraction of rows held out for testing
    pub test_size: f64,
    /// Seed of the train/test shuffle
    pub random_seed: u64,
    pub invalid_rows: InvalidRowPolicy,
}

impl TrainingConfig {
    pub fn new(data_path: impl Into<PathBuf>, models_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            models_dir: models_dir.into(),
            test_size: 0.2,
            random_seed: 42,
            invalid_rows: InvalidRowPolicy::Abort,
        }
    }

    /// Builder method to set the held-out fraction
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Builder method to set the shuffle seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Builder method to set the invalid-row policy
    pub fn with_invalid_row_policy(mut self, policy: InvalidRowPolicy) -> Self {
        self.invalid_rows = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.test_size) {
            return Err(FlightPriceError::Config(format!(
                "test_size must be in [0, 1), got {}",
                self.test_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainingConfig::new("flights.csv", "models");
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.random_seed, 42);
        assert_eq!(config.invalid_rows, InvalidRowPolicy::Abort);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_and_validation() {
        let config = TrainingConfig::new("flights.csv", "models")
            .with_test_size(0.25)
            .with_seed(7)
            .with_invalid_row_policy(InvalidRowPolicy::Skip);
        assert_eq!(config.random_seed, 7);
        assert_eq!(config.invalid_rows, InvalidRowPolicy::Skip);
        assert!(config.validate().is_ok());

        assert!(config.clone().with_test_size(1.5).validate().is_err());
    }
}
