//! Seeded train/test split

use crate::error::{FlightPriceError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Row indices of one train/test partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainTestSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Shuffle `0..n_samples` with a seeded generator and hold out
/// `ceil(test_size * n_samples)` rows for testing.
pub fn train_test_split(n_samples: usize, test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(0.0..1.0).contains(&test_size) {
        return Err(FlightPriceError::Config(format!(
            "test_size must be in [0, 1), got {}",
            test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = (test_size * n_samples as f64).ceil() as usize;
    let n_test = n_test.min(n_samples);
    let train_indices = indices.split_off(n_test);

    Ok(TrainTestSplit {
        train_indices,
        test_indices: indices,
    })
}
