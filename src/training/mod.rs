//! Model training module
//!
//! - [`linear_models`] - OLS linear regression
//! - [`split`] - Seeded train/test split
//! - [`TrainingPipeline`] - CSV to persisted artifacts

mod config;
mod pipeline;
pub mod linear_models;
pub mod split;

pub use config::{InvalidRowPolicy, TrainingConfig};
pub use linear_models::LinearRegression;
pub use pipeline::{FittedArtifacts, TrainingPipeline, TrainingReport};
pub use split::{train_test_split, TrainTestSplit};
