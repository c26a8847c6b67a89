//! Flight Price - ticket price prediction from basic trip attributes
//!
//! This crate contains both halves of the system:
//! - an offline training job that fits a one-hot preprocessor and an OLS
//!   linear regression on historical flights and persists them as artifacts
//! - an online prediction service that loads those artifacts once and
//!   answers single price queries over HTTP
//!
//! # Modules
//!
//! - [`features`] - Shared feature schema and the feature extractor
//! - [`preprocessing`] - One-hot encoding and numeric pass-through
//! - [`training`] - Linear regression, train/test split, training pipeline
//! - [`inference`] - Prediction service over loaded artifacts
//! - [`server`] - HTTP server exposing the prediction service
//! - [`cli`] - Command-line interface

pub mod error;

pub mod artifacts;
pub mod features;
pub mod preprocessing;
pub mod training;
pub mod inference;
pub mod utils;

pub mod server;
pub mod cli;

pub use error::{ErrorKind, FlightPriceError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{ErrorKind, FlightPriceError, Result};
    pub use crate::features::{FeatureExtractor, FeatureVector, PriceQuery, TripRecord};
    pub use crate::preprocessing::Preprocessor;
    pub use crate::training::{
        InvalidRowPolicy, LinearRegression, TrainingConfig, TrainingPipeline, TrainingReport,
    };
    pub use crate::inference::{PredictionRequest, PredictionResult, PredictionService};
}
