//! Feature extraction
//!
//! One feature schema shared by the training pipeline and the prediction
//! service. Both go through [`FeatureExtractor`], so the columns the
//! preprocessor is fit on are exactly the columns it sees at serving time.

mod extractor;
mod records;
pub mod timestamp;

pub use extractor::{FeatureExtractor, PriceQuery, DEFAULT_FLIGHT_DURATION_HOURS};
pub use records::{TripRecord, REQUIRED_TRIP_COLUMNS};
pub use timestamp::parse_timestamp;

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Ordered feature columns produced by the extractor
pub const FEATURE_COLUMNS: [&str; 6] = [
    "departure_hour",
    "days_until_departure",
    "airline",
    "arrival_airport",
    "stops",
    "flight_duration",
];

/// Feature columns that are one-hot encoded
pub const CATEGORICAL_COLUMNS: [&str; 2] = ["airline", "arrival_airport"];

/// Feature columns passed through as numbers, in output order
pub const NUMERIC_COLUMNS: [&str; 4] = [
    "departure_hour",
    "days_until_departure",
    "stops",
    "flight_duration",
];

/// Features derived from one trip, before encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub departure_hour: u32,
    pub days_until_departure: i64,
    pub airline: String,
    pub arrival_airport: String,
    pub stops: i64,
    pub flight_duration: f64,
}

impl FeatureVector {
    /// Build a frame with one row per feature vector, columns in [`FEATURE_COLUMNS`] order
    pub fn to_frame(rows: &[FeatureVector]) -> Result<DataFrame> {
        let departure_hour: Vec<i64> = rows.iter().map(|r| r.departure_hour as i64).collect();
        let days_until_departure: Vec<i64> = rows.iter().map(|r| r.days_until_departure).collect();
        let airline: Vec<&str> = rows.iter().map(|r| r.airline.as_str()).collect();
        let arrival_airport: Vec<&str> = rows.iter().map(|r| r.arrival_airport.as_str()).collect();
        let stops: Vec<i64> = rows.iter().map(|r| r.stops).collect();
        let flight_duration: Vec<f64> = rows.iter().map(|r| r.flight_duration).collect();

        let df = df!(
            FEATURE_COLUMNS[0] => &departure_hour,
            FEATURE_COLUMNS[1] => &days_until_departure,
            FEATURE_COLUMNS[2] => &airline,
            FEATURE_COLUMNS[3] => &arrival_airport,
            FEATURE_COLUMNS[4] => &stops,
            FEATURE_COLUMNS[5] => &flight_duration,
        )?;
        Ok(df)
    }
}
