//! Prediction service
//!
//! Holds the fitted preprocessor and model, loaded once, and answers single
//! price queries. The service is immutable after construction and is shared
//! by reference between concurrent requests.

use crate::artifacts::ArtifactPaths;
use crate::error::{FlightPriceError, Result};
use crate::features::{FeatureExtractor, FeatureVector, PriceQuery};
use crate::preprocessing::Preprocessor;
use crate::training::LinearRegression;
use crate::utils::round_to_cents;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Currency label attached to every prediction
pub const CURRENCY: &str = "ZAR";

/// Raw prediction request as received over the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default)]
    pub airline: Option<String>,
    #[serde(default)]
    pub arrival_airport: Option<String>,
    #[serde(default)]
    pub stops: Option<i64>,
    #[serde(default)]
    pub flight_duration: Option<f64>,
}

impl PredictionRequest {
    /// Parse a JSON body. Wrongly typed fields are validation errors.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(FlightPriceError::Validation(
                "Request body must be a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| FlightPriceError::Validation(format!("Malformed request: {}", e)))
    }

    /// Check required fields and produce a query for the feature extractor
    pub fn validate(&self) -> Result<PriceQuery> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.trim().is_empty())
        }

        let departure_time = present(&self.departure_time);
        let airline = present(&self.airline);
        let arrival_airport = present(&self.arrival_airport);

        match (departure_time, airline, arrival_airport) {
            (Some(departure_time), Some(airline), Some(arrival_airport)) => Ok(PriceQuery {
                departure_time: departure_time.to_string(),
                airline: airline.to_string(),
                arrival_airport: arrival_airport.to_string(),
                stops: self.stops,
                flight_duration: self.flight_duration,
            }),
            _ => {
                let missing: Vec<&str> = [
                    ("departure_time", departure_time),
                    ("airline", airline),
                    ("arrival_airport", arrival_airport),
                ]
                .iter()
                .filter(|(_, v)| v.is_none())
                .map(|(name, _)| *name)
                .collect();
                Err(FlightPriceError::Validation(format!(
                    "Missing required fields: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

/// Successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_price: f64,
    pub currency: String,
    pub status: String,
}

impl PredictionResult {
    fn success(price: f64) -> Self {
        Self {
            predicted_price: round_to_cents(price),
            currency: CURRENCY.to_string(),
            status: "success".to_string(),
        }
    }
}

/// Loaded preprocessor and model
#[derive(Debug, Clone)]
pub struct PredictionService {
    preprocessor: Preprocessor,
    model: LinearRegression,
}

impl PredictionService {
    /// Pair a fitted preprocessor with a fitted model.
    ///
    /// Fails if either is unfitted or internally inconsistent, or if the
    /// preprocessor's output width does not match the model's input width.
    pub fn from_parts(preprocessor: Preprocessor, model: LinearRegression) -> Result<Self> {
        preprocessor.validate()?;
        model.validate()?;
        if preprocessor.n_features_out() != model.n_features {
            return Err(FlightPriceError::DimensionMismatch {
                expected: model.n_features,
                actual: preprocessor.n_features_out(),
            });
        }
        Ok(Self { preprocessor, model })
    }

    /// Load both artifacts from a models directory.
    ///
    /// Any missing, unreadable, unfitted or mismatched artifact is an
    /// [`FlightPriceError::ArtifactLoad`].
    pub fn load(models_dir: impl AsRef<Path>) -> Result<Self> {
        let paths = ArtifactPaths::in_dir(models_dir);

        let preprocessor = Preprocessor::load(&paths.preprocessor)
            .map_err(|e| FlightPriceError::artifact(&paths.preprocessor, e))?;
        let model = LinearRegression::load(&paths.model)
            .map_err(|e| FlightPriceError::artifact(&paths.model, e))?;

        let service = Self::from_parts(preprocessor, model)
            .map_err(|e| FlightPriceError::artifact(&paths.model, e))?;

        info!(
            preprocessor = %paths.preprocessor.display(),
            model = %paths.model.display(),
            features = service.preprocessor.n_features_out(),
            "Loaded prediction artifacts"
        );
        Ok(service)
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn model(&self) -> &LinearRegression {
        &self.model
    }

    /// Predict the price of one trip, with `now` as the reference instant
    pub fn predict(&self, request: &PredictionRequest, now: NaiveDateTime) -> Result<PredictionResult> {
        let query = request.validate()?;
        let features = FeatureExtractor::new(now).from_query(&query)?;
        let price = self.predict_features(&features)?;
        Ok(PredictionResult::success(price))
    }

    /// Raw model output for already extracted features
    pub fn predict_features(&self, features: &FeatureVector) -> Result<f64> {
        let frame = FeatureVector::to_frame(std::slice::from_ref(features))?;
        let x = self.preprocessor.transform(&frame)?;
        let prediction = self
            .model
            .predict(&x)?
            .first()
            .copied()
            .ok_or_else(|| FlightPriceError::Transform("Model returned no prediction".to_string()))?;

        if !prediction.is_finite() {
            return Err(FlightPriceError::Transform(format!(
                "Model produced a non-finite price: {}",
                prediction
            )));
        }

        debug!(
            airline = %features.airline,
            arrival_airport = %features.arrival_airport,
            prediction,
            "Predicted price"
        );
        Ok(prediction)
    }
}
