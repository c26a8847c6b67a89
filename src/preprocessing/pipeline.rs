//! Column preprocessor: one-hot categoricals followed by numeric pass-through

use super::{encoder::OneHotEncoder, ColumnSpec, ColumnType};
use crate::error::{FlightPriceError, Result};
use crate::features::{CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};
use crate::utils::f64_values;
use ndarray::{s, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Fitted feature transform.
///
/// Output layout is every categorical indicator block (in declared column
/// order) followed by the numeric columns (in declared order). The layout
/// is fixed at fit time and serialized with the vocabulary, so a reloaded
/// instance produces identical matrices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    columns: Vec<ColumnSpec>,
    encoder: Option<OneHotEncoder>,
    is_fitted: bool,
    /// Rows seen by the last fit
    n_samples_fit: usize,
}

impl Preprocessor {
    /// Create an unfitted preprocessor over the given input columns
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self {
            columns,
            encoder: None,
            is_fitted: false,
            n_samples_fit: 0,
        }
    }

    /// Preprocessor over the shared flight feature schema
    pub fn for_flight_features() -> Self {
        let columns = CATEGORICAL_COLUMNS
            .iter()
            .map(|c| ColumnSpec::categorical(*c))
            .chain(NUMERIC_COLUMNS.iter().map(|c| ColumnSpec::numeric(*c)))
            .collect();
        Self::new(columns)
    }

    fn names_of(&self, dtype: ColumnType) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.dtype == dtype)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Learn the categorical vocabulary from a training frame
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        let start = Instant::now();

        if df.height() == 0 {
            return Err(FlightPriceError::Training(
                "Cannot fit preprocessor on an empty frame".to_string(),
            ));
        }
        for spec in &self.columns {
            if df.column(&spec.name).is_err() {
                return Err(FlightPriceError::FeatureNotFound(spec.name.clone()));
            }
        }

        let categorical = self.names_of(ColumnType::Categorical);
        let encoder = if categorical.is_empty() {
            None
        } else {
            let mut encoder = OneHotEncoder::new();
            encoder.fit(df, &categorical)?;
            Some(encoder)
        };

        self.encoder = encoder;
        self.is_fitted = true;
        self.n_samples_fit = df.height();

        debug!(
            rows = df.height(),
            features_out = self.n_features_out(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Preprocessor fitted"
        );
        Ok(self)
    }

    /// Map a frame with the declared columns to a numeric matrix
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(FlightPriceError::NotFitted);
        }

        let n_rows = df.height();
        let n_encoded = self.encoder.as_ref().map_or(0, OneHotEncoder::n_output_columns);
        let numeric = self.names_of(ColumnType::Numeric);
        let mut out = Array2::zeros((n_rows, n_encoded + numeric.len()));

        if let Some(ref encoder) = self.encoder {
            encoder.transform_into(df, out.slice_mut(s![.., ..n_encoded]))?;
        }

        for (j, name) in numeric.iter().enumerate() {
            let values = f64_values(df, name)?;
            for (row, value) in values.into_iter().enumerate() {
                out[[row, n_encoded + j]] = value.ok_or_else(|| {
                    FlightPriceError::Transform(format!(
                        "Missing numeric value in column `{}` at row {}",
                        name, row
                    ))
                })?;
            }
        }

        Ok(out)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        self.fit(df)?;
        self.transform(df)
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Input columns this preprocessor expects
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn encoder(&self) -> Option<&OneHotEncoder> {
        self.encoder.as_ref()
    }

    /// Width of the transformed matrix
    pub fn n_features_out(&self) -> usize {
        self.encoder.as_ref().map_or(0, OneHotEncoder::n_output_columns)
            + self.names_of(ColumnType::Numeric).len()
    }

    /// Names of the transformed columns, in output order
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self
            .encoder
            .as_ref()
            .map(OneHotEncoder::feature_names)
            .unwrap_or_default();
        names.extend(self.names_of(ColumnType::Numeric).into_iter().map(str::to_string));
        names
    }

    /// Check that a fitted preprocessor is internally consistent: its encoder
    /// is present exactly when categorical columns are declared, is itself
    /// fitted, and covers those columns with sorted vocabularies.
    pub fn validate(&self) -> Result<()> {
        if !self.is_fitted {
            return Err(FlightPriceError::NotFitted);
        }
        let categorical = self.names_of(ColumnType::Categorical);
        match (&self.encoder, categorical.is_empty()) {
            (None, true) => Ok(()),
            (Some(encoder), false) => encoder.validate(&categorical).map_err(|e| match e {
                FlightPriceError::NotFitted => FlightPriceError::InvalidArtifact(
                    "preprocessor is fitted but its encoder is not".to_string(),
                ),
                other => other,
            }),
            (None, false) => Err(FlightPriceError::InvalidArtifact(
                "categorical columns declared without an encoder".to_string(),
            )),
            (Some(_), true) => Err(FlightPriceError::InvalidArtifact(
                "encoder present without categorical columns".to_string(),
            )),
        }
    }

    /// Save the preprocessor to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a preprocessor from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let preprocessor: Self = serde_json::from_str(&json)?;
        Ok(preprocessor)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::for_flight_features()
    }
}
