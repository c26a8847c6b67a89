//! Training pipeline: CSV to persisted preprocessor and model

use super::linear_models::LinearRegression;
use super::split::train_test_split;
use super::{InvalidRowPolicy, TrainingConfig};
use crate::artifacts::ArtifactPaths;
use crate::error::{FlightPriceError, Result};
use crate::features::{FeatureExtractor, FeatureVector, TripRecord};
use crate::preprocessing::Preprocessor;
use crate::utils::DataLoader;
use chrono::NaiveDateTime;
use ndarray::Array1;
use polars::prelude::DataFrame;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};

/// Summary of one training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub feature_names: Vec<String>,
    /// In-sample R², diagnostic only
    pub train_r2: f64,
    /// Held-out R², `None` when nothing was held out
    pub test_r2: Option<f64>,
    pub training_time_secs: f64,
    /// Where the artifacts were written, set by [`TrainingPipeline::run`]
    pub artifacts: Option<ArtifactPaths>,
}

/// Fitted preprocessor and model, not yet persisted
#[derive(Debug, Clone)]
pub struct FittedArtifacts {
    pub preprocessor: Preprocessor,
    pub model: LinearRegression,
    pub report: TrainingReport,
}

impl FittedArtifacts {
    /// Write both artifacts under their well-known names, creating the directory
    pub fn persist(&self, models_dir: impl AsRef<Path>) -> Result<ArtifactPaths> {
        let models_dir = models_dir.as_ref();
        std::fs::create_dir_all(models_dir)?;

        let paths = ArtifactPaths::in_dir(models_dir);
        self.preprocessor.save(&paths.preprocessor)?;
        self.model.save(&paths.model)?;
        Ok(paths)
    }
}

/// Single-shot batch training job
#[derive(Debug, Clone)]
pub struct TrainingPipeline {
    config: TrainingConfig,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Load the configured CSV, fit, and persist both artifacts.
    ///
    /// `now` is the reference instant for `days_until_departure`.
    pub fn run(&self, now: NaiveDateTime) -> Result<TrainingReport> {
        info!(data = %self.config.data_path.display(), "Loading training data");
        let df = DataLoader::new().load_csv(&self.config.data_path)?;

        let fitted = self.fit(&df, now)?;
        let paths = fitted.persist(&self.config.models_dir)?;
        info!(
            preprocessor = %paths.preprocessor.display(),
            model = %paths.model.display(),
            "Artifacts saved"
        );

        let mut report = fitted.report;
        report.artifacts = Some(paths);
        Ok(report)
    }

    /// Fit preprocessor and model on an in-memory training frame
    pub fn fit(&self, df: &DataFrame, now: NaiveDateTime) -> Result<FittedArtifacts> {
        let start = Instant::now();
        self.config.validate()?;

        let extractor = FeatureExtractor::new(now);
        let records = TripRecord::from_frame(df)?;
        let rows_read = records.len();

        let mut features: Vec<FeatureVector> = Vec::with_capacity(rows_read);
        let mut prices: Vec<f64> = Vec::with_capacity(rows_read);
        let mut rows_skipped = 0;

        for (row, record) in records.into_iter().enumerate() {
            let extracted = record.and_then(|r| extractor.from_trip(&r).map(|f| (f, r.price)));
            match extracted {
                Ok((f, price)) => {
                    features.push(f);
                    prices.push(price);
                }
                Err(e) => match self.config.invalid_rows {
                    InvalidRowPolicy::Abort => {
                        error!(row, error = %e, "Invalid training row, aborting run");
                        return Err(e);
                    }
                    InvalidRowPolicy::Skip => {
                        warn!(row, error = %e, "Skipping invalid training row");
                        rows_skipped += 1;
                    }
                },
            }
        }

        if features.is_empty() {
            return Err(FlightPriceError::Training(
                "No valid training rows".to_string(),
            ));
        }

        let split = train_test_split(features.len(), self.config.test_size, self.config.random_seed)?;
        if split.train_indices.is_empty() {
            return Err(FlightPriceError::Training(format!(
                "Train partition is empty ({} usable rows, test_size {})",
                features.len(),
                self.config.test_size
            )));
        }

        let select = |indices: &[usize]| -> Result<(DataFrame, Array1<f64>)> {
            let rows: Vec<FeatureVector> = indices.iter().map(|&i| features[i].clone()).collect();
            let y: Array1<f64> = indices.iter().map(|&i| prices[i]).collect();
            Ok((FeatureVector::to_frame(&rows)?, y))
        };

        let (train_frame, y_train) = select(&split.train_indices)?;
        let mut preprocessor = Preprocessor::for_flight_features();
        let x_train = preprocessor.fit_transform(&train_frame)?;

        let mut model = LinearRegression::new();
        model.fit(&x_train, &y_train)?;
        let train_r2 = model.score(&x_train, &y_train)?;

        let test_r2 = if split.test_indices.is_empty() {
            None
        } else {
            let (test_frame, y_test) = select(&split.test_indices)?;
            let x_test = preprocessor.transform(&test_frame)?;
            Some(model.score(&x_test, &y_test)?)
        };

        let report = TrainingReport {
            rows_read,
            rows_skipped,
            train_rows: split.train_indices.len(),
            test_rows: split.test_indices.len(),
            feature_names: preprocessor.feature_names(),
            train_r2,
            test_r2,
            training_time_secs: start.elapsed().as_secs_f64(),
            artifacts: None,
        };

        info!(
            rows_read,
            rows_skipped,
            train_rows = report.train_rows,
            test_rows = report.test_rows,
            features = report.feature_names.len(),
            train_r2,
            "Model training complete"
        );

        Ok(FittedArtifacts {
            preprocessor,
            model,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use polars::prelude::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn small_frame() -> DataFrame {
        df!(
            "departure" => &[
                "2024-05-02 06:00:00", "2024-05-03 09:00:00", "2024-05-04 12:00:00",
                "2024-05-05 15:00:00", "2024-05-06 18:00:00", "2024-05-07 07:00:00",
                "2024-05-08 10:00:00", "2024-05-09 13:00:00", "2024-05-10 16:00:00",
                "2024-05-11 19:00:00",
            ],
            "arrival" => &[
                "2024-05-02 08:00:00", "2024-05-03 10:30:00", "2024-05-04 14:00:00",
                "2024-05-05 16:00:00", "2024-05-06 21:00:00", "2024-05-07 09:30:00",
                "2024-05-08 11:00:00", "2024-05-09 15:00:00", "2024-05-10 18:30:00",
                "2024-05-11 20:00:00",
            ],
            "airline" => &["SA", "FA", "MN", "SA", "FA", "MN", "SA", "FA", "MN", "SA"],
            "to" => &["CPT", "JNB", "DUR", "JNB", "DUR", "CPT", "DUR", "CPT", "JNB", "CPT"],
            "price" => &[1200.0, 980.0, 1100.0, 1250.0, 1400.0, 1050.0, 990.0, 1010.0, 1300.0, 1180.0],
        )
        .unwrap()
    }

    #[test]
    fn test_fit_reports_sizes() {
        let pipeline = TrainingPipeline::new(TrainingConfig::new("unused.csv", "unused"));
        let fitted = pipeline.fit(&small_frame(), now()).unwrap();

        assert_eq!(fitted.report.rows_read, 10);
        assert_eq!(fitted.report.rows_skipped, 0);
        assert_eq!(fitted.report.train_rows, 8);
        assert_eq!(fitted.report.test_rows, 2);
        assert!(fitted.report.test_r2.is_some());
        assert!(fitted.preprocessor.is_fitted());
        assert!(fitted.model.is_fitted);
        assert_eq!(fitted.model.n_features, fitted.preprocessor.n_features_out());
    }

    #[test]
    fn test_invalid_row_aborts_by_default() {
        let mut df = small_frame();
        let departure = Series::new(
            "departure".into(),
            &[
                "2024-05-02 06:00:00", "garbage", "2024-05-04 12:00:00",
                "2024-05-05 15:00:00", "2024-05-06 18:00:00", "2024-05-07 07:00:00",
                "2024-05-08 10:00:00", "2024-05-09 13:00:00", "2024-05-10 16:00:00",
                "2024-05-11 19:00:00",
            ],
        );
        df.with_column(departure).unwrap();

        let pipeline = TrainingPipeline::new(TrainingConfig::new("unused.csv", "unused"));
        assert!(matches!(
            pipeline.fit(&df, now()),
            Err(FlightPriceError::Validation(_))
        ));

        let pipeline = TrainingPipeline::new(
            TrainingConfig::new("unused.csv", "unused")
                .with_invalid_row_policy(InvalidRowPolicy::Skip),
        );
        let fitted = pipeline.fit(&df, now()).unwrap();
        assert_eq!(fitted.report.rows_skipped, 1);
        assert_eq!(fitted.report.train_rows + fitted.report.test_rows, 9);
    }

    #[test]
    fn test_persist_writes_both_artifacts() {
        let pipeline = TrainingPipeline::new(TrainingConfig::new("unused.csv", "unused"));
        let fitted = pipeline.fit(&small_frame(), now()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let models_dir = dir.path().join("nested").join("models");
        let paths = fitted.persist(&models_dir).unwrap();

        assert!(paths.preprocessor.exists());
        assert!(paths.model.exists());
    }
}
