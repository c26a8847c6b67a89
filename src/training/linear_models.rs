//! Ordinary least squares linear regression

use crate::error::{FlightPriceError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pivots below this fraction of the largest diagonal entry are treated as zero
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Solve the symmetric positive-semidefinite system A x = b by Cholesky.
///
/// A pivot that vanishes marks its column as linearly dependent on earlier
/// columns; that column is left out of the factorization and its solution
/// component is zero. The result is a basic least-squares solution, which
/// is what one-hot blocks plus an intercept need.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    let scale = a.diag().iter().fold(1.0_f64, |m, v| m.max(v.abs()));
    let tol = scale * PIVOT_TOLERANCE;

    // Column-wise factorization: A = L * L^T over independent columns
    let mut l = Array2::<f64>::zeros((n, n));
    let mut dependent = vec![false; n];

    for j in 0..n {
        let mut diag = a[[j, j]];
        for k in 0..j {
            diag -= l[[j, k]] * l[[j, k]];
        }
        if diag <= tol {
            dependent[j] = true;
            continue;
        }

        let pivot = diag.sqrt();
        l[[j, j]] = pivot;
        for i in (j + 1)..n {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = sum / pivot;
        }
    }

    // Forward substitution: L * y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        if dependent[i] {
            continue;
        }
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[[i, k]] * y[k];
        }
        y[i] = sum / l[[i, i]];
    }

    // Backward substitution: L^T * x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        if dependent[i] {
            continue;
        }
        let mut sum = y[i];
        for k in (i + 1)..n {
            sum -= l[[k, i]] * x[k];
        }
        x[i] = sum / l[[i, i]];
    }

    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}

/// Solve least squares via normal equations: (X^T X) w = X^T y
fn solve_least_squares(x: &Array2<f64>, y: &Array1<f64>) -> Option<Array1<f64>> {
    let xtx = x.t().dot(x);
    let xty = x.t().dot(y);
    cholesky_solve(&xtx, &xty)
}

/// Linear regression model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Fitted coefficients (weights)
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept (bias)
    pub intercept: Option<f64>,
    /// Whether to fit intercept
    pub fit_intercept: bool,
    /// Column count of the matrix the model was fit on
    pub n_features: usize,
    /// Whether model is fitted
    pub is_fitted: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Create a new linear regression model
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
            n_features: 0,
            is_fitted: false,
        }
    }

    /// Enable/disable fitting intercept
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Fit the model to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(FlightPriceError::Training(format!(
                "X has {} rows but y has {} values",
                n_samples,
                y.len()
            )));
        }
        if n_samples == 0 {
            return Err(FlightPriceError::Training(
                "Cannot fit on zero samples".to_string(),
            ));
        }

        // Center data if fitting intercept
        let (x_centered, y_centered, means) = if self.fit_intercept {
            let x_mean = x.mean_axis(Axis(0)).ok_or_else(|| {
                FlightPriceError::Training("Cannot compute column means".to_string())
            })?;
            let y_mean = y.mean().unwrap_or(0.0);

            let x_centered = x - &x_mean.clone().insert_axis(Axis(0));
            let y_centered = y - y_mean;
            (x_centered, y_centered, Some((x_mean, y_mean)))
        } else {
            (x.clone(), y.clone(), None)
        };

        let coefficients = solve_least_squares(&x_centered, &y_centered).ok_or_else(|| {
            FlightPriceError::Training("Normal equations could not be solved".to_string())
        })?;

        let intercept = match means {
            Some((x_mean, y_mean)) => y_mean - coefficients.dot(&x_mean),
            None => 0.0,
        };

        self.coefficients = Some(coefficients);
        self.intercept = Some(intercept);
        self.n_features = n_features;
        self.is_fitted = true;

        Ok(self)
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = match (&self.coefficients, self.is_fitted) {
            (Some(c), true) => c,
            _ => return Err(FlightPriceError::NotFitted),
        };
        if x.ncols() != coefficients.len() {
            return Err(FlightPriceError::DimensionMismatch {
                expected: coefficients.len(),
                actual: x.ncols(),
            });
        }

        let intercept = self.intercept.unwrap_or(0.0);
        Ok(x.dot(coefficients) + intercept)
    }

    /// Get R² score
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;

        let y_mean = y.mean().unwrap_or(0.0);
        let ss_res = (&y_pred - y).mapv(|v| v * v).sum();
        let ss_tot = y.mapv(|v| (v - y_mean) * (v - y_mean)).sum();

        if ss_tot == 0.0 {
            return Ok(1.0);
        }

        Ok(1.0 - ss_res / ss_tot)
    }

    /// Check that a fitted model is internally consistent.
    ///
    /// A deserialized model can claim to be fitted while missing its
    /// parameters, or carry a coefficient vector of the wrong length.
    pub fn validate(&self) -> Result<()> {
        if !self.is_fitted {
            return Err(FlightPriceError::NotFitted);
        }
        let coefficients = self.coefficients.as_ref().ok_or_else(|| {
            FlightPriceError::InvalidArtifact("fitted model has no coefficients".to_string())
        })?;
        if coefficients.len() != self.n_features {
            return Err(FlightPriceError::InvalidArtifact(format!(
                "model has {} coefficients for {} features",
                coefficients.len(),
                self.n_features
            )));
        }
        let intercept = self.intercept.ok_or_else(|| {
            FlightPriceError::InvalidArtifact("fitted model has no intercept".to_string())
        })?;
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(FlightPriceError::InvalidArtifact(
                "model parameters are not finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Save the model to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a model from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let model: Self = serde_json::from_str(&json)?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_linear_regression_simple() {
        let x = array![
            [1.0, 1.0],
            [2.0, 1.0],
            [1.0, 2.0],
            [2.0, 2.0],
            [3.0, 1.0],
        ];
        // y = 2*x1 + 3*x2 + 1
        let y = array![6.0, 8.0, 9.0, 11.0, 10.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        assert!(model.is_fitted);
        assert_eq!(model.n_features, 2);

        let coef = model.coefficients.as_ref().unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-9);
        assert!((coef[1] - 3.0).abs() < 1e-9);
        assert!((model.intercept.unwrap() - 1.0).abs() < 1e-9);

        let r2 = model.score(&x, &y).unwrap();
        assert!(r2 > 0.999999, "R² should be 1, got {}", r2);
    }

    #[test]
    fn test_collinear_one_hot_with_intercept() {
        // Two-category one-hot block plus a numeric column; the block is
        // collinear with the intercept.
        let x = array![
            [1.0, 0.0, 1.0],
            [0.0, 1.0, 2.0],
            [1.0, 0.0, 3.0],
            [0.0, 1.0, 4.0],
            [1.0, 0.0, 5.0],
            [0.0, 1.0, 6.0],
        ];
        // y = 100 (cat A) / 150 (cat B) + 10 * x
        let y = array![110.0, 170.0, 130.0, 190.0, 150.0, 210.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let pred = model.predict(&x).unwrap();
        for (p, t) in pred.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-6, "prediction {} vs target {}", p, t);
        }
        assert!(model.coefficients.as_ref().unwrap().iter().all(|c| c.is_finite()));

        // An all-zero indicator block still yields a finite prediction
        let unseen = array![[0.0, 0.0, 3.0]];
        assert!(model.predict(&unseen).unwrap()[0].is_finite());
    }

    #[test]
    fn test_constant_column_gets_zero_weight() {
        let x = array![[1.0, 0.0], [2.0, 0.0], [3.0, 0.0], [4.0, 0.0]];
        let y = array![3.0, 5.0, 7.0, 9.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients.as_ref().unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-9);
        assert_eq!(coef[1], 0.0);
    }

    #[test]
    fn test_without_intercept() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![2.0, 4.0, 6.0];

        let mut model = LinearRegression::new().with_fit_intercept(false);
        model.fit(&x, &y).unwrap();

        assert_eq!(model.intercept, Some(0.0));
        assert!((model.coefficients.as_ref().unwrap()[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_predict_dimension_mismatch() {
        let x = array![[1.0, 2.0], [2.0, 1.0], [3.0, 5.0]];
        let y = array![1.0, 2.0, 3.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let err = model.predict(&array![[1.0, 2.0, 3.0]]).unwrap_err();
        assert!(matches!(
            err,
            FlightPriceError::DimensionMismatch { expected: 2, actual: 3 }
        ));
    }

    #[test]
    fn test_predict_before_fit() {
        let model = LinearRegression::new();
        assert!(matches!(
            model.predict(&array![[1.0]]),
            Err(FlightPriceError::NotFitted)
        ));
    }

    #[test]
    fn test_fit_shape_errors() {
        let mut model = LinearRegression::new();
        assert!(model.fit(&array![[1.0], [2.0]], &array![1.0]).is_err());
        assert!(model.fit(&Array2::zeros((0, 2)), &Array1::zeros(0)).is_err());
    }

    #[test]
    fn test_validate_fitted_model() {
        let x = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [2.0, 1.0]];
        let y = array![1.0, 2.0, 3.0, 4.0];

        let mut model = LinearRegression::new();
        assert!(matches!(model.validate(), Err(FlightPriceError::NotFitted)));

        model.fit(&x, &y).unwrap();
        assert!(model.validate().is_ok());

        let mut truncated = model.clone();
        truncated.coefficients = Some(array![0.5]);
        assert!(matches!(truncated.validate(), Err(FlightPriceError::InvalidArtifact(_))));

        let mut no_coefficients = model.clone();
        no_coefficients.coefficients = None;
        assert!(matches!(no_coefficients.validate(), Err(FlightPriceError::InvalidArtifact(_))));

        let mut no_intercept = model.clone();
        no_intercept.intercept = None;
        assert!(matches!(no_intercept.validate(), Err(FlightPriceError::InvalidArtifact(_))));

        let mut nan_weight = model;
        nan_weight.coefficients = Some(array![f64::NAN, 1.0]);
        assert!(matches!(nan_weight.validate(), Err(FlightPriceError::InvalidArtifact(_))));
    }

    #[test]
    fn test_save_load_predictions_identical() {
        let x = array![[1.0, 0.3], [2.0, 0.1], [3.0, 0.7], [4.0, 0.2], [5.0, 0.9]];
        let y = array![1.1, 2.35, 2.9, 4.4, 4.85];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        model.save(&path).unwrap();
        let loaded = LinearRegression::load(&path).unwrap();

        assert_eq!(loaded.predict(&x).unwrap(), model.predict(&x).unwrap());
    }
}
