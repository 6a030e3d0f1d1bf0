//! Standardized ordinary least squares on the feature set
//!
//! Every column is z-scored with aprender's `StandardScaler` so that the
//! fitted coefficients are comparable in magnitude. Columns with zero
//! variance carry no information; they are left out of the fit and reported
//! with a zero coefficient.

use super::features::FeatureSet;
use aprender::linear_model::LinearRegression;
use aprender::preprocessing::StandardScaler;
use aprender::primitives::{Matrix, Vector};
use aprender::traits::{Estimator, Transformer};
use thiserror::Error;
use tracing::debug;

/// Errors for the regression fit
#[derive(Error, Debug)]
pub enum RegressionError {
    #[error("Insufficient data: need at least {required} rows, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Preprocessing failed: {0}")]
    PreprocessingError(String),

    #[error("Model fit failed: {0}")]
    FitError(String),
}

pub type Result<T> = std::result::Result<T, RegressionError>;

/// One fitted (standardized) coefficient
#[derive(Debug, Clone, PartialEq)]
pub struct Coefficient {
    pub feature: String,
    pub value: f64,
}

/// Outcome of the multivariate fit
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionResult {
    /// In-sample coefficient of determination
    pub r2: f64,
    /// In feature order
    pub coefficients: Vec<Coefficient>,
    pub intercept: f64,
    pub n_samples: usize,
}

impl RegressionResult {
    /// Coefficients by descending absolute value, ties in feature order
    pub fn importance(&self) -> Vec<&Coefficient> {
        let mut ranked: Vec<&Coefficient> = self.coefficients.iter().collect();
        ranked.sort_by(|a, b| b.value.abs().total_cmp(&a.value.abs()));
        ranked
    }

    /// Names of the `n` strongest drivers
    pub fn top_drivers(&self, n: usize) -> Vec<&str> {
        self.importance()
            .into_iter()
            .take(n)
            .map(|c| c.feature.as_str())
            .collect()
    }

    pub fn to_report_string(&self) -> String {
        let mut report = format!(
            "R² Score: {:.4} ({:.1}% of variance explained)\n\n",
            self.r2,
            self.r2 * 100.0
        );

        report.push_str("Feature Coefficients (standardized):\n");
        for coef in &self.coefficients {
            report.push_str(&format!("  {:<25}: {:+.6}\n", coef.feature, coef.value));
        }
        report.push_str(&format!("  {:<25}: {:+.6}\n\n", "Intercept", self.intercept));

        report.push_str("Feature Importance (by absolute coefficient):\n");
        report.push_str(&format!(
            "  {:<25} {:>12} {:>16}\n",
            "feature", "coefficient", "abs_coefficient"
        ));
        for coef in self.importance() {
            report.push_str(&format!(
                "  {:<25} {:>12.6} {:>16.6}\n",
                coef.feature,
                coef.value,
                coef.value.abs()
            ));
        }
        report
    }
}

fn variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// Z-score the given columns of `features` into an aprender matrix
fn standardize(features: &FeatureSet, columns: &[usize]) -> Result<Matrix<f32>> {
    let n_rows = features.n_rows();
    let width = features.n_features();

    let mut raw = Vec::with_capacity(n_rows * columns.len());
    for row in features.data.chunks(width) {
        raw.extend(columns.iter().map(|&j| row[j] as f32));
    }
    let matrix = Matrix::from_vec(n_rows, columns.len(), raw)
        .map_err(|e| RegressionError::PreprocessingError(e.to_string()))?;

    let mut scaler = StandardScaler::new().with_mean(true).with_std(true);
    scaler
        .fit(&matrix)
        .map_err(|e| RegressionError::PreprocessingError(e.to_string()))?;
    scaler
        .transform(&matrix)
        .map_err(|e| RegressionError::PreprocessingError(e.to_string()))
}

/// Fit error_abs on the standardized features
pub fn fit_standardized(features: &FeatureSet) -> Result<RegressionResult> {
    let n_rows = features.n_rows();
    let required = features.n_features() + 2;
    if n_rows < required {
        return Err(RegressionError::InsufficientData {
            required,
            actual: n_rows,
        });
    }

    let informative: Vec<usize> = (0..features.n_features())
        .filter(|&j| {
            features
                .column(features.names[j])
                .is_some_and(|col| variance(&col) > 0.0)
        })
        .collect();
    debug!(
        "Fitting {} of {} features on {} rows",
        informative.len(),
        features.n_features(),
        n_rows
    );

    let target: Vec<f32> = features.target.iter().map(|&v| v as f32).collect();
    let y = Vector::from_slice(&target);

    let (fitted, intercept, r2) = if informative.is_empty() {
        // Nothing to regress on: the model is the mean
        let mean = features.target.iter().sum::<f64>() / n_rows as f64;
        (Vec::new(), mean, 0.0)
    } else {
        let x = standardize(features, &informative)?;
        let mut model = LinearRegression::new();
        model
            .fit(&x, &y)
            .map_err(|e| RegressionError::FitError(e.to_string()))?;
        let r2 = f64::from(model.score(&x, &y));
        let coefficients: Vec<f64> = model
            .coefficients()
            .as_slice()
            .iter()
            .map(|&c| f64::from(c))
            .collect();
        (coefficients, f64::from(model.intercept()), r2)
    };

    let coefficients = features
        .names
        .iter()
        .enumerate()
        .map(|(j, name)| Coefficient {
            feature: name.to_string(),
            value: informative
                .iter()
                .position(|&k| k == j)
                .and_then(|pos| fitted.get(pos).copied())
                .unwrap_or(0.0),
        })
        .collect();

    Ok(RegressionResult {
        r2,
        coefficients,
        intercept,
        n_samples: n_rows,
    })
}
