// Multivariate regression of pricing error on market factors
//
// Build the feature matrix from cleaned rows, z-score every column, then fit
// ordinary least squares. Coefficients are standardized so their absolute
// values rank the drivers of error.

pub mod features;
pub mod ols;

pub use features::{build_features, FeatureSet};
pub use ols::{fit_standardized, Coefficient, RegressionError, RegressionResult};

use crate::config::Thresholds;
use crate::dataset::Observation;

pub const TITLE: &str = "MULTIVARIATE REGRESSION ANALYSIS";
pub const SUBTITLE: &str = "Predicting error_abs from multiple factors";

/// Build features from cleaned rows and fit the standardized model
pub fn evaluate_regression(
    rows: &[Observation],
    thresholds: &Thresholds,
) -> ols::Result<RegressionResult> {
    let features = build_features(rows, thresholds);
    fit_standardized(&features)
}
