// Statistical primitives for the pricing-error analysis
//
// - Descriptive group summaries use trueno vectors and aprender's
//   DescriptiveStats for the median
// - Two-sample t-test, Spearman and one-way ANOVA compute their statistic
//   here in f64 and take the p-value from statrs distributions
// - Quartile binning uses linear-interpolated edges and right-closed bins;
//   duplicate edges collapse

mod correlation;
mod descriptive;
mod hypothesis;
mod quantile;

pub use correlation::{rank, spearman, CorrelationTest};
pub use descriptive::{mean, GroupSummary};
pub use hypothesis::{one_way_anova, ttest_ind, AnovaTest, TTest};
pub use quantile::{qcut, quantile, quartile_table, QuartileRow, QuartileTable};

use thiserror::Error;

/// Errors raised by statistical routines
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Insufficient data: need at least {required} samples, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Numeric failure: {0}")]
    Numeric(String),
}

pub type Result<T> = std::result::Result<T, StatsError>;

/// Significance marker for a p-value
///
/// `***` p < 0.001, `**` p < 0.01, `*` p < 0.05, `NS` otherwise (including NaN).
pub fn significance_stars(pvalue: f64) -> &'static str {
    if pvalue < 0.001 {
        "***"
    } else if pvalue < 0.01 {
        "**"
    } else if pvalue < 0.05 {
        "*"
    } else {
        "NS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significance_stars() {
        assert_eq!(significance_stars(0.0005), "***");
        assert_eq!(significance_stars(0.005), "**");
        assert_eq!(significance_stars(0.02), "*");
        assert_eq!(significance_stars(0.05), "NS");
        assert_eq!(significance_stars(f64::NAN), "NS");
    }
}
