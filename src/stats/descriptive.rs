//! Group summaries (mean, median, std, count)

use super::{Result, StatsError};
use aprender::stats::DescriptiveStats;
use trueno::Vector;

/// Summary of a group of error values
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1); NaN below two values
    pub std: f64,
    pub count: usize,
}

impl GroupSummary {
    /// Summarize `values`
    ///
    /// An empty group yields NaN statistics with a zero count rather than an
    /// error, so that sparse buckets still show up in tables.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Ok(Self {
                mean: f64::NAN,
                median: f64::NAN,
                std: f64::NAN,
                count: 0,
            });
        }

        let data: Vec<f32> = values.iter().map(|v| *v as f32).collect();
        let vec = Vector::from_slice(&data);

        // trueno returns Result for mean and variance
        let mean = vec
            .mean()
            .map_err(|e| StatsError::Numeric(format!("mean: {}", e)))?;
        let population_variance = vec
            .variance()
            .map_err(|e| StatsError::Numeric(format!("variance: {}", e)))?;

        // trueno's variance divides by n; rescale to the sample estimator
        let n = values.len();
        let std = if n > 1 {
            (population_variance as f64 * n as f64 / (n - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        let median = DescriptiveStats::new(&vec)
            .quantile(0.5)
            .map_err(|e| StatsError::Numeric(format!("median: {}", e)))?;

        Ok(Self {
            mean: mean as f64,
            median: median as f64,
            std,
            count: n,
        })
    }
}

/// Arithmetic mean in f64; NaN for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
