//! Group-difference tests: two-sample t-test and one-way ANOVA

use super::{Result, StatsError};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

/// Result of an independent two-sample t-test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTest {
    pub statistic: f64,
    /// Two-tailed p-value
    pub pvalue: f64,
    pub df: f64,
}

/// Student's independent t-test (pooled variance)
///
/// Each group needs at least two samples. The statistic is computed in f64:
/// pricing errors cluster tightly around a small mean and lose digits in
/// single precision.
pub fn ttest_ind(a: &[f64], b: &[f64]) -> Result<TTest> {
    let smallest = a.len().min(b.len());
    if smallest < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: smallest,
        });
    }

    let (n_a, n_b) = (a.len() as f64, b.len() as f64);
    let mean_a = a.iter().sum::<f64>() / n_a;
    let mean_b = b.iter().sum::<f64>() / n_b;
    let ss_a: f64 = a.iter().map(|x| (x - mean_a).powi(2)).sum();
    let ss_b: f64 = b.iter().map(|x| (x - mean_b).powi(2)).sum();

    let df = n_a + n_b - 2.0;
    let pooled = (ss_a + ss_b) / df;
    let statistic = (mean_a - mean_b) / (pooled * (1.0 / n_a + 1.0 / n_b)).sqrt();

    let pvalue = if statistic.is_nan() {
        f64::NAN
    } else if statistic.is_infinite() {
        0.0
    } else {
        let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Numeric(e.to_string()))?;
        (2.0 * dist.sf(statistic.abs())).min(1.0)
    };

    Ok(TTest {
        statistic,
        pvalue,
        df,
    })
}

/// Result of a one-way analysis of variance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnovaTest {
    pub f_statistic: f64,
    pub pvalue: f64,
    /// Between-group degrees of freedom (k - 1)
    pub df_between: f64,
    /// Within-group degrees of freedom (N - k)
    pub df_within: f64,
}

/// One-way ANOVA across `groups`
///
/// F = (SSB / (k - 1)) / (SSW / (N - k)); the p-value is the upper tail of
/// the F(k - 1, N - k) distribution.
pub fn one_way_anova(groups: &[Vec<f64>]) -> Result<AnovaTest> {
    let k = groups.len();
    if k < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: k,
        });
    }

    let total: usize = groups.iter().map(Vec::len).sum();
    if total <= k || groups.iter().any(Vec::is_empty) {
        return Err(StatsError::InsufficientData {
            required: k + 1,
            actual: total,
        });
    }

    let grand_mean = groups.iter().flatten().sum::<f64>() / total as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in groups {
        let n = group.len() as f64;
        let group_mean = group.iter().sum::<f64>() / n;
        ss_between += n * (group_mean - grand_mean).powi(2);
        ss_within += group.iter().map(|x| (x - group_mean).powi(2)).sum::<f64>();
    }

    let df_between = (k - 1) as f64;
    let df_within = (total - k) as f64;
    let f_statistic = (ss_between / df_between) / (ss_within / df_within);

    let pvalue = if f_statistic.is_nan() {
        f64::NAN
    } else if f_statistic.is_infinite() {
        0.0
    } else {
        FisherSnedecor::new(df_between, df_within)
            .map_err(|e| StatsError::Numeric(e.to_string()))?
            .sf(f_statistic)
    };

    Ok(AnovaTest {
        f_statistic,
        pvalue,
        df_between,
        df_within,
    })
}
