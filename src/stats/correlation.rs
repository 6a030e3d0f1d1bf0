//! Spearman rank correlation with a two-sided p-value

use super::{Result, StatsError};
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::cmp::Ordering;

/// Result of a rank-correlation test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationTest {
    /// Spearman's rho in [-1, 1]; NaN when either input is constant
    pub statistic: f64,
    /// Two-sided p-value from the t approximation with n - 2 degrees of freedom
    pub pvalue: f64,
    /// Number of paired samples
    pub n: usize,
}

impl CorrelationTest {
    /// Significant and stronger than `-min_correlation` in the negative direction
    pub fn confirms_negative(&self, min_correlation: f64, significance_level: f64) -> bool {
        self.statistic < -min_correlation && self.pvalue < significance_level
    }
}

/// Rank values, averaging ranks over ties (1-based)
pub fn rank(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut indexed: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n && indexed[j].1 == indexed[i].1 {
            j += 1;
        }

        // Positions i..j share the average of ranks i+1..=j
        let avg_rank = (i + j) as f64 / 2.0 + 0.5;
        for item in &indexed[i..j] {
            ranks[item.0] = avg_rank;
        }
        i = j;
    }

    ranks
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Spearman rank correlation between `x` and `y`
///
/// # Example
/// ```
/// use ytaudit::stats::spearman;
///
/// let lead_days = [90.0, 60.0, 30.0, 14.0, 7.0, 3.0, 1.0];
/// let error_abs = [0.01, 0.012, 0.015, 0.02, 0.03, 0.04, 0.05];
///
/// let test = spearman(&lead_days, &error_abs).unwrap();
/// assert!((test.statistic + 1.0).abs() < 1e-12);
/// assert!(test.pvalue < 0.05);
/// ```
pub fn spearman(x: &[f64], y: &[f64]) -> Result<CorrelationTest> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }

    let n = x.len();
    if n < 3 {
        return Err(StatsError::InsufficientData {
            required: 3,
            actual: n,
        });
    }

    let rho = pearson(&rank(x), &rank(y));
    let pvalue = rank_correlation_pvalue(rho, n)?;

    Ok(CorrelationTest {
        statistic: rho,
        pvalue,
        n,
    })
}

fn rank_correlation_pvalue(rho: f64, n: usize) -> Result<f64> {
    if rho.is_nan() {
        return Ok(f64::NAN);
    }
    if rho.abs() >= 1.0 {
        return Ok(0.0);
    }

    let dof = (n - 2) as f64;
    let t = rho * (dof / ((rho + 1.0) * (1.0 - rho))).sqrt();
    let dist = StudentsT::new(0.0, 1.0, dof).map_err(|e| StatsError::Numeric(e.to_string()))?;

    Ok((2.0 * dist.sf(t.abs())).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_without_ties() {
        assert_eq!(rank(&[30.0, 10.0, 20.0]), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_rank_averages_ties() {
        assert_eq!(rank(&[1.0, 2.0, 2.0, 3.0]), vec![1.0, 2.5, 2.5, 4.0]);
        assert_eq!(rank(&[5.0, 5.0, 5.0]), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_spearman_perfect_positive() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [10.0, 20.0, 25.0, 100.0, 1000.0];
        let test = spearman(&x, &y).unwrap();
        assert!((test.statistic - 1.0).abs() < 1e-12);
        assert!(test.pvalue < 1e-10);
        assert_eq!(test.n, 5);
    }

    #[test]
    fn test_spearman_known_value() {
        // Reference values: rho=0.82078, p=0.0886
        let test = spearman(&[1.0, 2.0, 3.0, 4.0, 5.0], &[5.0, 6.0, 7.0, 8.0, 7.0]).unwrap();
        assert!((test.statistic - 8.0 / 95.0f64.sqrt()).abs() < 1e-12);
        assert!((test.pvalue - 0.0886).abs() < 1e-3);
    }

    #[test]
    fn test_spearman_constant_input_is_nan() {
        let test = spearman(&[1.0, 1.0, 1.0, 1.0], &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!(test.statistic.is_nan());
        assert!(test.pvalue.is_nan());
        assert!(!test.confirms_negative(0.1, 0.05));
    }

    #[test]
    fn test_spearman_length_mismatch() {
        assert!(matches!(
            spearman(&[1.0, 2.0, 3.0], &[1.0, 2.0]),
            Err(StatsError::LengthMismatch { left: 3, right: 2 })
        ));
    }

    #[test]
    fn test_spearman_insufficient() {
        assert!(matches!(
            spearman(&[1.0, 2.0], &[1.0, 2.0]),
            Err(StatsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_confirms_negative() {
        let test = CorrelationTest {
            statistic: -0.3,
            pvalue: 0.01,
            n: 200,
        };
        assert!(test.confirms_negative(0.1, 0.05));

        let weak = CorrelationTest {
            statistic: -0.05,
            ..test
        };
        assert!(!weak.confirms_negative(0.1, 0.05));
    }
}
