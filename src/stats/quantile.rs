//! Quantile edges and equal-count binning
//!
//! `qcut(values, q)`: edges are linearly interpolated sample
//! quantiles, the first bin is closed on both ends, the others are
//! right-closed, and duplicate edges collapse into fewer bins.

use super::{GroupSummary, Result, StatsError};
use std::cmp::Ordering;

/// Linearly interpolated quantile of already sorted data (R-7 / numpy default)
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Assign every value to one of (at most) `q` equal-count bins
///
/// Returns the bin index per input value and the number of bins actually
/// produced. Every value lands in exactly one bin.
pub fn qcut(values: &[f64], q: usize) -> Result<(Vec<usize>, usize)> {
    if values.is_empty() || q == 0 {
        return Err(StatsError::InsufficientData {
            required: 1,
            actual: values.len(),
        });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut edges: Vec<f64> = (0..=q)
        .map(|i| quantile(&sorted, i as f64 / q as f64))
        .collect();
    edges.dedup();

    let n_bins = edges.len().saturating_sub(1).max(1);

    // Interior edges split the bins; values above the last interior edge go to
    // the top bin, values at or below the first go to the bottom one
    let interior = if edges.len() > 2 {
        &edges[1..edges.len() - 1]
    } else {
        &[][..]
    };

    let bins = values
        .iter()
        .map(|v| interior.iter().filter(|edge| *v > **edge).count())
        .collect();

    Ok((bins, n_bins))
}

/// One row of a quartile table
#[derive(Debug, Clone, PartialEq)]
pub struct QuartileRow {
    pub label: String,
    pub summary: GroupSummary,
}

/// Target summaries per predictor quartile
#[derive(Debug, Clone, PartialEq)]
pub struct QuartileTable {
    pub rows: Vec<QuartileRow>,
}

impl QuartileTable {
    /// Total number of observations across all buckets
    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.summary.count).sum()
    }

    pub fn to_report_string(&self, include_std: bool) -> String {
        let mut report = String::new();
        if include_std {
            report.push_str(&format!(
                "  {:<12} {:>12} {:>12} {:>12} {:>8}\n",
                "bucket", "mean", "median", "std", "count"
            ));
        } else {
            report.push_str(&format!(
                "  {:<12} {:>12} {:>12} {:>8}\n",
                "bucket", "mean", "median", "count"
            ));
        }

        for row in &self.rows {
            let s = &row.summary;
            if include_std {
                report.push_str(&format!(
                    "  {:<12} {:>12.6} {:>12.6} {:>12.6} {:>8}\n",
                    row.label, s.mean, s.median, s.std, s.count
                ));
            } else {
                report.push_str(&format!(
                    "  {:<12} {:>12.6} {:>12.6} {:>8}\n",
                    row.label, s.mean, s.median, s.count
                ));
            }
        }
        report
    }
}

fn quartile_label(index: usize, n_bins: usize) -> String {
    if index == 0 && n_bins > 1 {
        "Q1 (Low)".to_string()
    } else if index + 1 == n_bins && n_bins > 1 {
        format!("Q{} (High)", index + 1)
    } else {
        format!("Q{}", index + 1)
    }
}

/// Bucket `predictor` into quartiles and summarize `target` per bucket
pub fn quartile_table(predictor: &[f64], target: &[f64]) -> Result<QuartileTable> {
    if predictor.len() != target.len() {
        return Err(StatsError::LengthMismatch {
            left: predictor.len(),
            right: target.len(),
        });
    }

    let (bins, n_bins) = qcut(predictor, 4)?;

    let mut groups: Vec<Vec<f64>> = vec![Vec::new(); n_bins];
    for (bin, value) in bins.iter().zip(target) {
        groups[*bin].push(*value);
    }

    let rows = groups
        .iter()
        .enumerate()
        .map(|(i, values)| {
            Ok(QuartileRow {
                label: quartile_label(i, n_bins),
                summary: GroupSummary::from_values(values)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuartileTable { rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 0.5), 2.5);
        assert_eq!(quantile(&sorted, 1.0), 4.0);
        assert!((quantile(&sorted, 0.25) - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_qcut_equal_sizes_for_distinct_values() {
        let values: Vec<f64> = (1..=90).map(|i| i as f64 * 1_000.0).collect();
        let (bins, n_bins) = qcut(&values, 4).unwrap();

        assert_eq!(n_bins, 4);
        let mut counts = [0usize; 4];
        for b in &bins {
            counts[*b] += 1;
        }
        assert_eq!(counts, [23, 22, 22, 23]);
    }

    #[test]
    fn test_qcut_collapses_duplicate_edges() {
        // More than half zeros-equivalent: lower edges coincide
        let values = vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 3.0];
        let (bins, n_bins) = qcut(&values, 4).unwrap();

        assert!(n_bins < 4);
        assert!(bins.iter().all(|b| *b < n_bins));
    }

    #[test]
    fn test_qcut_constant_values_single_bin() {
        let (bins, n_bins) = qcut(&[5.0, 5.0, 5.0], 4).unwrap();
        assert_eq!(n_bins, 1);
        assert_eq!(bins, vec![0, 0, 0]);
    }

    #[test]
    fn test_quartile_table_labels_and_totals() {
        let predictor: Vec<f64> = (1..=8).map(|i| i as f64).collect();
        let target: Vec<f64> = (1..=8).map(|i| i as f64 / 100.0).collect();

        let table = quartile_table(&predictor, &target).unwrap();
        let labels: Vec<&str> = table.rows.iter().map(|r| r.label.as_str()).collect();

        assert_eq!(labels, vec!["Q1 (Low)", "Q2", "Q3", "Q4 (High)"]);
        assert_eq!(table.total(), 8);
        assert!(table.rows[0].summary.mean < table.rows[3].summary.mean);

        let report = table.to_report_string(true);
        assert!(report.contains("Q4 (High)"));
        assert!(report.contains("std"));
    }
}
