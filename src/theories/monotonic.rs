//! Shared evaluator for "more X, less error" theories
//!
//! Liquidity, volume and TVL all follow the same recipe: keep rows where the
//! predictor is present and positive, rank-correlate it with error_abs,
//! bucket it into quartiles, and confirm when the correlation is below
//! `-min_correlation` at the significance level.

use super::{correlation_lines, Verdict};
use crate::config::Thresholds;
use crate::dataset::{positive, Observation};
use crate::stats::{self, quartile_table, spearman, CorrelationTest, QuartileTable, StatsError};
use tracing::{debug, warn};

/// Static description of one monotonic theory
pub(crate) struct MonotonicSpec {
    /// Column name shown in the correlation line
    pub predictor: &'static str,
    /// Caption above the quartile table (e.g., "Liquidity")
    pub bucket_title: &'static str,
    /// Tests run only with strictly more rows than this
    pub min_observations: Option<usize>,
    /// Show the std column in the quartile table
    pub include_std: bool,
    /// Append the "% negative/positive correlation" line
    pub show_strength: bool,
    /// Warning shown when the block is skipped
    pub insufficient: fn(usize) -> String,
}

/// Result of a monotonic theory
#[derive(Debug, Clone, PartialEq)]
pub struct MonotonicAnalysis {
    pub predictor: &'static str,
    pub bucket_title: &'static str,
    /// Rows with a positive predictor value
    pub observations: usize,
    pub correlation: Option<CorrelationTest>,
    pub quartiles: Option<QuartileTable>,
    pub verdict: Verdict,
    include_std: bool,
    show_strength: bool,
}

impl MonotonicAnalysis {
    pub fn to_report_string(&self) -> String {
        let (Some(correlation), Some(quartiles)) = (&self.correlation, &self.quartiles) else {
            return format!("{}\n", self.verdict.label());
        };

        let mut report = correlation_lines(
            &format!("{} vs error_abs", self.predictor),
            correlation,
            true,
        );
        report.push('\n');
        report.push_str(&format!("Error by {} Quartile:\n", self.bucket_title));
        report.push_str(&quartiles.to_report_string(self.include_std));
        report.push('\n');
        report.push_str(&format!("Result: {}\n", self.verdict.label()));

        if self.show_strength {
            report.push_str(&format!(
                "        {:.1}% {} correlation\n",
                (correlation.statistic * 100.0).abs(),
                if correlation.statistic < 0.0 {
                    "negative"
                } else {
                    "positive"
                }
            ));
        }
        report
    }
}

pub(crate) fn evaluate(
    rows: &[Observation],
    select: impl Fn(&Observation) -> Option<f64>,
    spec: &MonotonicSpec,
    thresholds: &Thresholds,
) -> stats::Result<MonotonicAnalysis> {
    let (predictor, target): (Vec<f64>, Vec<f64>) = rows
        .iter()
        .filter_map(|obs| positive(select(obs)).map(|x| (x, obs.error())))
        .unzip();

    let n = predictor.len();
    let mut analysis = MonotonicAnalysis {
        predictor: spec.predictor,
        bucket_title: spec.bucket_title,
        observations: n,
        correlation: None,
        quartiles: None,
        verdict: Verdict::InsufficientData {
            reason: (spec.insufficient)(n),
        },
        include_std: spec.include_std,
        show_strength: spec.show_strength,
    };

    if spec.min_observations.is_some_and(|min| n <= min) {
        warn!("Skipping {} theory: {} observations", spec.predictor, n);
        return Ok(analysis);
    }

    let correlation = match spearman(&predictor, &target) {
        Ok(test) => test,
        Err(StatsError::InsufficientData { actual, .. }) => {
            warn!("Skipping {} theory: {} observations", spec.predictor, actual);
            return Ok(analysis);
        }
        Err(e) => return Err(e),
    };
    debug!(
        "{} vs error_abs: rho={:.4} p={:.6} n={}",
        spec.predictor, correlation.statistic, correlation.pvalue, n
    );

    analysis.quartiles = Some(quartile_table(&predictor, &target)?);
    analysis.verdict = Verdict::from_outcome(
        correlation.confirms_negative(thresholds.min_correlation, thresholds.significance_level),
    );
    analysis.correlation = Some(correlation);
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::observation::fixtures::row;

    fn spec(min_observations: Option<usize>) -> MonotonicSpec {
        MonotonicSpec {
            predictor: "liquidity_usd",
            bucket_title: "Liquidity",
            min_observations,
            include_std: true,
            show_strength: true,
            insufficient: |n| format!("Insufficient liquidity data: {} observations", n),
        }
    }

    #[test]
    fn test_negative_relationship_confirmed() {
        // Deeper pools, smaller errors
        let rows: Vec<Observation> = (1..=40)
            .map(|i| row("Lido", 30, i as f64 * 1_000.0, 0.05 - i as f64 * 0.001))
            .collect();

        let analysis =
            evaluate(&rows, |o| o.liquidity_usd, &spec(None), &Thresholds::default()).unwrap();

        assert_eq!(analysis.verdict, Verdict::Confirmed);
        assert_eq!(analysis.observations, 40);
        assert_eq!(analysis.quartiles.as_ref().unwrap().total(), 40);

        let report = analysis.to_report_string();
        assert!(report.contains("Error by Liquidity Quartile:"));
        assert!(report.contains("100.0% negative correlation"));
    }

    #[test]
    fn test_positive_relationship_rejected() {
        let rows: Vec<Observation> = (1..=40)
            .map(|i| row("Lido", 30, i as f64 * 1_000.0, i as f64 * 0.001))
            .collect();

        let analysis =
            evaluate(&rows, |o| o.liquidity_usd, &spec(None), &Thresholds::default()).unwrap();
        assert_eq!(analysis.verdict, Verdict::Rejected);
    }

    #[test]
    fn test_zero_and_missing_predictor_excluded() {
        let mut rows: Vec<Observation> = (1..=20)
            .map(|i| row("Lido", 30, i as f64, 0.01 * i as f64))
            .collect();
        rows[0].liquidity_usd = Some(0.0);
        rows[1].liquidity_usd = None;

        let analysis =
            evaluate(&rows, |o| o.liquidity_usd, &spec(None), &Thresholds::default()).unwrap();
        assert_eq!(analysis.observations, 18);
    }

    #[test]
    fn test_threshold_skips_block() {
        let rows: Vec<Observation> = (1..=50)
            .map(|i| row("Lido", 30, i as f64, 0.01))
            .collect();

        let analysis = evaluate(
            &rows,
            |o| o.liquidity_usd,
            &spec(Some(100)),
            &Thresholds::default(),
        )
        .unwrap();

        assert!(analysis.correlation.is_none());
        assert_eq!(
            analysis.to_report_string(),
            "⚠ Insufficient liquidity data: 50 observations\n"
        );
    }

    #[test]
    fn test_tiny_sample_skips_instead_of_failing() {
        let rows = vec![row("Lido", 30, 10.0, 0.01), row("Lido", 7, 20.0, 0.02)];
        let analysis =
            evaluate(&rows, |o| o.liquidity_usd, &spec(None), &Thresholds::default()).unwrap();
        assert!(matches!(analysis.verdict, Verdict::InsufficientData { .. }));
    }
}
