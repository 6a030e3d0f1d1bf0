//! Theory 2: PENDLE incentives drive YT demand and systematic over-pricing
//!
//! With enough incentivised rows the mean error of rows with and without a
//! PENDLE incentive is compared by t-test. Otherwise the block falls back to
//! rank-correlating total incentive APY with the error.

use super::{correlation_lines, Verdict};
use crate::config::Thresholds;
use crate::dataset::Observation;
use crate::stats::{self, mean, significance_stars, spearman, ttest_ind, CorrelationTest, TTest};
use tracing::{debug, warn};

pub const TITLE: &str = "THEORY 2: INCENTIVE EFFECT ON OVER-PRICING";
pub const HYPOTHESIS: &str =
    "Hypothesis: PENDLE incentives drive YT demand → Systematic over-pricing";

/// Which test the incentive block ran
#[derive(Debug, Clone, PartialEq)]
pub enum IncentiveOutcome {
    /// Two-sample comparison of rows with vs without PENDLE incentives
    TTest {
        mean_with: f64,
        mean_without: f64,
        n_with: usize,
        n_without: usize,
        /// None when the comparison group is too small to test
        test: Option<TTest>,
        verdict: Verdict,
    },

    /// Too few incentivised rows: correlation on positive total incentive APY
    Fallback {
        nonzero: usize,
        correlation: Option<CorrelationTest>,
    },
}

/// Result of the incentive theory
#[derive(Debug, Clone, PartialEq)]
pub struct IncentiveAnalysis {
    pub total: usize,
    pub with_pendle: usize,
    pub with_lp: usize,
    pub outcome: IncentiveOutcome,
}

impl IncentiveAnalysis {
    /// Mean error with incentives minus without, when the t-test path ran
    pub fn effect_size(&self) -> Option<f64> {
        match &self.outcome {
            IncentiveOutcome::TTest {
                mean_with,
                mean_without,
                ..
            } => Some(mean_with - mean_without),
            IncentiveOutcome::Fallback { .. } => None,
        }
    }

    pub fn to_report_string(&self) -> String {
        let pct = |count: usize| {
            if self.total == 0 {
                0.0
            } else {
                count as f64 / self.total as f64 * 100.0
            }
        };

        let mut report = format!(
            "Markets with PENDLE incentives: {} / {} ({:.1}%)\n",
            self.with_pendle,
            self.total,
            pct(self.with_pendle)
        );
        report.push_str(&format!(
            "Markets with LP rewards: {} / {} ({:.1}%)\n\n",
            self.with_lp,
            self.total,
            pct(self.with_lp)
        ));

        match &self.outcome {
            IncentiveOutcome::TTest {
                mean_with,
                mean_without,
                n_with,
                n_without,
                test,
                verdict,
            } => {
                report.push_str(&format!(
                    "Mean error WITH PENDLE incentives:    {:.6} ({} obs)\n",
                    mean_with, n_with
                ));
                report.push_str(&format!(
                    "Mean error WITHOUT PENDLE incentives: {:.6} ({} obs)\n",
                    mean_without, n_without
                ));
                report.push_str(&format!("Difference: {:.6}\n", mean_with - mean_without));
                if let Some(test) = test {
                    report.push_str(&format!(
                        "T-test p-value: {:.6} {}\n",
                        test.pvalue,
                        significance_stars(test.pvalue)
                    ));
                }
                report.push('\n');
                report.push_str(&format!("Result: {}\n", verdict.label()));
            }
            IncentiveOutcome::Fallback {
                nonzero,
                correlation,
            } => {
                report.push_str("⚠ Insufficient data with PENDLE incentives for statistical test\n");
                report.push_str("   Testing with total incentive APY instead...\n");
                match correlation {
                    Some(test) => report.push_str(&correlation_lines(
                        "total_incentive_apy vs error_abs",
                        test,
                        false,
                    )),
                    None => report.push_str(&format!(
                        "⚠ Insufficient incentive data: {} observations with positive total incentive APY\n",
                        nonzero
                    )),
                }
            }
        }
        report
    }
}

/// Compare errors across incentive presence
pub fn evaluate_incentives(
    rows: &[Observation],
    thresholds: &Thresholds,
) -> stats::Result<IncentiveAnalysis> {
    let with_pendle = rows.iter().filter(|o| o.has_pendle_incentive()).count();
    let with_lp = rows.iter().filter(|o| o.has_lp_reward()).count();

    let outcome = if with_pendle > thresholds.incentive_min_group {
        let (with, without): (Vec<&Observation>, Vec<&Observation>) =
            rows.iter().partition(|o| o.has_pendle_incentive());
        let with: Vec<f64> = with.iter().map(|o| o.error()).collect();
        let without: Vec<f64> = without.iter().map(|o| o.error()).collect();

        let mean_with = mean(&with);
        let mean_without = mean(&without);

        let (test, verdict) = match ttest_ind(&with, &without) {
            Ok(test) => {
                debug!("incentive t-test: t={:.4} p={:.6}", test.statistic, test.pvalue);
                let confirmed =
                    mean_with > mean_without && test.pvalue < thresholds.significance_level;
                (Some(test), Verdict::from_outcome(confirmed))
            }
            Err(stats::StatsError::InsufficientData { .. }) => {
                warn!(
                    "Skipping incentive t-test: {} rows without PENDLE incentives",
                    without.len()
                );
                (
                    None,
                    Verdict::InsufficientData {
                        reason: format!(
                            "Insufficient data without PENDLE incentives: {} observations",
                            without.len()
                        ),
                    },
                )
            }
            Err(e) => return Err(e),
        };

        IncentiveOutcome::TTest {
            mean_with,
            mean_without,
            n_with: with.len(),
            n_without: without.len(),
            test,
            verdict,
        }
    } else {
        warn!(
            "Only {} rows with PENDLE incentives, falling back to total incentive APY",
            with_pendle
        );
        let (apy, errors): (Vec<f64>, Vec<f64>) = rows
            .iter()
            .map(|o| (o.total_incentive_apy(), o.error()))
            .filter(|(apy, _)| *apy > 0.0)
            .unzip();

        let correlation = if apy.len() > thresholds.incentive_min_group {
            Some(spearman(&apy, &errors)?)
        } else {
            None
        };

        IncentiveOutcome::Fallback {
            nonzero: apy.len(),
            correlation,
        }
    };

    Ok(IncentiveAnalysis {
        total: rows.len(),
        with_pendle,
        with_lp,
        outcome,
    })
}
