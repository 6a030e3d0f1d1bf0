//! Key findings narrative assembled from the theory and regression results

use crate::config::Thresholds;
use crate::regression::RegressionResult;
use crate::theories::{IncentiveAnalysis, MaturityAnalysis, ProtocolAnalysis};

pub const TITLE: &str = "KEY FINDINGS SUMMARY";

/// Numbered findings; numbers stay fixed even when earlier ones are absent
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyFindings {
    pub findings: Vec<String>,
}

impl KeyFindings {
    pub fn compose(
        maturity: &MaturityAnalysis,
        protocols: &ProtocolAnalysis,
        regression: Option<&RegressionResult>,
        incentives: &IncentiveAnalysis,
        thresholds: &Thresholds,
    ) -> Self {
        let mut findings = Vec::new();

        if let Some(test) = &maturity.lead_error {
            if test.statistic.abs() > thresholds.time_decay_correlation
                && test.pvalue < thresholds.significance_level
            {
                findings.push(format!(
                    "1. TIME DECAY: Error {} by {:.1}% as maturity approaches",
                    if test.statistic < 0.0 {
                        "increases"
                    } else {
                        "decreases"
                    },
                    test.statistic.abs() * 100.0
                ));
            }
        }

        if let (Some(best), Some(worst)) = (protocols.best(), protocols.worst()) {
            findings.push(format!(
                "2. PROTOCOL EFFECT: {} worst ({:.4}) vs {} best ({:.4})",
                worst.protocol, worst.mae, best.protocol, best.mae
            ));
        }

        if let Some(result) = regression {
            findings.push(format!(
                "3. PRIMARY DRIVERS: {} (regression R²={:.3})",
                result.top_drivers(2).join(", "),
                result.r2
            ));
        }

        // NaN differences fail the comparison and produce no finding
        if let Some(diff) = incentives.effect_size() {
            if diff.abs() > thresholds.incentive_effect_min {
                findings.push(format!(
                    "4. INCENTIVE EFFECT: {:+.2}% error with PENDLE incentives",
                    diff * 100.0
                ));
            }
        }

        Self { findings }
    }

    pub fn to_report_string(&self) -> String {
        let rule = "=".repeat(80);
        let mut report = format!("{rule}\n{TITLE}\n{rule}\n\n");
        report.push_str("🔍 Root Causes of 1.8% YT Over-Pricing:\n\n");
        for finding in &self.findings {
            report.push_str(finding);
            report.push('\n');
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regression::Coefficient;
    use crate::stats::CorrelationTest;
    use crate::theories::{IncentiveOutcome, ProtocolRow, Verdict};

    fn maturity(statistic: f64, pvalue: f64) -> MaturityAnalysis {
        MaturityAnalysis {
            table: Vec::new(),
            lead_error: Some(CorrelationTest {
                statistic,
                pvalue,
                n: 500,
            }),
            lead_liquidity: None,
            lead_volume: None,
        }
    }

    fn protocol_row(protocol: &str, mae: f64) -> ProtocolRow {
        ProtocolRow {
            protocol: protocol.to_string(),
            mae,
            median_ae: mae,
            std_ae: 0.0,
            mean_signed_error: mae,
            markets: 1,
            observations: 50,
        }
    }

    fn protocols(table: Vec<ProtocolRow>) -> ProtocolAnalysis {
        ProtocolAnalysis {
            table,
            min_report_obs: 10,
            anova: None,
            verdict: Verdict::InsufficientData {
                reason: "Insufficient data for ANOVA test across protocols".to_string(),
            },
        }
    }

    fn incentives(mean_with: f64, mean_without: f64) -> IncentiveAnalysis {
        IncentiveAnalysis {
            total: 100,
            with_pendle: 40,
            with_lp: 0,
            outcome: IncentiveOutcome::TTest {
                mean_with,
                mean_without,
                n_with: 40,
                n_without: 60,
                test: None,
                verdict: Verdict::Rejected,
            },
        }
    }

    fn regression() -> RegressionResult {
        RegressionResult {
            r2: 0.1234,
            coefficients: vec![
                Coefficient {
                    feature: "log_liquidity".to_string(),
                    value: -0.004,
                },
                Coefficient {
                    feature: "lead_days".to_string(),
                    value: -0.006,
                },
                Coefficient {
                    feature: "total_incentive_apy".to_string(),
                    value: 0.001,
                },
            ],
            intercept: 0.018,
            n_samples: 500,
        }
    }

    #[test]
    fn test_all_findings() {
        let findings = KeyFindings::compose(
            &maturity(-0.35, 0.0001),
            &protocols(vec![protocol_row("Lido", 0.01), protocol_row("Renzo", 0.03)]),
            Some(&regression()),
            &incentives(0.025, 0.015),
            &Thresholds::default(),
        );

        assert_eq!(
            findings.findings,
            vec![
                "1. TIME DECAY: Error increases by 35.0% as maturity approaches",
                "2. PROTOCOL EFFECT: Renzo worst (0.0300) vs Lido best (0.0100)",
                "3. PRIMARY DRIVERS: lead_days, log_liquidity (regression R²=0.123)",
                "4. INCENTIVE EFFECT: +1.00% error with PENDLE incentives",
            ]
        );
        assert!(findings
            .to_report_string()
            .contains("🔍 Root Causes of 1.8% YT Over-Pricing:"));
    }

    #[test]
    fn test_weak_time_decay_omitted_numbers_kept() {
        let findings = KeyFindings::compose(
            &maturity(0.15, 0.0001),
            &protocols(Vec::new()),
            Some(&regression()),
            &incentives(0.0205, 0.02),
            &Thresholds::default(),
        );

        assert_eq!(findings.findings.len(), 1);
        assert!(findings.findings[0].starts_with("3. PRIMARY DRIVERS"));
    }

    #[test]
    fn test_positive_time_decay_reads_decreases() {
        let findings = KeyFindings::compose(
            &maturity(0.5, 0.001),
            &protocols(Vec::new()),
            None,
            &incentives(f64::NAN, 0.01),
            &Thresholds::default(),
        );
        assert_eq!(
            findings.findings,
            vec!["1. TIME DECAY: Error decreases by 50.0% as maturity approaches"]
        );
    }
}
