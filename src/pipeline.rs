//! End-to-end analysis run
//!
//! Load every configured network, clean once, then run the six theories,
//! the regression and the key-findings summary in a fixed order. Each block
//! reads the cleaned rows and never mutates them, so the report is a pure
//! function of the input table.

use crate::config::AnalysisConfig;
use crate::dataset::{clean, load_all, DatasetOverview, Observation};
use crate::regression::{self, RegressionError, RegressionResult};
use crate::summary::KeyFindings;
use crate::theories::{
    self, evaluate_incentives, evaluate_liquidity, evaluate_maturity, evaluate_protocols,
    evaluate_tvl, evaluate_volume, section_header, IncentiveAnalysis, MaturityAnalysis,
    MonotonicAnalysis, ProtocolAnalysis,
};
use anyhow::{Context, Result};
use tracing::{info, warn};

const BANNER: &str = "PENDLE YT PRICING ACCURACY ANALYSIS";

/// Every section of one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub overview: DatasetOverview,
    /// Rows left after dropping missing error_abs or liquidity_usd
    pub cleaned: usize,
    pub liquidity: MonotonicAnalysis,
    pub incentives: IncentiveAnalysis,
    pub volume: MonotonicAnalysis,
    pub protocols: ProtocolAnalysis,
    pub maturity: MaturityAnalysis,
    pub tvl: MonotonicAnalysis,
    /// None when there were too few rows to fit
    pub regression: Option<RegressionResult>,
    pub findings: KeyFindings,
}

impl AnalysisReport {
    pub fn to_report_string(&self) -> String {
        let rule = "=".repeat(80);
        let mut report = format!("{rule}\n{BANNER}\n{rule}\n\n");

        report.push_str(&self.overview.to_report_string());
        report.push('\n');
        report.push_str(&format!(
            "✓ Cleaned data: {} observations with complete liquidity data\n\n",
            self.cleaned
        ));

        let sections = [
            (
                theories::liquidity::TITLE,
                theories::liquidity::HYPOTHESIS,
                self.liquidity.to_report_string(),
            ),
            (
                theories::incentive::TITLE,
                theories::incentive::HYPOTHESIS,
                self.incentives.to_report_string(),
            ),
            (
                theories::volume::TITLE,
                theories::volume::HYPOTHESIS,
                self.volume.to_report_string(),
            ),
            (
                theories::protocol::TITLE,
                theories::protocol::HYPOTHESIS,
                self.protocols.to_report_string(),
            ),
            (
                theories::maturity::TITLE,
                theories::maturity::HYPOTHESIS,
                self.maturity.to_report_string(),
            ),
            (
                theories::tvl::TITLE,
                theories::tvl::HYPOTHESIS,
                self.tvl.to_report_string(),
            ),
            (
                regression::TITLE,
                regression::SUBTITLE,
                match &self.regression {
                    Some(result) => result.to_report_string(),
                    None => "⚠ Insufficient data for regression\n".to_string(),
                },
            ),
        ];

        for (title, subtitle, body) in sections {
            report.push_str(&section_header(title, subtitle));
            report.push_str(&body);
            report.push('\n');
        }

        report.push_str(&self.findings.to_report_string());
        report.push('\n');
        report.push_str(&format!("{rule}\nAnalysis complete!\n{rule}\n"));
        report
    }
}

/// Load the configured networks and analyze them
pub fn run(config: &AnalysisConfig) -> Result<AnalysisReport> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    let rows = load_all(config).context("Failed to load observation tables")?;
    analyze(&rows, config)
}

/// Analyze an already-loaded observation table
pub fn analyze(rows: &[Observation], config: &AnalysisConfig) -> Result<AnalysisReport> {
    let chains = config.networks.iter().map(|n| n.name.clone()).collect();
    let overview = DatasetOverview::from_rows(rows, chains);

    let cleaned = clean(rows);
    info!(
        "Cleaned {} of {} observations",
        cleaned.len(),
        overview.observations
    );

    let t = &config.thresholds;
    let liquidity = evaluate_liquidity(&cleaned, t).context("Liquidity theory failed")?;
    let incentives = evaluate_incentives(&cleaned, t).context("Incentive theory failed")?;
    let volume = evaluate_volume(&cleaned, t).context("Volume theory failed")?;
    let protocols = evaluate_protocols(&cleaned, t).context("Protocol theory failed")?;
    let maturity = evaluate_maturity(&cleaned, t).context("Maturity theory failed")?;
    let tvl = evaluate_tvl(&cleaned, t).context("TVL theory failed")?;

    let regression = match regression::evaluate_regression(&cleaned, t) {
        Ok(result) => Some(result),
        Err(RegressionError::InsufficientData { required, actual }) => {
            warn!(
                "Skipping regression: need {} rows, got {}",
                required, actual
            );
            None
        }
        Err(e) => return Err(e).context("Regression failed"),
    };

    let findings = KeyFindings::compose(&maturity, &protocols, regression.as_ref(), &incentives, t);

    Ok(AnalysisReport {
        overview,
        cleaned: cleaned.len(),
        liquidity,
        incentives,
        volume,
        protocols,
        maturity,
        tvl,
        regression,
        findings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::observation::fixtures::row;

    fn table() -> Vec<Observation> {
        let leads = [90, 30, 7, 1];
        let protocols = ["Lido", "Ethena"];
        (0..80)
            .map(|i| {
                let lead = leads[i % 4];
                let liquidity = 10_000.0 + (i * 37 % 101) as f64 * 100.0;
                let error = 0.05 - lead as f64 * 0.0004 + (i % 7) as f64 * 0.0001;
                row(protocols[i % 2], lead, liquidity, error)
            })
            .collect()
    }

    #[test]
    fn test_sections_in_order() {
        let report = analyze(&table(), &AnalysisConfig::default())
            .unwrap()
            .to_report_string();

        let order = [
            BANNER,
            "✓ Cleaned data: 80 observations",
            "THEORY 1:",
            "THEORY 2:",
            "THEORY 3:",
            "THEORY 4:",
            "THEORY 5:",
            "THEORY 6:",
            "MULTIVARIATE REGRESSION ANALYSIS",
            "KEY FINDINGS SUMMARY",
            "Analysis complete!",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|needle| report.find(needle).unwrap_or_else(|| panic!("missing {}", needle)))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_cleaning_feeds_every_section() {
        let mut rows = table();
        for obs in rows.iter_mut().take(8) {
            obs.liquidity_usd = None;
        }

        let report = analyze(&rows, &AnalysisConfig::default()).unwrap();
        assert_eq!(report.overview.observations, 80);
        assert_eq!(report.cleaned, 72);
        assert_eq!(report.liquidity.observations, 72);
    }

    #[test]
    fn test_time_decay_finding() {
        let report = analyze(&table(), &AnalysisConfig::default()).unwrap();
        assert!(report.maturity.error_increases_near_maturity());
        assert!(report.findings.findings[0].starts_with("1. TIME DECAY: Error increases"));
    }

    #[test]
    fn test_empty_table_skips_regression() {
        let report = analyze(&[], &AnalysisConfig::default()).unwrap();
        assert!(report.regression.is_none());
        assert!(report
            .to_report_string()
            .contains("⚠ Insufficient data for regression"));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let config = AnalysisConfig::default();
        let first = analyze(&table(), &config).unwrap().to_report_string();
        let second = analyze(&table(), &config).unwrap().to_report_string();
        assert_eq!(first, second);
    }
}
