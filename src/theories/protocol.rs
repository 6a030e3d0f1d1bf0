//! Theory 4: protocol-specific pricing dynamics
//!
//! Per-protocol error table, then a one-way ANOVA across the protocols that
//! have enough observations.

use super::Verdict;
use crate::config::Thresholds;
use crate::dataset::Observation;
use crate::stats::{self, mean, one_way_anova, significance_stars, AnovaTest, GroupSummary};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

pub const TITLE: &str = "THEORY 4: PROTOCOL-SPECIFIC PATTERNS";
pub const HYPOTHESIS: &str = "Hypothesis: Some protocols have different pricing dynamics";

/// One protocol's error profile
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolRow {
    pub protocol: String,
    /// Mean absolute error
    pub mae: f64,
    pub median_ae: f64,
    pub std_ae: f64,
    pub mean_signed_error: f64,
    pub markets: usize,
    pub observations: usize,
}

/// Result of the protocol theory
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolAnalysis {
    /// Protocols with enough observations, best (lowest MAE) first
    pub table: Vec<ProtocolRow>,
    pub min_report_obs: usize,
    pub anova: Option<AnovaTest>,
    pub verdict: Verdict,
}

impl ProtocolAnalysis {
    pub fn best(&self) -> Option<&ProtocolRow> {
        self.table.first()
    }

    pub fn worst(&self) -> Option<&ProtocolRow> {
        self.table.last()
    }

    pub fn to_report_string(&self) -> String {
        let mut report = format!(
            "Protocol Performance (min {} observations):\n",
            self.min_report_obs
        );
        report.push_str(&format!(
            "  {:<20} {:>10} {:>10} {:>10} {:>18} {:>10} {:>8}\n",
            "protocol", "MAE", "Median_AE", "Std_AE", "Mean_Signed_Error", "N_Markets", "N_Obs"
        ));
        for row in &self.table {
            report.push_str(&format!(
                "  {:<20} {:>10.6} {:>10.6} {:>10.6} {:>18.6} {:>10} {:>8}\n",
                row.protocol,
                row.mae,
                row.median_ae,
                row.std_ae,
                row.mean_signed_error,
                row.markets,
                row.observations
            ));
        }
        report.push('\n');

        match (&self.anova, &self.verdict) {
            (Some(anova), verdict) => {
                report.push_str(&format!("ANOVA F-statistic: {:.4}\n", anova.f_statistic));
                report.push_str(&format!(
                    "P-value: {:.6} {}\n\n",
                    anova.pvalue,
                    significance_stars(anova.pvalue)
                ));
                let suffix = if verdict.is_confirmed() {
                    " - Significant protocol differences"
                } else {
                    " - No significant differences"
                };
                report.push_str(&format!("Result: {}{}\n", verdict.label(), suffix));
            }
            (None, verdict) => {
                report.push_str(&format!("{}\n", verdict.label()));
            }
        }
        report
    }
}

/// Round to six decimals, the precision the protocol table is ranked at
fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Profile each protocol and test for differences between them
pub fn evaluate_protocols(
    rows: &[Observation],
    thresholds: &Thresholds,
) -> stats::Result<ProtocolAnalysis> {
    // Rows without a protocol name belong to no group
    let mut groups: BTreeMap<&str, Vec<&Observation>> = BTreeMap::new();
    for obs in rows.iter().filter(|o| !o.protocol.trim().is_empty()) {
        groups.entry(obs.protocol.as_str()).or_default().push(obs);
    }

    let mut table = Vec::new();
    for (protocol, members) in &groups {
        if members.len() < thresholds.protocol_report_min_obs {
            continue;
        }

        let errors: Vec<f64> = members.iter().map(|o| o.error()).collect();
        let signed: Vec<f64> = members.iter().filter_map(|o| o.error_signed).collect();
        let markets: BTreeSet<&str> = members.iter().map(|o| o.market_address.as_str()).collect();
        let summary = GroupSummary::from_values(&errors)?;

        table.push(ProtocolRow {
            protocol: protocol.to_string(),
            mae: round6(summary.mean),
            median_ae: round6(summary.median),
            std_ae: round6(summary.std),
            mean_signed_error: round6(mean(&signed)),
            markets: markets.len(),
            observations: members.len(),
        });
    }

    // Stable sort keeps alphabetical order among equal MAEs
    table.sort_by(|a, b| a.mae.total_cmp(&b.mae));

    let eligible: Vec<Vec<f64>> = table
        .iter()
        .filter(|row| row.observations >= thresholds.anova_min_obs)
        .map(|row| {
            groups[row.protocol.as_str()]
                .iter()
                .map(|o| o.error())
                .collect()
        })
        .collect();

    let (anova, verdict) = if eligible.len() >= thresholds.anova_min_groups {
        let anova = one_way_anova(&eligible)?;
        let verdict = Verdict::from_outcome(anova.pvalue < thresholds.significance_level);
        (Some(anova), verdict)
    } else {
        warn!(
            "Skipping ANOVA: {} protocols with >= {} observations",
            eligible.len(),
            thresholds.anova_min_obs
        );
        (
            None,
            Verdict::InsufficientData {
                reason: "Insufficient data for ANOVA test across protocols".to_string(),
            },
        )
    };

    Ok(ProtocolAnalysis {
        table,
        min_report_obs: thresholds.protocol_report_min_obs,
        anova,
        verdict,
    })
}
