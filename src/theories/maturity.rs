//! Theory 5: error grows as maturity approaches, as volume and liquidity dry up

use super::correlation_lines;
use crate::config::Thresholds;
use crate::dataset::{positive, Observation};
use crate::stats::{self, mean, spearman, CorrelationTest, GroupSummary, StatsError};
use std::collections::BTreeMap;
use tracing::warn;

pub const TITLE: &str = "THEORY 5: TIME-TO-MATURITY EFFECTS";
pub const HYPOTHESIS: &str =
    "Hypothesis: Error increases closer to maturity due to volume/liquidity drop";

/// Metrics for one lead-time horizon
#[derive(Debug, Clone, PartialEq)]
pub struct LeadTimeRow {
    pub lead_days: i64,
    pub mae: f64,
    pub median_ae: f64,
    pub avg_liquidity: f64,
    /// Mean over rows that report volume; NaN when none do
    pub avg_volume: f64,
    pub observations: usize,
}

/// Result of the time-to-maturity theory
#[derive(Debug, Clone, PartialEq)]
pub struct MaturityAnalysis {
    /// Longest lead time first
    pub table: Vec<LeadTimeRow>,
    pub lead_error: Option<CorrelationTest>,
    pub lead_liquidity: Option<CorrelationTest>,
    pub lead_volume: Option<CorrelationTest>,
}

impl MaturityAnalysis {
    /// Negative lead/error correlation means error grows as lead time shrinks
    pub fn error_increases_near_maturity(&self) -> bool {
        self.lead_error.is_some_and(|t| t.statistic < 0.0)
    }

    pub fn to_report_string(&self) -> String {
        let mut report = String::from("Metrics by Lead Time:\n");
        report.push_str(&format!(
            "  {:>9} {:>10} {:>10} {:>16} {:>16} {:>8}\n",
            "lead_days", "MAE", "Median_AE", "Avg_Liquidity", "Avg_Volume", "N_Obs"
        ));
        for row in &self.table {
            report.push_str(&format!(
                "  {:>9} {:>10.6} {:>10.6} {:>16.2} {:>16.2} {:>8}\n",
                row.lead_days,
                row.mae,
                row.median_ae,
                row.avg_liquidity,
                row.avg_volume,
                row.observations
            ));
        }
        report.push('\n');

        match &self.lead_error {
            Some(test) => {
                report.push_str(&correlation_lines("lead_days vs error_abs", test, true));
            }
            None => report.push_str("⚠ Insufficient data for lead_days vs error_abs\n"),
        }
        report.push('\n');

        if let Some(test) = &self.lead_liquidity {
            report.push_str(&correlation_lines("lead_days vs liquidity_usd", test, true));
            report.push('\n');
        }

        if let Some(test) = &self.lead_volume {
            report.push_str(&correlation_lines("lead_days vs trading_volume", test, false));
            report.push('\n');
        }

        report.push_str(&format!(
            "Result: Error {} as maturity approaches\n",
            if self.error_increases_near_maturity() {
                "INCREASES"
            } else {
                "DECREASES"
            }
        ));
        let liquidity_drops = self.lead_liquidity.is_some_and(|t| t.statistic > 0.0);
        report.push_str(&format!(
            "        Liquidity {} closer to maturity\n",
            if liquidity_drops {
                "DECREASES"
            } else {
                "INCREASES"
            }
        ));
        report
    }
}

/// Spearman that turns a too-small sample into `None`
fn optional_spearman(x: &[f64], y: &[f64], what: &str) -> stats::Result<Option<CorrelationTest>> {
    match spearman(x, y) {
        Ok(test) => Ok(Some(test)),
        Err(StatsError::InsufficientData { actual, .. }) => {
            warn!("Skipping {} correlation: {} observations", what, actual);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Profile error by lead time and correlate lead time with error, liquidity
/// and volume
pub fn evaluate_maturity(
    rows: &[Observation],
    thresholds: &Thresholds,
) -> stats::Result<MaturityAnalysis> {
    let mut by_lead: BTreeMap<i64, Vec<&Observation>> = BTreeMap::new();
    for obs in rows {
        by_lead.entry(obs.lead_days).or_default().push(obs);
    }

    let mut table = Vec::with_capacity(by_lead.len());
    for (lead_days, members) in by_lead.iter().rev() {
        let errors: Vec<f64> = members.iter().map(|o| o.error()).collect();
        let liquidity: Vec<f64> = members.iter().filter_map(|o| o.liquidity_usd).collect();
        let volume: Vec<f64> = members.iter().filter_map(|o| o.trading_volume).collect();
        let summary = GroupSummary::from_values(&errors)?;

        table.push(LeadTimeRow {
            lead_days: *lead_days,
            mae: summary.mean,
            median_ae: summary.median,
            avg_liquidity: mean(&liquidity),
            avg_volume: mean(&volume),
            observations: members.len(),
        });
    }

    let (lead, errors): (Vec<f64>, Vec<f64>) = rows
        .iter()
        .map(|o| (o.lead_days as f64, o.error()))
        .unzip();
    let lead_error = optional_spearman(&lead, &errors, "lead_days vs error_abs")?;

    let (lead, liquidity): (Vec<f64>, Vec<f64>) = rows
        .iter()
        .filter_map(|o| positive(o.liquidity_usd).map(|l| (o.lead_days as f64, l)))
        .unzip();
    let lead_liquidity = optional_spearman(&lead, &liquidity, "lead_days vs liquidity_usd")?;

    let (lead, volume): (Vec<f64>, Vec<f64>) = rows
        .iter()
        .filter_map(|o| positive(o.trading_volume).map(|v| (o.lead_days as f64, v)))
        .unzip();
    let lead_volume = if lead.len() > thresholds.min_observations {
        optional_spearman(&lead, &volume, "lead_days vs trading_volume")?
    } else {
        None
    };

    Ok(MaturityAnalysis {
        table,
        lead_error,
        lead_liquidity,
        lead_volume,
    })
}
