// Feature matrix for the multivariate error model
//
// Rows: cleaned observations with positive liquidity.
// Always: log1p(liquidity_usd), lead_days, total_incentive_apy.
// Optional: log1p(trading_volume), log1p(total_tvl), each only when strictly
// more than `optional_feature_coverage` of the rows carry the field. Missing
// values of an included optional column are filled with zero before the log.

use crate::config::Thresholds;
use crate::dataset::{positive, Observation};
use tracing::debug;

pub const LOG_LIQUIDITY: &str = "log_liquidity";
pub const LEAD_DAYS: &str = "lead_days";
pub const TOTAL_INCENTIVE_APY: &str = "total_incentive_apy";
pub const LOG_VOLUME: &str = "log_volume";
pub const LOG_TVL: &str = "log_tvl";

/// Design matrix plus target, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    pub names: Vec<&'static str>,
    /// `n_rows * n_features` values, one row per observation
    pub data: Vec<f64>,
    /// error_abs per row
    pub target: Vec<f64>,
}

impl FeatureSet {
    pub fn n_rows(&self) -> usize {
        self.target.len()
    }

    pub fn n_features(&self) -> usize {
        self.names.len()
    }

    /// Values of one feature column
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.names.iter().position(|n| *n == name)?;
        Some(
            self.data
                .chunks(self.n_features())
                .map(|row| row[idx])
                .collect(),
        )
    }
}

fn covered(rows: &[&Observation], field: impl Fn(&Observation) -> Option<f64>, share: f64) -> bool {
    let populated = rows.iter().filter(|o| field(o).is_some()).count();
    populated as f64 > rows.len() as f64 * share
}

/// Build the regression design matrix from cleaned rows
pub fn build_features(rows: &[Observation], thresholds: &Thresholds) -> FeatureSet {
    let rows: Vec<&Observation> = rows
        .iter()
        .filter(|o| positive(o.liquidity_usd).is_some())
        .collect();

    let share = thresholds.optional_feature_coverage;
    let with_volume = covered(&rows, |o| o.trading_volume, share);
    let with_tvl = covered(&rows, |o| o.total_tvl, share);

    let mut names = vec![LOG_LIQUIDITY, LEAD_DAYS, TOTAL_INCENTIVE_APY];
    if with_volume {
        names.push(LOG_VOLUME);
    }
    if with_tvl {
        names.push(LOG_TVL);
    }
    debug!("Regression features: {:?} over {} rows", names, rows.len());

    let mut data = Vec::with_capacity(rows.len() * names.len());
    let mut target = Vec::with_capacity(rows.len());

    for obs in &rows {
        data.push(obs.liquidity_usd.unwrap_or(0.0).ln_1p());
        data.push(obs.lead_days as f64);
        data.push(obs.total_incentive_apy());
        if with_volume {
            data.push(obs.trading_volume.unwrap_or(0.0).ln_1p());
        }
        if with_tvl {
            data.push(obs.total_tvl.unwrap_or(0.0).ln_1p());
        }
        target.push(obs.error());
    }

    FeatureSet {
        names,
        data,
        target,
    }
}
