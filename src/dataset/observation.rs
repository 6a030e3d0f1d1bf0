//! Observation rows as exported per network
//!
//! One row per (market, observation time, lead time). Numeric market-state
//! columns are optional because the exporter leaves them blank when the
//! history point did not carry the metric.

use serde::Deserialize;

/// A single pricing-error observation
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Observation {
    pub chain_id: u64,

    /// Network name attached at load time (not present in the CSV)
    #[serde(skip)]
    pub chain_name: String,

    #[serde(default)]
    pub protocol: String,

    #[serde(default)]
    pub market_address: String,

    /// Days before maturity at observation time
    pub lead_days: i64,

    #[serde(default)]
    pub liquidity_usd: Option<f64>,
    #[serde(default)]
    pub trading_volume: Option<f64>,
    #[serde(default)]
    pub total_tvl: Option<f64>,

    #[serde(default)]
    pub pendle_incentive_apy: Option<f64>,
    #[serde(default)]
    pub lp_reward_apy: Option<f64>,
    #[serde(default)]
    pub underlying_reward_apy: Option<f64>,

    /// Absolute pricing error
    #[serde(default)]
    pub error_abs: Option<f64>,
    /// Signed pricing error
    #[serde(default)]
    pub error_signed: Option<f64>,
}

impl Observation {
    /// Sum of the three incentive APYs, missing treated as zero
    pub fn total_incentive_apy(&self) -> f64 {
        [
            self.pendle_incentive_apy,
            self.lp_reward_apy,
            self.underlying_reward_apy,
        ]
        .iter()
        .map(|v| v.unwrap_or(0.0))
        .sum()
    }

    /// True when the row carries a positive PENDLE incentive
    pub fn has_pendle_incentive(&self) -> bool {
        positive(self.pendle_incentive_apy).is_some()
    }

    /// True when the row carries a positive LP reward
    pub fn has_lp_reward(&self) -> bool {
        positive(self.lp_reward_apy).is_some()
    }

    /// Absolute error, NaN if absent (cleaned rows always carry it)
    pub fn error(&self) -> f64 {
        self.error_abs.unwrap_or(f64::NAN)
    }
}

/// Keep a value only when it is present and strictly positive
pub fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}
