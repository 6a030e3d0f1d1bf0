//! Theory 1: deeper liquidity, better price discovery, lower error

use super::monotonic::{evaluate, MonotonicSpec};
use super::MonotonicAnalysis;
use crate::config::Thresholds;
use crate::dataset::Observation;
use crate::stats;

pub const TITLE: &str = "THEORY 1: LIQUIDITY DEPTH VS PRICING ACCURACY";
pub const HYPOTHESIS: &str = "Hypothesis: Higher liquidity → Better price discovery → Lower error";

fn insufficient(n: usize) -> String {
    format!("Insufficient liquidity data: {} observations", n)
}

/// Rank-correlate positive `liquidity_usd` with `error_abs`
pub fn evaluate_liquidity(
    rows: &[Observation],
    thresholds: &Thresholds,
) -> stats::Result<MonotonicAnalysis> {
    let spec = MonotonicSpec {
        predictor: "liquidity_usd",
        bucket_title: "Liquidity",
        min_observations: None,
        include_std: true,
        show_strength: true,
        insufficient,
    };
    evaluate(rows, |o| o.liquidity_usd, &spec, thresholds)
}
