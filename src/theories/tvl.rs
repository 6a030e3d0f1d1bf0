//! Theory 6: larger markets price more efficiently

use super::monotonic::{evaluate, MonotonicSpec};
use super::MonotonicAnalysis;
use crate::config::Thresholds;
use crate::dataset::Observation;
use crate::stats;

pub const TITLE: &str = "THEORY 6: MARKET SIZE AND EFFICIENCY";
pub const HYPOTHESIS: &str = "Hypothesis: Larger markets (high TVL) are more efficient";

fn insufficient(n: usize) -> String {
    format!("Insufficient TVL data: {} observations", n)
}

/// Rank-correlate positive `total_tvl` with `error_abs`
pub fn evaluate_tvl(
    rows: &[Observation],
    thresholds: &Thresholds,
) -> stats::Result<MonotonicAnalysis> {
    let spec = MonotonicSpec {
        predictor: "total_tvl",
        bucket_title: "TVL",
        min_observations: Some(thresholds.min_observations),
        include_std: false,
        show_strength: false,
        insufficient,
    };
    evaluate(rows, |o| o.total_tvl, &spec, thresholds)
}
