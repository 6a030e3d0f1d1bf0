//! Theory 3: heavier trading, more sophisticated pricing, lower error

use super::monotonic::{evaluate, MonotonicSpec};
use super::MonotonicAnalysis;
use crate::config::Thresholds;
use crate::dataset::Observation;
use crate::stats;

pub const TITLE: &str = "THEORY 3: VOLUME AND PRICE DISCOVERY QUALITY";
pub const HYPOTHESIS: &str = "Hypothesis: High volume → Sophisticated traders → Lower error";

fn insufficient(n: usize) -> String {
    format!(
        "Insufficient volume data: {} observations with trading volume",
        n
    )
}

/// Rank-correlate positive `trading_volume` with `error_abs`
///
/// Needs more than `thresholds.min_observations` rows with volume.
pub fn evaluate_volume(
    rows: &[Observation],
    thresholds: &Thresholds,
) -> stats::Result<MonotonicAnalysis> {
    let spec = MonotonicSpec {
        predictor: "trading_volume",
        bucket_title: "Volume",
        min_observations: Some(thresholds.min_observations),
        include_std: false,
        show_strength: false,
        insufficient,
    };
    evaluate(rows, |o| o.trading_volume, &spec, thresholds)
}
