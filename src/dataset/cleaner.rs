//! Row filtering shared by every analysis block

use crate::dataset::Observation;
use tracing::info;

/// Keep only rows carrying both `error_abs` and `liquidity_usd`
///
/// No other validation is performed. Out-of-range values and duplicate rows
/// pass through untouched.
pub fn clean(rows: &[Observation]) -> Vec<Observation> {
    let cleaned: Vec<Observation> = rows
        .iter()
        .filter(|obs| obs.error_abs.is_some() && obs.liquidity_usd.is_some())
        .cloned()
        .collect();

    info!(
        "Cleaning kept {} of {} rows ({} dropped)",
        cleaned.len(),
        rows.len(),
        rows.len() - cleaned.len()
    );
    cleaned
}
