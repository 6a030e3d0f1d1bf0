// Six independent theory evaluators over the cleaned observation table
//
// Each evaluator builds its own filtered copy of the rows, runs one test,
// and yields a verdict. A block that lacks data reports InsufficientData and
// the run continues.

pub mod incentive;
pub mod liquidity;
pub mod maturity;
mod monotonic;
pub mod protocol;
pub mod tvl;
pub mod volume;

pub use incentive::{evaluate_incentives, IncentiveAnalysis, IncentiveOutcome};
pub use liquidity::evaluate_liquidity;
pub use maturity::{evaluate_maturity, LeadTimeRow, MaturityAnalysis};
pub use monotonic::MonotonicAnalysis;
pub use protocol::{evaluate_protocols, ProtocolAnalysis, ProtocolRow};
pub use tvl::evaluate_tvl;
pub use volume::evaluate_volume;

use crate::stats::{significance_stars, CorrelationTest};

/// Outcome of a single theory test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Test ran and met the fixed threshold
    Confirmed,

    /// Test ran and did not meet the threshold
    Rejected,

    /// Test skipped for lack of data
    InsufficientData { reason: String },
}

impl Verdict {
    pub fn from_outcome(confirmed: bool) -> Self {
        if confirmed {
            Verdict::Confirmed
        } else {
            Verdict::Rejected
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Verdict::Confirmed)
    }

    /// Single-line rendering used after "Result: "
    pub fn label(&self) -> String {
        match self {
            Verdict::Confirmed => "✓ CONFIRMED".to_string(),
            Verdict::Rejected => "✗ REJECTED".to_string(),
            Verdict::InsufficientData { reason } => format!("⚠ {}", reason),
        }
    }
}

/// Banner that opens every analysis section
pub fn section_header(title: &str, subtitle: &str) -> String {
    let rule = "=".repeat(80);
    format!("{rule}\n{title}\n{rule}\n{subtitle}\n\n")
}

/// "Spearman correlation (x vs y): r" / "P-value: p stars" pair
pub(crate) fn correlation_lines(label: &str, test: &CorrelationTest, stars: bool) -> String {
    let mut out = format!("{} ({}): {:.4}\n", label_prefix(label), label, test.statistic);
    if stars {
        out.push_str(&format!(
            "P-value: {:.6} {}\n",
            test.pvalue,
            significance_stars(test.pvalue)
        ));
    } else {
        out.push_str(&format!("P-value: {:.6}\n", test.pvalue));
    }
    out
}

fn label_prefix(label: &str) -> &'static str {
    if label.starts_with("lead_days") || label.starts_with("total_incentive") {
        "Correlation"
    } else {
        "Spearman correlation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_labels() {
        assert_eq!(Verdict::Confirmed.label(), "✓ CONFIRMED");
        assert_eq!(Verdict::Rejected.label(), "✗ REJECTED");
        let skipped = Verdict::InsufficientData {
            reason: "Insufficient TVL data: 4 observations".to_string(),
        };
        assert_eq!(skipped.label(), "⚠ Insufficient TVL data: 4 observations");
        assert!(!skipped.is_confirmed());
    }

    #[test]
    fn test_section_header() {
        let header = section_header("THEORY 1: X", "Hypothesis: Y");
        assert!(header.starts_with(&"=".repeat(80)));
        assert!(header.contains("THEORY 1: X\n"));
        assert!(header.ends_with("Hypothesis: Y\n\n"));
    }

    #[test]
    fn test_correlation_lines_prefix() {
        let test = CorrelationTest {
            statistic: -0.25,
            pvalue: 0.0001,
            n: 500,
        };
        let lines = correlation_lines("liquidity_usd vs error_abs", &test, true);
        assert!(lines.starts_with("Spearman correlation (liquidity_usd vs error_abs): -0.2500"));
        assert!(lines.contains("P-value: 0.000100 ***"));

        let lines = correlation_lines("lead_days vs error_abs", &test, false);
        assert!(lines.starts_with("Correlation (lead_days vs error_abs)"));
        assert!(!lines.contains("***"));
    }
}
