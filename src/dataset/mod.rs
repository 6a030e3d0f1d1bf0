// Observation table: loading, cleaning and the row type
//
// The table is read once, cleaned once, and then only read. Every analysis
// block builds its own filtered copy from the cleaned rows.

mod cleaner;
mod loader;
pub(crate) mod observation;

pub use cleaner::clean;
pub use loader::{load_all, load_network, LoadError};
pub use observation::{positive, Observation};

use std::collections::BTreeSet;

/// Banner facts about the loaded table
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetOverview {
    pub observations: usize,
    pub markets: usize,
    pub chains: Vec<String>,
    pub lead_times: Vec<i64>,
}

impl DatasetOverview {
    pub fn from_rows(rows: &[Observation], chains: Vec<String>) -> Self {
        let markets: BTreeSet<&str> = rows.iter().map(|o| o.market_address.as_str()).collect();
        let lead_times: BTreeSet<i64> = rows.iter().map(|o| o.lead_days).collect();

        Self {
            observations: rows.len(),
            markets: markets.len(),
            chains,
            lead_times: lead_times.into_iter().collect(),
        }
    }

    pub fn to_report_string(&self) -> String {
        let lead_times: Vec<String> = self.lead_times.iter().map(|d| d.to_string()).collect();
        format!(
            "📊 Dataset: {} observations across {} markets\n   Chains: {}\n   Lead times: [{}]\n",
            self.observations,
            self.markets,
            self.chains.join(", "),
            lead_times.join(", ")
        )
    }
}
