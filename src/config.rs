// Configuration for the pricing-error analysis
//
// Every verdict threshold lives here. The defaults are the fixed cutoffs of
// the pricing-error study and are kept literally.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A blockchain network whose observation table is loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    /// Display name attached to every row (e.g., "Ethereum")
    pub name: String,
    /// Numeric chain id, used to derive the CSV file name
    pub chain_id: u64,
}

impl Network {
    pub fn new(name: &str, chain_id: u64) -> Self {
        Self {
            name: name.to_string(),
            chain_id,
        }
    }

    /// File name of this network's observation table (`chain<id>.csv`)
    pub fn file_name(&self) -> String {
        format!("chain{}.csv", self.chain_id)
    }
}

/// Fixed cutoffs for verdicts and sample-size guards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// p-value below which a test counts as significant
    pub significance_level: f64,

    /// Correlation must be below `-min_correlation` to confirm a
    /// "more X, less error" theory
    pub min_correlation: f64,

    /// Lead-time correlation magnitude required to report time decay
    pub time_decay_correlation: f64,

    /// Mean-difference magnitude required to report the incentive effect
    pub incentive_effect_min: f64,

    /// The t-test runs only when more than this many rows carry incentives
    pub incentive_min_group: usize,

    /// Volume and TVL theories need more than this many observations
    pub min_observations: usize,

    /// Protocols with fewer observations are left out of the protocol table
    pub protocol_report_min_obs: usize,

    /// Per-protocol observations required to enter the ANOVA
    pub anova_min_obs: usize,

    /// Number of qualifying protocols required to run the ANOVA
    pub anova_min_groups: usize,

    /// Optional regression features need strictly more than this share of
    /// rows populated
    pub optional_feature_coverage: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            min_correlation: 0.1,
            time_decay_correlation: 0.2,
            incentive_effect_min: 0.001,
            incentive_min_group: 30,
            min_observations: 100,
            protocol_report_min_obs: 10,
            anova_min_obs: 30,
            anova_min_groups: 3,
            optional_feature_coverage: 0.5,
        }
    }
}

/// Top-level analysis configuration
///
/// # Example
/// ```
/// use ytaudit::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.networks.len(), 4);
/// assert_eq!(config.thresholds.significance_level, 0.05);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory holding `chain<id>.csv` files
    pub data_dir: PathBuf,

    /// Networks to load, in output order
    pub networks: Vec<Network>,

    pub thresholds: Thresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            networks: vec![
                Network::new("Ethereum", 1),
                Network::new("Arbitrum", 42161),
                Network::new("BSC", 56),
                Network::new("Base", 8453),
            ],
            thresholds: Thresholds::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a TOML file
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    /// Path of the observation table for `network`
    pub fn network_path(&self, network: &Network) -> PathBuf {
        self.data_dir.join(network.file_name())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.networks.is_empty() {
            return Err("at least one network must be configured".to_string());
        }

        let t = &self.thresholds;
        if !(0.0..=1.0).contains(&t.significance_level) {
            return Err(format!(
                "significance_level must be in [0, 1], got {}",
                t.significance_level
            ));
        }

        for (name, value) in [
            ("min_correlation", t.min_correlation),
            ("time_decay_correlation", t.time_decay_correlation),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be in [0, 1], got {}", name, value));
            }
        }

        if t.incentive_effect_min < 0.0 {
            return Err(format!(
                "incentive_effect_min must be non-negative, got {}",
                t.incentive_effect_min
            ));
        }

        if !(0.0..1.0).contains(&t.optional_feature_coverage) {
            return Err(format!(
                "optional_feature_coverage must be in [0, 1), got {}",
                t.optional_feature_coverage
            ));
        }

        if t.anova_min_groups < 2 {
            return Err(format!(
                "anova_min_groups must be >= 2, got {}",
                t.anova_min_groups
            ));
        }

        Ok(())
    }
}
