//! ytaudit: statistical audit of Pendle yield-token pricing error
//!
//! Loads per-chain observation tables, tests six hypotheses about what
//! drives the gap between predicted and realized YT prices, fits a
//! standardized multivariate regression, and prints a key-findings summary.
//!
//! ```no_run
//! use ytaudit::{config::AnalysisConfig, pipeline};
//!
//! let config = AnalysisConfig::default();
//! let report = pipeline::run(&config)?;
//! print!("{}", report.to_report_string());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod dataset;
pub mod pipeline;
pub mod regression;
pub mod stats;
pub mod summary;
pub mod theories;
