//! CLI argument parsing for ytaudit

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ytaudit")]
#[command(version)]
#[command(
    about = "Statistical audit of Pendle YT pricing error across chains",
    long_about = None
)]
pub struct Cli {
    /// Directory holding chain<id>.csv observation tables (overrides config)
    #[arg(short = 'd', long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// TOML file with networks and decision thresholds
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
