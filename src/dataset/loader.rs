//! Per-network CSV loading
//!
//! Reads `chain<id>.csv` for every configured network, tags each row with the
//! network name and concatenates the tables in configuration order. A missing
//! file aborts the load; there is no partial result.

use crate::config::{AnalysisConfig, Network};
use crate::dataset::Observation;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while reading observation tables
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Observation file not found: {path}")]
    MissingFile { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Load one network's table and tag its rows
pub fn load_network(path: &Path, network: &Network) -> Result<Vec<Observation>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let mut reader = csv::Reader::from_reader(file);
    let mut rows = Vec::new();

    for record in reader.deserialize::<Observation>() {
        let mut obs = record.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        obs.chain_name = network.name.clone();
        rows.push(obs);
    }

    debug!(
        "Loaded {} rows for {} from {}",
        rows.len(),
        network.name,
        path.display()
    );
    Ok(rows)
}

/// Load and concatenate every configured network
pub fn load_all(config: &AnalysisConfig) -> Result<Vec<Observation>, LoadError> {
    let mut table = Vec::new();
    for network in &config.networks {
        let path = config.network_path(network);
        table.extend(load_network(&path, network)?);
    }

    info!(
        "Loaded {} observations across {} networks",
        table.len(),
        config.networks.len()
    );
    Ok(table)
}
