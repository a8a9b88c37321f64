//! Farm configuration records and the per-network loader registry.
//!
//! Each network maps to one loader. The default registry reads
//! `<farms_dir>/<chain name>.json`, a JSON array of farm records.

use crate::chain::NetworkId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarmConfigError {
    #[error("no farm config registered for chain {0}")]
    Unregistered(NetworkId),
    #[error("io {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One farm entry. Unknown fields are carried through untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmConfig {
    /// Pool id in the farming contract; farms without one are not served.
    #[serde(default)]
    pub pid: Option<u32>,
    #[serde(default)]
    pub lp_symbol: String,
    #[serde(default)]
    pub lp_address: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

pub type FarmConfigLoader =
    Arc<dyn Fn() -> Result<Vec<FarmConfig>, FarmConfigError> + Send + Sync>;

/// Static table from network to the function that loads its farm list.
#[derive(Clone, Default)]
pub struct FarmConfigRegistry {
    loaders: HashMap<NetworkId, FarmConfigLoader>,
}

impl FarmConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the loader for `network`.
    pub fn with_loader(
        mut self,
        network: NetworkId,
        loader: impl Fn() -> Result<Vec<FarmConfig>, FarmConfigError> + Send + Sync + 'static,
    ) -> Self {
        self.loaders.insert(network, Arc::new(loader));
        self
    }

    /// File-backed registry for every known network under `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        NetworkId::ALL.into_iter().fold(Self::new(), |reg, network| {
            let path = dir.as_ref().join(format!("{}.json", network.chain_name()));
            reg.with_loader(network, move || load_farm_file(&path))
        })
    }

    pub fn is_registered(&self, network: NetworkId) -> bool {
        self.loaders.contains_key(&network)
    }

    /// Run the loader for `network`. Returns the raw, unfiltered list.
    pub fn load(&self, network: NetworkId) -> Result<Vec<FarmConfig>, FarmConfigError> {
        let loader = self
            .loaders
            .get(&network)
            .ok_or(FarmConfigError::Unregistered(network))?;
        loader()
    }
}

/// Read a JSON array of farm records from `path`.
pub fn load_farm_file(path: &Path) -> Result<Vec<FarmConfig>, FarmConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| FarmConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| FarmConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
