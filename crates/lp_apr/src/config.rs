//! Job settings. Defaults are the job's built-in constants; a JSON file may override them.
//!
//! Load from: env `LP_APR_CONFIG_PATH`, or `./config/lp_apr.json`, or defaults.

use crate::chain::{FetchConfig, NetworkId, RetryPolicy, MAX_RETRIES, RETRY_DELAY_MS};
use crate::update::{distinct_networks, UpdateConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_OUTPUT_DIR: &str = "apps/web/src/config/constants/lpAprs";
const DEFAULT_FARMS_DIR: &str = "packages/farms/constants";

pub const CONFIG_PATH_ENV: &str = "LP_APR_CONFIG_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
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

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub explorer_api_url: String,
    /// Chain ids to update.
    pub networks: Vec<NetworkId>,
    /// Relative paths resolve against the working directory.
    pub output_dir: PathBuf,
    pub farms_dir: PathBuf,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchConfig::default();
        Self {
            explorer_api_url: fetch.base_url,
            networks: NetworkId::ALL.to_vec(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            farms_dir: PathBuf::from(DEFAULT_FARMS_DIR),
            max_retries: MAX_RETRIES,
            retry_delay_ms: RETRY_DELAY_MS,
            request_timeout_secs: fetch.timeout.as_secs(),
        }
    }
}

impl AppConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Env `LP_APR_CONFIG_PATH`, then `./config/lp_apr.json`, then defaults.
    /// A file that exists but does not parse is an error.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::load_from_path(Path::new(&path));
        }
        let candidate = Path::new("./config/lp_apr.json");
        if candidate.exists() {
            return Self::load_from_path(candidate);
        }
        Ok(Self::default())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            base_url: self.explorer_api_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn update_config(&self) -> UpdateConfig {
        UpdateConfig {
            networks: distinct_networks(&self.networks),
            output_dir: self.output_dir.clone(),
            retry: self.retry_policy(),
        }
    }
}
