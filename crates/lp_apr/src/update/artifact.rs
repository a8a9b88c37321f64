//! Per-network APR artifact on disk.

use crate::chain::NetworkId;
use crate::compute::AprMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `<dir>/<chain id>.json`
pub fn artifact_path(dir: &Path, network: NetworkId) -> PathBuf {
    dir.join(format!("{}.json", network.chain_id()))
}

/// Pretty JSON (2-space indent) with a trailing newline.
pub fn render_artifact(aprs: &AprMap) -> Result<String, ArtifactError> {
    Ok(format!("{}\n", serde_json::to_string_pretty(aprs)?))
}

/// Create `dir` if needed and overwrite the network's artifact. Not atomic.
pub async fn write_artifact(
    dir: &Path,
    network: NetworkId,
    aprs: &AprMap,
) -> Result<PathBuf, ArtifactError> {
    let body = render_artifact(aprs)?;
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| ArtifactError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    let path = artifact_path(dir, network);
    tokio::fs::write(&path, body)
        .await
        .map_err(|source| ArtifactError::Io {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}
