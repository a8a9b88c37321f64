//! Multi-network update: aggregate every network concurrently and persist each result.

mod artifact;

pub use artifact::{artifact_path, render_artifact, write_artifact, ArtifactError};

use crate::chain::{AprSource, NetworkId, RetryPolicy};
use crate::compute::{aggregate_network, AggregateError};
use futures::future::join_all;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("aggregate: {0}")]
    Aggregate(#[from] AggregateError),
    #[error("artifact: {0}")]
    Artifact(#[from] ArtifactError),
}

#[derive(Clone, Debug)]
pub struct UpdateConfig {
    pub networks: Vec<NetworkId>,
    pub output_dir: PathBuf,
    pub retry: RetryPolicy,
}

/// Result for one network. A failed network leaves any previous artifact untouched.
#[derive(Debug)]
pub struct NetworkOutcome {
    pub network: NetworkId,
    /// Written artifact path and number of pools in it.
    pub result: Result<(PathBuf, usize), UpdateError>,
}

impl NetworkOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregate one network and write its artifact.
pub async fn update_network(
    source: &dyn AprSource,
    network: NetworkId,
    output_dir: &Path,
    retry: &RetryPolicy,
) -> Result<(PathBuf, usize), UpdateError> {
    let aprs = aggregate_network(source, network, retry).await?;
    debug!(chain_id = network.chain_id(), pools = aprs.len(), "writing artifact");
    let path = write_artifact(output_dir, network, &aprs).await?;
    Ok((path, aprs.len()))
}

/// Update every configured network concurrently. A failing network is logged and
/// reported in its outcome; it never cancels the others. Outcomes follow `config.networks` order,
/// one per distinct network.
pub async fn update_lp_aprs(source: &dyn AprSource, config: &UpdateConfig) -> Vec<NetworkOutcome> {
    let tasks = distinct_networks(&config.networks).into_iter().map(|network| async move {
        let result = update_network(source, network, &config.output_dir, &config.retry).await;
        match &result {
            Ok((path, pools)) => info!(
                chain_id = network.chain_id(),
                pools,
                path = %path.display(),
                "lp aprs updated"
            ),
            Err(e) => error!(
                chain_id = network.chain_id(),
                error = %e,
                "error updating lp aprs"
            ),
        }
        NetworkOutcome { network, result }
    });
    join_all(tasks).await
}

/// First occurrence of each network, in order. Two tasks must never write the same artifact.
pub fn distinct_networks(networks: &[NetworkId]) -> Vec<NetworkId> {
    let mut seen = HashSet::new();
    networks.iter().copied().filter(|n| seen.insert(*n)).collect()
}
