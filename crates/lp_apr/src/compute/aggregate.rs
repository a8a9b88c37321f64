//! Per-network APR aggregation: standard and stable datasets, merged.

use crate::chain::{fetch_with_retry, AprSource, FetchError, NetworkId, PoolCategory, RetryPolicy};
use crate::compute::normalize::{normalize_aprs, AprMap};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
#[error("{category} pools on chain {network}: {source}")]
pub struct AggregateError {
    pub network: NetworkId,
    pub category: PoolCategory,
    #[source]
    pub source: FetchError,
}

/// Merge normalized maps in order; a later map wins on address collision.
pub fn merge_aprs(maps: impl IntoIterator<Item = AprMap>) -> AprMap {
    let mut merged = AprMap::new();
    for map in maps {
        merged.extend(map);
    }
    merged
}

/// Fetch both pool categories for `network` concurrently (each with retries),
/// normalize, and merge with stable pools taking precedence.
/// Fails if either dataset still fails after its retries.
pub async fn aggregate_network(
    source: &dyn AprSource,
    network: NetworkId,
    policy: &RetryPolicy,
) -> Result<AprMap, AggregateError> {
    debug!(chain_id = network.chain_id(), "fetching standard and stable averages");
    let standard = async {
        fetch_with_retry(policy, || source.standard_pool_averages(network))
            .await
            .map_err(|e| AggregateError {
                network,
                category: PoolCategory::Standard,
                source: e,
            })
    };
    let stable = async {
        fetch_with_retry(policy, || source.stable_pool_averages(network))
            .await
            .map_err(|e| AggregateError {
                network,
                category: PoolCategory::Stable,
                source: e,
            })
    };
    let (standard, stable) = futures::try_join!(standard, stable)?;
    debug!(
        chain_id = network.chain_id(),
        standard = standard.len(),
        stable = stable.len(),
        "merging"
    );
    Ok(merge_aprs([normalize_aprs(&standard), normalize_aprs(&stable)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, f64)]) -> AprMap {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn stable_overwrites_standard() {
        let merged = merge_aprs([map(&[("A", 1.0)]), map(&[("A", 2.0), ("B", 3.0)])]);
        assert_eq!(merged, map(&[("A", 2.0), ("B", 3.0)]));
    }

    #[test]
    fn addresses_are_case_sensitive() {
        let merged = merge_aprs([map(&[("0xAB", 1.0)]), map(&[("0xab", 2.0)])]);
        assert_eq!(merged.len(), 2);
    }
}
