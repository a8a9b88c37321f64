//! Read-through cache of farm configuration per network.

use crate::chain::NetworkId;
use crate::farms::config::{FarmConfig, FarmConfigRegistry};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error};

/// Farm lists by network, loaded on first use and kept for the life of the cache.
/// Failed loads are not stored, so the next call tries again.
pub struct FarmConfigCache {
    registry: FarmConfigRegistry,
    entries: Mutex<HashMap<NetworkId, Arc<[FarmConfig]>>>,
}

impl FarmConfigCache {
    pub fn new(registry: FarmConfigRegistry) -> Self {
        Self {
            registry,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Farms for `network` that have a pool id. Empty on load failure.
    pub fn get(&self, network: NetworkId) -> Arc<[FarmConfig]> {
        if let Some(cached) = self.lookup(network) {
            debug!(chain_id = network.chain_id(), "farm config cache hit");
            return cached;
        }

        let farms = match self.registry.load(network) {
            Ok(farms) => farms,
            Err(e) => {
                error!(
                    chain_id = network.chain_id(),
                    chain = network.chain_name(),
                    error = %e,
                    "cannot get farm config"
                );
                return Arc::from(Vec::new());
            }
        };
        let filtered: Arc<[FarmConfig]> = farms.into_iter().filter(|f| f.pid.is_some()).collect();
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(network, Arc::clone(&filtered));
        filtered
    }

    pub fn is_cached(&self, network: NetworkId) -> bool {
        self.lookup(network).is_some()
    }

    fn lookup(&self, network: NetworkId) -> Option<Arc<[FarmConfig]>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&network)
            .cloned()
    }
}
