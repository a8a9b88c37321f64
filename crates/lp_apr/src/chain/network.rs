//! Target networks and their chain names.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unsupported chain id: {0}")]
pub struct UnknownNetwork(pub u64);

/// Blockchain network the job knows how to query. Serialized as its chain id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum NetworkId {
    Bsc,
    Ethereum,
}

impl NetworkId {
    /// Every network the job targets, principal chain first.
    pub const ALL: [NetworkId; 2] = [NetworkId::Bsc, NetworkId::Ethereum];

    pub fn chain_id(self) -> u64 {
        match self {
            NetworkId::Bsc => 56,
            NetworkId::Ethereum => 1,
        }
    }

    /// Human-readable name, used for farm config sources and explorer API paths.
    pub fn chain_name(self) -> &'static str {
        match self {
            NetworkId::Bsc => "bsc",
            NetworkId::Ethereum => "ethereum",
        }
    }
}

impl TryFrom<u64> for NetworkId {
    type Error = UnknownNetwork;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        NetworkId::ALL
            .into_iter()
            .find(|n| n.chain_id() == id)
            .ok_or(UnknownNetwork(id))
    }
}

impl From<NetworkId> for u64 {
    fn from(n: NetworkId) -> u64 {
        n.chain_id()
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.chain_id())
    }
}
