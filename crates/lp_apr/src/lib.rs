//! lp_apr — 7-day average LP APR per farm pool, fetched for each target network
//! and persisted as one JSON artifact per network.

pub mod chain;
pub mod compute;
pub mod config;
pub mod farms;
pub mod update;

pub use chain::{AprSource, ExplorerClient, FetchConfig, NetworkId, RetryPolicy};
pub use compute::AprMap;
pub use config::AppConfig;
pub use farms::{FarmConfig, FarmConfigCache, FarmConfigRegistry};
pub use update::{update_lp_aprs, NetworkOutcome, UpdateConfig};
