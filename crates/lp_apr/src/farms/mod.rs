//! Farm configuration lookup.

mod cache;
mod config;

pub use cache::FarmConfigCache;
pub use config::{load_farm_file, FarmConfig, FarmConfigError, FarmConfigLoader, FarmConfigRegistry};
