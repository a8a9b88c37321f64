//! APR normalization and per-network aggregation.

mod aggregate;
mod normalize;

pub use aggregate::{aggregate_network, merge_aprs, AggregateError};
pub use normalize::{normalize_aprs, rate_to_percent, AprMap, APR_DECIMAL_PLACES};
