//! Networks, explorer fetching, and fixed-delay retries.

pub(crate) mod fetch;
mod network;
mod retry;

pub use fetch::{
    parse_avg_info, AprSource, AvgInfo, AvgInfoMap, ExplorerClient, FetchConfig, FetchError,
    PoolCategory, RateValue,
};
pub use network::{NetworkId, UnknownNetwork};
pub use retry::{fetch_with_retry, RetryPolicy, MAX_RETRIES, RETRY_DELAY_MS};
