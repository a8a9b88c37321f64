//! Explorer API client for 7-day average pool info.

use crate::chain::network::NetworkId;
use async_trait::async_trait;
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

const DEFAULT_EXPLORER_URL: &str = "https://explorer.pancakeswap.com/api";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EXPLORER_URL.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("url: {0}")]
    Url(#[from] url::ParseError),
    #[error("api error: status {0} body {1}")]
    Api(u16, String),
    #[error("parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Which pool family a dataset describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolCategory {
    /// Constant-product two-asset pairs.
    Standard,
    /// Stable-swap pools.
    Stable,
}

impl PoolCategory {
    fn path_segment(self) -> &'static str {
        match self {
            PoolCategory::Standard => "v2",
            PoolCategory::Stable => "stable",
        }
    }
}

impl fmt::Display for PoolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolCategory::Standard => f.write_str("standard"),
            PoolCategory::Stable => f.write_str("stable"),
        }
    }
}

/// Numeric field as sent upstream: either a JSON number or a decimal string.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RateValue {
    Number(f64),
    Text(String),
}

impl RateValue {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            RateValue::Number(n) => Cow::Owned(n.to_string()),
            RateValue::Text(s) => Cow::Borrowed(s.trim()),
        }
    }
}

/// Average info for one pool. Only `apr7d` feeds the APR artifact.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AvgInfo {
    #[serde(default)]
    pub apr7d: Option<RateValue>,
    #[serde(default, rename = "volumeUSD7d")]
    pub volume_usd_7d: Option<RateValue>,
    #[serde(default, rename = "tvlUSD")]
    pub tvl_usd: Option<RateValue>,
    #[serde(default, rename = "feeUSD7d")]
    pub fee_usd_7d: Option<RateValue>,
}

impl AvgInfo {
    pub fn with_apr7d(apr7d: RateValue) -> Self {
        Self {
            apr7d: Some(apr7d),
            ..Default::default()
        }
    }
}

/// Pool address (as provided upstream) -> average info.
pub type AvgInfoMap = BTreeMap<String, AvgInfo>;

#[derive(Deserialize)]
struct ExplorerPoolAvgInfo {
    id: String,
    #[serde(flatten)]
    info: AvgInfo,
}

/// Parse an explorer `farms-lp` response (array of pools) into a map keyed by pool id.
/// A repeated id keeps the last entry.
pub fn parse_avg_info(body: &str) -> Result<AvgInfoMap, FetchError> {
    let pools: Vec<ExplorerPoolAvgInfo> = serde_json::from_str(body)?;
    Ok(pools.into_iter().map(|p| (p.id, p.info)).collect())
}

/// Source of per-network average rates, one dataset per pool category.
#[async_trait]
pub trait AprSource: Send + Sync {
    async fn standard_pool_averages(&self, network: NetworkId) -> Result<AvgInfoMap, FetchError>;

    async fn stable_pool_averages(&self, network: NetworkId) -> Result<AvgInfoMap, FetchError>;
}

/// HTTP client for the explorer's cached APR endpoints.
pub struct ExplorerClient {
    config: FetchConfig,
    client: reqwest::Client,
    request_count: AtomicU64,
}

impl ExplorerClient {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            config,
            client,
            request_count: AtomicU64::new(0),
        })
    }

    /// `{base}/cached/pools/apr/{v2|stable}/{chain}/farms-lp`
    pub fn endpoint(&self, category: PoolCategory, network: NetworkId) -> Result<Url, FetchError> {
        let url = format!(
            "{}/cached/pools/apr/{}/{}/farms-lp",
            self.config.base_url.trim_end_matches('/'),
            category.path_segment(),
            urlencoding::encode(network.chain_name())
        );
        Ok(Url::parse(&url)?)
    }

    async fn get_avg_info(
        &self,
        category: PoolCategory,
        network: NetworkId,
    ) -> Result<AvgInfoMap, FetchError> {
        let url = self.endpoint(category, network)?;
        debug!(%url, chain_id = network.chain_id(), %category, "GET");
        let res = self.client.get(url).send().await?;
        let status = res.status();
        let body = res.text().await?;
        self.request_count.fetch_add(1, Ordering::Relaxed);
        if !status.is_success() {
            return Err(FetchError::Api(status.as_u16(), body));
        }
        let parsed = parse_avg_info(&body)?;
        info!(count = parsed.len(), chain_id = network.chain_id(), %category, "avg info");
        Ok(parsed)
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AprSource for ExplorerClient {
    async fn standard_pool_averages(&self, network: NetworkId) -> Result<AvgInfoMap, FetchError> {
        self.get_avg_info(PoolCategory::Standard, network).await
    }

    async fn stable_pool_averages(&self, network: NetworkId) -> Result<AvgInfoMap, FetchError> {
        self.get_avg_info(PoolCategory::Stable, network).await
    }
}
