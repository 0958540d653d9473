use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::coin::CoinInfo;
use crate::error::{Result, ShortsError};
use crate::utils::strip_markup;

const API_BASE: &str = "https://api.coingecko.com/api/v3";
const USER_AGENT: &str = "coin-shorts-bot/1.0";

/// Logos at or below this size are placeholders or error pages.
pub const MIN_LOGO_BYTES: usize = 500;

#[allow(async_fn_in_trait)]
pub trait MetadataSource {
    async fn resolve_id(&self, name: &str) -> Result<Option<String>>;
    async fn fetch_info(&self, coin_id: &str) -> Result<CoinInfo>;
}

#[allow(async_fn_in_trait)]
pub trait LogoSource {
    async fn fetch_logo(&self, url: &str) -> Option<Vec<u8>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    coins: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CoinDetail {
    description: Option<Description>,
    categories: Option<Vec<Option<String>>>,
    image: Option<Images>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Description {
    en: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Images {
    large: Option<String>,
}

impl From<CoinDetail> for CoinInfo {
    fn from(detail: CoinDetail) -> Self {
        CoinInfo {
            description: strip_markup(
                detail
                    .description
                    .and_then(|d| d.en)
                    .as_deref()
                    .unwrap_or_default(),
            ),
            categories: detail
                .categories
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .collect(),
            logo_url: detail.image.and_then(|i| i.large).unwrap_or_default(),
        }
    }
}

pub struct CoinGecko {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGecko {
    pub fn new() -> Result<Self> {
        Self::with_base_url(API_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| ShortsError::MetadataLookup {
                target: "http client".to_string(),
                source,
            })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let lookup = |source| ShortsError::MetadataLookup {
            target: url.to_string(),
            source,
        };
        let res = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(lookup)?
            .error_for_status()
            .map_err(lookup)?
            .text()
            .await
            .map_err(lookup)?;
        Ok(serde_json::from_str(&res)?)
    }
}

impl MetadataSource for CoinGecko {
    async fn resolve_id(&self, name: &str) -> Result<Option<String>> {
        let url = format!("{}/search", self.base_url);
        let parsed: SearchResponse = self.get_json(&url, &[("query", name)]).await?;
        let id = parsed
            .coins
            .into_iter()
            .next()
            .map(|hit| hit.id)
            .filter(|id| !id.is_empty());
        debug!("Resolved {} to {:?}", name, id);
        Ok(id)
    }

    async fn fetch_info(&self, coin_id: &str) -> Result<CoinInfo> {
        let url = format!("{}/coins/{}", self.base_url, coin_id);
        let query = [
            ("localization", "false"),
            ("tickers", "false"),
            ("market_data", "false"),
            ("community_data", "false"),
            ("developer_data", "false"),
            ("sparkline", "false"),
        ];
        let detail: CoinDetail = self.get_json(&url, &query).await?;
        info!("Fetched metadata for {}", coin_id);
        Ok(detail.into())
    }
}

impl LogoSource for CoinGecko {
    async fn fetch_logo(&self, url: &str) -> Option<Vec<u8>> {
        if url.is_empty() {
            return None;
        }
        let bytes = match self.client.get(url).send().await {
            Ok(res) if res.status() == reqwest::StatusCode::OK => res.bytes().await.ok()?,
            Ok(res) => {
                warn!("Logo download {} returned {}", url, res.status());
                return None;
            }
            Err(e) => {
                warn!("Logo download {} failed: {}", url, e);
                return None;
            }
        };
        if bytes.len() <= MIN_LOGO_BYTES {
            warn!("Logo {} too small ({} bytes)", url, bytes.len());
            return None;
        }
        Some(bytes.to_vec())
    }
}
