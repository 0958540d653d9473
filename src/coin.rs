use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinRecord {
    pub rank: u32,
    pub name: String,
    pub symbol: String,
}

impl CoinRecord {
    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.rank, self.symbol)
    }
}

#[derive(Debug, Deserialize)]
pub struct RawCoin {
    pub rank: Option<u32>,
    pub name: String,
    pub symbol: String,
}

impl RawCoin {
    pub fn into_record(self, position: usize) -> CoinRecord {
        CoinRecord {
            rank: self.rank.unwrap_or(position as u32 + 1),
            name: self.name,
            symbol: self.symbol,
        }
    }
}

/// Field names on disk are `en`, `categories` and `image`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinInfo {
    #[serde(rename = "en")]
    pub description: String,
    pub categories: Vec<String>,
    #[serde(rename = "image")]
    pub logo_url: String,
}
