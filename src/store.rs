use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::coin::{CoinInfo, CoinRecord, RawCoin};
use crate::error::{Result, ShortsError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Metadata id; empty when the name did not resolve.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub info: CoinInfo,
}

#[derive(Debug)]
pub struct MetadataCache {
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
}

impl MetadataCache {
    /// Reads the cache file. A missing or unreadable file yields an empty cache.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries: BTreeMap<String, CacheEntry> = match fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring unparsable cache {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        debug!("Loaded {} cached coins from {}", entries.len(), path.display());
        Self { path, entries }
    }

    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, entry: CacheEntry) {
        self.entries.insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn save(&self) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct Cursor {
    path: PathBuf,
}

impl Cursor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<usize> {
        if !self.path.exists() {
            return Ok(0);
        }
        let content = fs::read_to_string(&self.path)?;
        content
            .trim()
            .parse()
            .map_err(|_| ShortsError::InvalidCursor {
                path: self.path.clone(),
                content: content.trim().to_string(),
            })
    }

    pub fn save(&self, value: usize) -> Result<()> {
        fs::write(&self.path, value.to_string())?;
        Ok(())
    }
}

pub fn load_coins(path: &Path) -> Result<Vec<CoinRecord>> {
    let data = fs::read_to_string(path)?;
    let raw: Vec<RawCoin> = serde_json::from_str(&data)?;
    if raw.is_empty() {
        return Err(ShortsError::EmptyCoinList);
    }
    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(i, coin)| coin.into_record(i))
        .collect())
}
