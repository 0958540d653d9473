use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::coin::{CoinInfo, CoinRecord};
use crate::coingecko::{LogoSource, MIN_LOGO_BYTES, MetadataSource};
use crate::error::{Result, ShortsError};
use crate::script::{compose, title};
use crate::store::{CacheEntry, Cursor, MetadataCache};
use crate::subtitle::{build_timeline, write_srt};
use crate::tts::SpeechSynthesizer;
use crate::video::{CompositionJob, VideoComposer};

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub out_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub total_ms: u64,
    pub delay: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub video: PathBuf,
    pub has_logo: bool,
}

pub struct Renderer<A, S, V> {
    pub api: A,
    pub synthesizer: S,
    pub composer: V,
    pub settings: RenderSettings,
}

impl<A, S, V> Renderer<A, S, V>
where
    A: MetadataSource + LogoSource,
    S: SpeechSynthesizer,
    V: VideoComposer,
{
    pub async fn run_batch(
        &self,
        coins: &[CoinRecord],
        cursor: &Cursor,
        cache: &mut MetadataCache,
        count: usize,
    ) -> Result<Vec<Rendered>> {
        if coins.is_empty() {
            return Err(ShortsError::EmptyCoinList);
        }
        fs::create_dir_all(&self.settings.out_dir)?;
        fs::create_dir_all(&self.settings.assets_dir)?;

        let mut idx = cursor.load()?;
        let mut rendered = Vec::with_capacity(count);
        info!("Rendering {} coin(s) starting at index {}", count, idx);

        for _ in 0..count {
            let coin = &coins[idx % coins.len()];
            rendered.push(self.render_one(coin, idx, cache).await?);
            idx += 1;
            cursor.save(idx)?;
            sleep(self.settings.delay).await;
        }
        Ok(rendered)
    }

    pub async fn render_one(
        &self,
        coin: &CoinRecord,
        idx: usize,
        cache: &mut MetadataCache,
    ) -> Result<Rendered> {
        info!("Rendering #{} {} ({})", coin.rank, coin.name, coin.symbol);
        let entry = self.cached_or_fetched(coin, cache).await?;

        let logo_stem = if entry.id.is_empty() {
            &coin.symbol
        } else {
            &entry.id
        };
        let logo_path = self
            .settings
            .assets_dir
            .join(format!("{}.png", logo_stem.to_lowercase()));
        let has_logo = self.ensure_logo(&entry.info, &logo_path).await;

        let text = compose(coin, &entry.info);
        debug!("Narration: {}", text);

        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let base = format!("{:03}_{}_{}", idx, coin.symbol, stamp);
        let out = &self.settings.out_dir;
        let txt = out.join(format!("{base}.txt"));
        let srt = out.join(format!("{base}.srt"));
        let mp3 = out.join(format!("{base}.mp3"));
        let mp4 = out.join(format!("{base}.mp4"));
        let title_file = out.join(format!("{base}_title.txt"));

        fs::write(&txt, &text)?;
        let timeline = build_timeline(&text, self.settings.total_ms);
        write_srt(&srt, &timeline)?;
        fs::write(&title_file, title(coin))?;
        info!("Wrote narration and {} captions for {}", timeline.len(), base);

        self.synthesizer.synthesize(&txt, &mp3)?;

        let job = CompositionJob {
            symbol: coin.symbol.clone(),
            logo: has_logo.then(|| logo_path.clone()),
            audio: mp3,
            title_file,
            subtitles: srt,
            output: mp4.clone(),
        };
        self.composer.compose(&job)?;

        println!(
            "OK: {} | logo: {}",
            mp4.display(),
            if has_logo { "YES" } else { "NO" }
        );
        Ok(Rendered {
            video: mp4,
            has_logo,
        })
    }

    /// Looks the coin up in the cache first; on a miss fetches and persists it immediately.
    async fn cached_or_fetched(
        &self,
        coin: &CoinRecord,
        cache: &mut MetadataCache,
    ) -> Result<CacheEntry> {
        let key = coin.cache_key();
        if let Some(entry) = cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(entry.clone());
        }

        info!("Cache miss for {}, querying metadata", key);
        let id = self.api.resolve_id(&coin.name).await?;
        let info = match &id {
            Some(id) => self.api.fetch_info(id).await?,
            None => {
                warn!("No metadata match for {}", coin.name);
                CoinInfo::default()
            }
        };
        let entry = CacheEntry {
            id: id.unwrap_or_default(),
            info,
        };
        cache.insert(key, entry.clone());
        cache.save()?;
        Ok(entry)
    }

    async fn ensure_logo(&self, info: &CoinInfo, path: &Path) -> bool {
        if usable_logo(path) {
            return true;
        }
        let Some(bytes) = self.api.fetch_logo(&info.logo_url).await else {
            return false;
        };
        match fs::write(path, &bytes) {
            Ok(()) => usable_logo(path),
            Err(e) => {
                warn!("Could not store logo {}: {}", path.display(), e);
                false
            }
        }
    }
}

fn usable_logo(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.len() > MIN_LOGO_BYTES as u64)
        .unwrap_or(false)
}
