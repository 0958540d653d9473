mod args;
mod coin;
mod coingecko;
mod error;
mod pipeline;
mod script;
mod store;
mod subtitle;
mod tts;
mod utils;
mod video;

use anyhow::Context;
use clap::Parser;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::args::Args;
use crate::coingecko::CoinGecko;
use crate::pipeline::{RenderSettings, Renderer};
use crate::store::{Cursor, MetadataCache, load_coins};
use crate::tts::EdgeTts;
use crate::video::Ffmpeg;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!("Starting coin shorts batch of {}", args.count);

    let coins = load_coins(&args.coins)
        .with_context(|| format!("Failed to load coin list {}", args.coins.display()))?;
    info!("Loaded {} coins from {}", coins.len(), args.coins.display());

    let mut cache = MetadataCache::load(&args.cache);
    if cache.is_empty() {
        info!("Starting with an empty metadata cache at {}", args.cache.display());
    } else {
        info!("{} coins already cached in {}", cache.len(), args.cache.display());
    }
    let cursor = Cursor::new(&args.index_file);

    let renderer = Renderer {
        api: CoinGecko::new()?,
        synthesizer: EdgeTts::new(&args.voice, &args.rate),
        composer: Ffmpeg::new(&args.font),
        settings: RenderSettings {
            out_dir: args.out_dir.clone(),
            assets_dir: args.assets_dir.clone(),
            total_ms: args.total_ms,
            delay: Duration::from_millis(args.delay_ms),
        },
    };

    let rendered = renderer
        .run_batch(&coins, &cursor, &mut cache, args.count)
        .await?;

    for r in &rendered {
        debug!("Rendered {}", r.video.display());
    }
    let with_logo = rendered.iter().filter(|r| r.has_logo).count();
    info!(
        "Batch complete, {} video(s) rendered, {} with logo",
        rendered.len(),
        with_logo
    );
    Ok(())
}
