use clap::Parser;
use std::path::PathBuf;

use crate::subtitle::DEFAULT_TOTAL_MS;

#[derive(Parser, Debug)]
#[clap(about = "Render short vertical explainer videos for a rotating list of coins")]
pub struct Args {
    /// How many coins to render in this run
    #[clap(long, default_value_t = 1)]
    pub count: usize,

    #[clap(long, default_value = "coins.json")]
    pub coins: PathBuf,

    #[clap(long, default_value = "coin_cache.json")]
    pub cache: PathBuf,

    #[clap(long, default_value = "coin_index.txt")]
    pub index_file: PathBuf,

    #[clap(long, default_value = "out")]
    pub out_dir: PathBuf,

    #[clap(long, default_value = "assets")]
    pub assets_dir: PathBuf,

    #[clap(long, default_value = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf")]
    pub font: PathBuf,

    #[clap(long, default_value = "en-US-JennyNeural")]
    pub voice: String,

    #[clap(long, default_value = "+10%", allow_hyphen_values = true)]
    pub rate: String,

    /// Caption timeline length in milliseconds
    #[clap(long, default_value_t = DEFAULT_TOTAL_MS)]
    pub total_ms: u64,

    /// Pause between coins, throttles the metadata API
    #[clap(long, default_value_t = 1_000)]
    pub delay_ms: u64,
}
