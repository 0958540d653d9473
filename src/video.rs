use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{error, info};

use crate::error::{Result, ShortsError};

const BACKGROUND: &str = "color=c=#0b1020:s=1080x1920:r=30:d=60";
const SUBTITLE_STYLE: &str =
    "FontName=DejaVu Sans,FontSize=12,Outline=2,Shadow=1,Alignment=2,MarginV=18";

#[derive(Debug, Clone)]
pub struct CompositionJob {
    pub symbol: String,
    pub logo: Option<PathBuf>,
    pub audio: PathBuf,
    pub title_file: PathBuf,
    pub subtitles: PathBuf,
    pub output: PathBuf,
}

/// Produces the final video file. Blocks until done.
pub trait VideoComposer {
    fn compose(&self, job: &CompositionJob) -> Result<()>;
}

pub struct Ffmpeg {
    pub font: PathBuf,
}

impl Ffmpeg {
    pub fn new(font: impl Into<PathBuf>) -> Self {
        Self { font: font.into() }
    }

    pub fn args(&self, job: &CompositionJob) -> Vec<String> {
        let font = self.font.display();
        let title = job.title_file.display();
        let srt = job.subtitles.display();
        let symbol = &job.symbol;

        let title_band = format!(
            "drawbox=x=0:y=0:w=iw:h=260:color=black@0.35:t=fill,\
             drawtext=fontfile={font}:textfile='{title}':reload=1:\
             fontcolor=white:fontsize=68:borderw=4:bordercolor=black:x=(w-text_w)/2:y=90,\
             subtitles='{srt}':force_style='{SUBTITLE_STYLE}'"
        );

        let mut args: Vec<String> = vec![
            "-y".into(),
            "-f".into(),
            "lavfi".into(),
            "-i".into(),
            BACKGROUND.into(),
        ];
        match &job.logo {
            Some(logo) => {
                let graph = format!(
                    "[0:v]drawtext=fontfile={font}:text='{symbol}':\
                     fontcolor=white@0.18:fontsize=220:borderw=0:x=(W-text_w)/2:y=700[bg0];\
                     [1:v]scale=720:-1:flags=lanczos,format=rgba,colorchannelmixer=aa=0.92[logo];\
                     [bg0][logo]overlay=x=(W-w)/2:y=560[bg];\
                     [bg]{title_band}[v]"
                );
                args.extend([
                    "-loop".into(),
                    "1".into(),
                    "-i".into(),
                    logo.display().to_string(),
                    "-i".into(),
                    job.audio.display().to_string(),
                    "-filter_complex".into(),
                    graph,
                    "-map".into(),
                    "[v]".into(),
                    "-map".into(),
                    "2:a".into(),
                ]);
            }
            None => {
                let chain = format!(
                    "drawtext=fontfile={font}:text='{symbol}':fontcolor=white@0.18:\
                     fontsize=220:x=(w-text_w)/2:y=700,{title_band}"
                );
                args.extend([
                    "-i".into(),
                    job.audio.display().to_string(),
                    "-vf".into(),
                    chain,
                ]);
            }
        }
        args.extend([
            "-c:v".into(),
            "libx264".into(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-c:a".into(),
            "aac".into(),
            "-shortest".into(),
            job.output.display().to_string(),
        ]);
        args
    }
}

impl VideoComposer for Ffmpeg {
    fn compose(&self, job: &CompositionJob) -> Result<()> {
        info!(
            "Composing {} ({})",
            job.output.display(),
            if job.logo.is_some() { "with logo" } else { "text only" }
        );
        let output = Command::new("ffmpeg")
            .args(self.args(job))
            .output()
            .map_err(|e| composition_failed(&job.output, format!("could not start ffmpeg: {e}")))?;

        if !output.status.success() {
            error!("ffmpeg failed to produce {}", job.output.display());
            return Err(composition_failed(
                &job.output,
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }
        Ok(())
    }
}

fn composition_failed(output: &Path, reason: String) -> ShortsError {
    ShortsError::Composition {
        output: output.to_path_buf(),
        reason,
    }
}
