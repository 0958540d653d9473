use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{error, info};

use crate::error::{Result, ShortsError};

/// Turns a narration text file into an audio file. Blocks until done.
pub trait SpeechSynthesizer {
    fn synthesize(&self, text_file: &Path, out_audio: &Path) -> Result<()>;
}

pub struct EdgeTts {
    pub voice: String,
    pub rate: String,
}

impl EdgeTts {
    pub fn new(voice: impl Into<String>, rate: impl Into<String>) -> Self {
        Self {
            voice: voice.into(),
            rate: rate.into(),
        }
    }

    fn args(&self, text_file: &Path, out_audio: &Path) -> Vec<OsString> {
        vec![
            "--voice".into(),
            self.voice.clone().into(),
            "--rate".into(),
            self.rate.clone().into(),
            "--file".into(),
            text_file.into(),
            "--write-media".into(),
            out_audio.into(),
        ]
    }
}

impl SpeechSynthesizer for EdgeTts {
    fn synthesize(&self, text_file: &Path, out_audio: &Path) -> Result<()> {
        info!("Calling edge-tts with voice {} for {}", self.voice, out_audio.display());

        let status = Command::new("edge-tts")
            .args(self.args(text_file, out_audio))
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| ShortsError::Synthesis {
                text_file: text_file.to_path_buf(),
                reason: format!("could not start edge-tts: {e}"),
            })?;

        if !status.success() {
            error!("edge-tts failed for {}", text_file.display());
            return Err(ShortsError::Synthesis {
                text_file: text_file.to_path_buf(),
                reason: format!("edge-tts exited with {status}"),
            });
        }
        Ok(())
    }
}
