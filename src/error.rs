use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShortsError {
    #[error("Metadata lookup failed for {target}: {source}")]
    MetadataLookup {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Speech synthesis failed for {text_file}: {reason}")]
    Synthesis { text_file: PathBuf, reason: String },

    #[error("Video composition failed for {output}: {reason}")]
    Composition { output: PathBuf, reason: String },

    #[error("Coin list is empty")]
    EmptyCoinList,

    #[error("Cursor file {path} does not hold an integer: {content:?}")]
    InvalidCursor { path: PathBuf, content: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ShortsError>;
