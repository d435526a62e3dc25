//! Tokenizer backends, local model discovery and per-model token reports.

mod calculator;
mod download;
mod hf;
mod registry;

pub use calculator::{
    text_preview, FailedModel, ModelReport, Report, TokenCalculator, TEXT_PREVIEW_CHARS,
};
pub use download::{download, hub_repo, HfHub, HubFetcher};
pub use hf::HfTokenizer;
pub use registry::{
    display_name, LoadedModel, ModelInfo, ModelRegistry, ModelSource, KNOWN_MODELS,
};

use std::path::PathBuf;
use thiserror::Error;

pub type TokenId = u32;

#[derive(Error, Debug)]
pub enum TokenizeError {
    #[error("Failed to load tokenizer for {model}: {reason}")]
    Load { model: String, reason: String },

    #[error("Encoding failed for {model}: {reason}")]
    Encode { model: String, reason: String },

    #[error("Decoding failed for {model}: {reason}")]
    Decode { model: String, reason: String },

    #[error("Model not available: {0}")]
    UnknownModel(String),

    #[error("None of the selected models are available")]
    NoModelsAvailable,

    #[error("Cannot scan tokenizer directory {path}: {error}")]
    Scan {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("No hub repository known for {0}")]
    NotOnHub(String),

    #[error("Download failed for {model}: {reason}")]
    Download { model: String, reason: String },

    #[error("Cannot install tokenizer file {path}: {error}")]
    Install {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("Invalid models_index.json: {0}")]
    Index(#[from] serde_json::Error),
}

/// One model's tokenizer. Implementations must be shareable across threads
/// so several models can be tokenized at once.
pub trait Tokenizer: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, TokenizeError>;

    /// Decodes every id separately, keeping special tokens visible.
    fn decode_each(&self, ids: &[TokenId]) -> Result<Vec<String>, TokenizeError>;
}
