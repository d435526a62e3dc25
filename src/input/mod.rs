use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("PDF parse error: {0}")]
    PdfParse(String),

    #[error("EPUB parse error: {0}")]
    EpubParse(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid text encoding (expected UTF-8 or GBK): {0}")]
    InvalidEncoding(String),

    #[error("Input is empty: {0}")]
    EmptyInput(String),

    #[error("I/O error reading {source_name}: {error}")]
    Io {
        source_name: String,
        #[source]
        error: std::io::Error,
    },
}

/// Text to be tokenized, with a short description of where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub text: String,
    pub source: String,
}

impl LoadedDocument {
    /// Rejects text that is empty once surrounding whitespace is ignored.
    pub fn new(text: String, source: impl Into<String>) -> Result<Self, LoadError> {
        let source = source.into();
        if text.trim().is_empty() {
            return Err(LoadError::EmptyInput(source));
        }
        Ok(Self { text, source })
    }

    /// Character count, as shown in the summary.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Loads a file, choosing the reader from its extension.
pub fn load_file(path: &str) -> Result<LoadedDocument, LoadError> {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => pdf::load(path),
        Some("epub") => epub::load(path),
        _ => text::load(path),
    }
}

pub mod clipboard;
pub mod epub;
pub mod pdf;
pub mod text;
