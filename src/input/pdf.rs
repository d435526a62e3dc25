use super::{LoadError, LoadedDocument};
use std::path::Path;

/// Text layer of a PDF. Page breaks become newlines and trailing spaces that
/// pdf-extract leaves on each line are dropped.
pub fn load(path: &str) -> Result<LoadedDocument, LoadError> {
    let file_path = Path::new(path);
    if !file_path.exists() {
        return Err(LoadError::FileNotFound(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(file_path).map_err(|error| LoadError::Io {
        source_name: path.to_string(),
        error,
    })?;
    let raw = pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| LoadError::PdfParse(e.to_string()))?;

    LoadedDocument::new(normalize(&raw), format!("pdf:{path}"))
}

fn normalize(raw: &str) -> String {
    raw.replace('\u{c}', "\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
