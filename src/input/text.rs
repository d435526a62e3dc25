use super::{LoadError, LoadedDocument};
use encoding_rs::GBK;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const BOM: char = '\u{FEFF}';

/// Load a text file. UTF-8 is tried first, then GBK. A leading byte-order
/// mark is dropped.
pub fn load(path: &str) -> Result<LoadedDocument, LoadError> {
    let file_path = Path::new(path);

    if !file_path.exists() {
        return Err(LoadError::FileNotFound(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(file_path).map_err(|error| LoadError::Io {
        source_name: path.to_string(),
        error,
    })?;

    decode(bytes, path)
}

/// Read all of `reader` as text, e.g. piped stdin.
pub fn from_reader<R: Read>(mut reader: R, source: &str) -> Result<LoadedDocument, LoadError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|error| LoadError::Io {
            source_name: source.to_string(),
            error,
        })?;
    decode(bytes, source)
}

fn decode(bytes: Vec<u8>, source: &str) -> Result<LoadedDocument, LoadError> {
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            let bytes = err.into_bytes();
            let text = GBK
                .decode_without_bom_handling_and_without_replacement(&bytes)
                .ok_or_else(|| LoadError::InvalidEncoding(source.to_string()))?;
            debug!(source, "not UTF-8, decoded as GBK");
            text.into_owned()
        }
    };
    let text = match text.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    };
    LoadedDocument::new(text, source)
}
