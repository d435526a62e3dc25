use crate::input::LoadError;
use crate::tokenize::TokenizeError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Any failure surfaced by the binary.
#[derive(Error, Debug)]
pub enum TokscopeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("No input text: pass -f FILE, -t TEXT, or pipe text on stdin")]
    NoInput,
}
