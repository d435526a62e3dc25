// Configuration for tokscope pairing, preview and display
// Every section has defaults; a TOML file may override any of them

use crate::engine::catalog::{SymbolCatalog, SymbolDefinition};
use crate::engine::error::ConfigError;
use crate::engine::pairing::{MarkerColoring, PALETTE_SIZE};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const TOKENIZERS_DIR_ENV: &str = "TOKSCOPE_TOKENIZERS_DIR";
pub const PREVIEW_TOKENS_ENV: &str = "TOKSCOPE_PREVIEW_TOKENS";

/// Pairing engine settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    /// Number of highlight colors slots are reduced to (default 8)
    pub palette_size: usize,

    /// Whether marker instances of one definition share a color
    pub marker_coloring: MarkerColoring,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            palette_size: PALETTE_SIZE,
            marker_coloring: MarkerColoring::default(),
        }
    }
}

/// Token preview settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Tokens decoded and shown per model (default 100)
    pub max_tokens: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { max_tokens: 100 }
    }
}

/// Where local tokenizers live
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// One subdirectory per model, each holding a tokenizer.json
    pub dir: PathBuf,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("tokenizers"),
        }
    }
}

/// Pair highlight colors as `#RRGGBB` strings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub pair_colors: Vec<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            pair_colors: [
                "#F7768E", "#FF9E64", "#E0AF68", "#9ECE6A", "#73DACA", "#7DCFFF", "#7AA2F7",
                "#BB9AF7",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        }
    }
}

/// Definitions appended to the standard symbol catalog
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub extra: Vec<SymbolDefinition>,
}

/// Master configuration combining all tokscope settings
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pairing: PairingConfig,
    pub preview: PreviewConfig,
    pub tokenizers: TokenizerConfig,
    pub theme: ThemeConfig,
    pub catalog: CatalogConfig,
}

impl Config {
    /// Reads `path` if given, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies `TOKSCOPE_*` overrides looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(TOKENIZERS_DIR_ENV) {
            self.tokenizers.dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(PREVIEW_TOKENS_ENV) {
            self.preview.max_tokens = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                field: PREVIEW_TOKENS_ENV,
                reason: format!("expected a positive integer, got {:?}", raw),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pairing.palette_size == 0 {
            return Err(ConfigError::Invalid {
                field: "pairing.palette_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.preview.max_tokens == 0 {
            return Err(ConfigError::Invalid {
                field: "preview.max_tokens",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Standard catalog plus any `[[catalog.extra]]` definitions.
    pub fn symbol_catalog(&self) -> SymbolCatalog {
        SymbolCatalog::standard().extended(self.catalog.extra.iter().cloned())
    }
}
