use super::{HfTokenizer, TokenizeError, Tokenizer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub(super) const TOKENIZER_FILE: &str = "tokenizer.json";
pub(super) const TOKENIZER_CONFIG_FILE: &str = "tokenizer_config.json";
const MODELS_INDEX_FILE: &str = "models_index.json";

/// Model keys with their hub repository, used for display names and to list
/// models that are not installed locally.
pub const KNOWN_MODELS: &[(&str, &str)] = &[
    ("qwen3-0.6b", "Qwen/Qwen3-0.6B"),
    ("qwen3-1.7b", "Qwen/Qwen3-1.7B"),
    ("qwen3-4b", "Qwen/Qwen3-4B"),
    ("qwen3-8b", "Qwen/Qwen3-8B"),
    ("qwen3-14b", "Qwen/Qwen3-14B"),
    ("qwen3-32b", "Qwen/Qwen3-32B"),
    ("qwen3-30b-a3b", "Qwen/Qwen3-30B-A3B"),
    ("deepseek-v3", "deepseek-ai/DeepSeek-V3"),
    ("deepseek-v3-base", "deepseek-ai/DeepSeek-V3-Base"),
    ("deepseek-v3.1", "deepseek-ai/DeepSeek-V3.1"),
    ("deepseek-v3.1-base", "deepseek-ai/DeepSeek-V3.1-Base"),
];

/// Hub name for known keys, otherwise the key itself.
pub fn display_name(key: &str) -> &str {
    KNOWN_MODELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, name)| *name)
        .unwrap_or(key)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub key: String,
    pub name: String,
    pub available: bool,
}

/// A loaded tokenizer ready for the calculator.
pub struct LoadedModel {
    pub key: String,
    pub name: String,
    pub tokenizer: Box<dyn Tokenizer>,
}

impl LoadedModel {
    pub fn new(key: &str, tokenizer: Box<dyn Tokenizer>) -> Self {
        Self {
            key: key.to_string(),
            name: display_name(key).to_string(),
            tokenizer,
        }
    }
}

/// Where the app gets its model list and tokenizers from.
pub trait ModelSource {
    fn models(&self) -> Vec<ModelInfo>;
    fn load(&self, key: &str) -> Result<LoadedModel, TokenizeError>;
}

#[derive(Debug, Clone)]
struct Entry {
    info: ModelInfo,
    tokenizer_path: Option<PathBuf>,
}

/// Models found in a tokenizer directory, plus known models that are missing.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    dir: PathBuf,
    entries: BTreeMap<String, Entry>,
}

impl ModelRegistry {
    /// Every non-hidden subdirectory with a `tokenizer.json` is an available
    /// model. When none qualifies, `models_index.json` is consulted instead.
    pub fn scan(dir: &Path) -> Result<Self, TokenizeError> {
        let mut entries = BTreeMap::new();

        if dir.is_dir() {
            info!(dir = %dir.display(), "scanning tokenizer directory");
            scan_subdirectories(dir, &mut entries)?;

            let available = entries.values().filter(|e| e.info.available).count();
            if available == 0 {
                let index = dir.join(MODELS_INDEX_FILE);
                if index.is_file() {
                    read_models_index(dir, &index, &mut entries)?;
                }
            }
        } else {
            warn!(dir = %dir.display(), "tokenizer directory does not exist");
        }

        for (key, _) in KNOWN_MODELS {
            entries
                .entry(key.to_string())
                .or_insert_with(|| unavailable(key));
        }

        let registry = Self {
            dir: dir.to_path_buf(),
            entries,
        };
        info!(
            available = registry.available_keys().len(),
            listed = registry.entries.len(),
            "model registry ready"
        );
        Ok(registry)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All listed models, sorted by key.
    pub fn models(&self) -> Vec<ModelInfo> {
        self.entries.values().map(|e| e.info.clone()).collect()
    }

    pub fn available_keys(&self) -> Vec<String> {
        self.entries
            .values()
            .filter(|e| e.info.available)
            .map(|e| e.info.key.clone())
            .collect()
    }

    pub fn is_available(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|e| e.info.available)
    }

    pub fn load(&self, key: &str) -> Result<LoadedModel, TokenizeError> {
        let path = self
            .entries
            .get(key)
            .and_then(|e| e.tokenizer_path.as_deref())
            .ok_or_else(|| TokenizeError::UnknownModel(key.to_string()))?;
        debug!(model = key, path = %path.display(), "loading tokenizer");
        let tokenizer = HfTokenizer::from_file(key, path)?;
        Ok(LoadedModel::new(key, Box::new(tokenizer)))
    }

    /// Loads every selected key that is available. Failures are returned
    /// alongside the successes instead of aborting the batch.
    pub fn load_selected(
        &self,
        keys: &[String],
    ) -> Result<(Vec<LoadedModel>, Vec<(String, TokenizeError)>), TokenizeError> {
        let mut loaded = Vec::new();
        let mut failed = Vec::new();

        for key in keys.iter().filter(|k| self.is_available(k)) {
            match self.load(key) {
                Ok(model) => loaded.push(model),
                Err(err) => {
                    warn!(model = %key, error = %err, "tokenizer failed to load");
                    failed.push((key.clone(), err));
                }
            }
        }

        if loaded.is_empty() && failed.is_empty() {
            return Err(TokenizeError::NoModelsAvailable);
        }
        Ok((loaded, failed))
    }
}

impl ModelSource for ModelRegistry {
    fn models(&self) -> Vec<ModelInfo> {
        ModelRegistry::models(self)
    }

    fn load(&self, key: &str) -> Result<LoadedModel, TokenizeError> {
        ModelRegistry::load(self, key)
    }
}

fn unavailable(key: &str) -> Entry {
    Entry {
        info: ModelInfo {
            key: key.to_string(),
            name: display_name(key).to_string(),
            available: false,
        },
        tokenizer_path: None,
    }
}

fn available(key: &str, tokenizer_path: PathBuf) -> Entry {
    Entry {
        info: ModelInfo {
            key: key.to_string(),
            name: display_name(key).to_string(),
            available: true,
        },
        tokenizer_path: Some(tokenizer_path),
    }
}

fn scan_subdirectories(
    dir: &Path,
    entries: &mut BTreeMap<String, Entry>,
) -> Result<(), TokenizeError> {
    let scan_error = |error| TokenizeError::Scan {
        path: dir.to_path_buf(),
        error,
    };

    for item in std::fs::read_dir(dir).map_err(scan_error)? {
        let path = item.map_err(scan_error)?.path();
        let Some(key) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !path.is_dir() || key.starts_with('.') {
            continue;
        }

        let tokenizer_json = path.join(TOKENIZER_FILE);
        if tokenizer_json.is_file() {
            entries.insert(key.to_string(), available(key, tokenizer_json));
        } else if path.join(TOKENIZER_CONFIG_FILE).is_file() {
            debug!(model = key, "tokenizer_config.json without tokenizer.json");
            entries.insert(key.to_string(), unavailable(key));
        }
    }
    Ok(())
}

fn read_models_index(
    dir: &Path,
    index: &Path,
    entries: &mut BTreeMap<String, Entry>,
) -> Result<(), TokenizeError> {
    let raw = std::fs::read_to_string(index).map_err(|error| TokenizeError::Scan {
        path: index.to_path_buf(),
        error,
    })?;
    let listed: BTreeMap<String, serde_json::Value> = serde_json::from_str(&raw)?;
    info!(count = listed.len(), "using models_index.json");

    for key in listed.keys() {
        let tokenizer_json = dir.join(key).join(TOKENIZER_FILE);
        let entry = if tokenizer_json.is_file() {
            available(key, tokenizer_json)
        } else {
            unavailable(key)
        };
        entries.insert(key.clone(), entry);
    }
    Ok(())
}
