use super::registry::{TOKENIZER_CONFIG_FILE, TOKENIZER_FILE};
use super::{TokenizeError, KNOWN_MODELS};
use hf_hub::api::sync::Api;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Fetches one file of a hub repository and returns where it landed.
pub trait HubFetcher {
    fn fetch(&self, repo: &str, file: &str) -> Result<PathBuf, String>;
}

/// The Hugging Face hub through its blocking client. Files go through the
/// client's own cache before being copied into the tokenizer directory.
pub struct HfHub {
    api: Api,
}

impl HfHub {
    pub fn new() -> Result<Self, TokenizeError> {
        let api = Api::new().map_err(|e| TokenizeError::Download {
            model: "hub".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { api })
    }
}

impl HubFetcher for HfHub {
    fn fetch(&self, repo: &str, file: &str) -> Result<PathBuf, String> {
        self.api
            .model(repo.to_string())
            .get(file)
            .map_err(|e| e.to_string())
    }
}

/// Hub repository of a known model key.
pub fn hub_repo(key: &str) -> Option<&'static str> {
    KNOWN_MODELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, repo)| *repo)
}

/// Installs `tokenizer.json` of a known model into `dir/<key>/`, where a
/// registry scan picks it up. `tokenizer_config.json` is copied too when the
/// repository has one.
pub fn download(
    dir: &Path,
    key: &str,
    fetcher: &dyn HubFetcher,
) -> Result<PathBuf, TokenizeError> {
    let repo = hub_repo(key).ok_or_else(|| TokenizeError::NotOnHub(key.to_string()))?;
    let target = dir.join(key);
    info!(model = key, repo, "downloading tokenizer");

    let tokenizer = fetcher
        .fetch(repo, TOKENIZER_FILE)
        .map_err(|reason| TokenizeError::Download {
            model: key.to_string(),
            reason,
        })?;
    install(&tokenizer, &target.join(TOKENIZER_FILE))?;

    match fetcher.fetch(repo, TOKENIZER_CONFIG_FILE) {
        Ok(config) => install(&config, &target.join(TOKENIZER_CONFIG_FILE))?,
        Err(reason) => debug!(model = key, %reason, "no tokenizer_config.json"),
    }

    Ok(target)
}

fn install(from: &Path, to: &Path) -> Result<(), TokenizeError> {
    let install_error = |error| TokenizeError::Install {
        path: to.to_path_buf(),
        error,
    };
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(install_error)?;
    }
    fs::copy(from, to).map_err(install_error)?;
    Ok(())
}
