use super::{TokenId, TokenizeError, Tokenizer};
use std::path::Path;

/// A Hugging Face `tokenizer.json` tokenizer.
pub struct HfTokenizer {
    model: String,
    inner: tokenizers::Tokenizer,
}

impl HfTokenizer {
    pub fn from_file(model: &str, path: &Path) -> Result<Self, TokenizeError> {
        let inner = tokenizers::Tokenizer::from_file(path).map_err(|e| TokenizeError::Load {
            model: model.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            model: model.to_string(),
            inner,
        })
    }

    pub fn from_bytes(model: &str, bytes: &[u8]) -> Result<Self, TokenizeError> {
        let inner = tokenizers::Tokenizer::from_bytes(bytes).map_err(|e| TokenizeError::Load {
            model: model.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            model: model.to_string(),
            inner,
        })
    }
}

impl Tokenizer for HfTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, TokenizeError> {
        // Counts reflect the raw text, so no BOS/EOS is added
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| TokenizeError::Encode {
                model: self.model.clone(),
                reason: e.to_string(),
            })?;
        Ok(encoding.get_ids().to_vec())
    }

    fn decode_each(&self, ids: &[TokenId]) -> Result<Vec<String>, TokenizeError> {
        ids.iter()
            .map(|&id| {
                self.inner
                    .decode(&[id], false)
                    .map_err(|e| TokenizeError::Decode {
                        model: self.model.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect()
    }
}
