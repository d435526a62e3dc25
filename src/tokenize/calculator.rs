use super::{LoadedModel, TokenizeError};
use crate::engine::config::Config;
use crate::engine::{pair_with, MarkerColoring, PairingResult, SymbolCatalog};
use rayon::prelude::*;
use tracing::{debug, warn};

/// Token statistics and paired preview for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReport {
    pub model: String,
    pub model_name: String,
    pub token_count: usize,
    /// Characters per token, rounded to two decimals; 0 for an empty encoding.
    pub char_per_token: f64,
    /// Decoded text of the first tokens, one entry per token.
    pub preview: Vec<String>,
    pub pairing: PairingResult,
}

impl ModelReport {
    /// True when the preview shows fewer tokens than the text produced.
    pub fn is_truncated(&self) -> bool {
        self.token_count > self.preview.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedModel {
    pub model: String,
    pub error: String,
}

/// Characters of the input kept in `Report::text_preview`.
pub const TEXT_PREVIEW_CHARS: usize = 100;

/// The first `max_chars` characters of `text`, with `...` appended when
/// anything was cut.
pub fn text_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    /// Input length in characters.
    pub text_length: usize,
    /// Start of the input, see [`text_preview`].
    pub text_preview: String,
    /// Successful models, sorted by key.
    pub results: Vec<ModelReport>,
    pub failures: Vec<FailedModel>,
}

impl Report {
    /// Mean token count over successful models, rounded; 0 when there are none.
    pub fn average_tokens(&self) -> usize {
        if self.results.is_empty() {
            return 0;
        }
        let total: usize = self.results.iter().map(|r| r.token_count).sum();
        (total as f64 / self.results.len() as f64).round() as usize
    }
}

/// Tokenizes text with several models and pairs each preview.
pub struct TokenCalculator {
    catalog: SymbolCatalog,
    preview_tokens: usize,
    marker_coloring: MarkerColoring,
}

impl TokenCalculator {
    pub fn new(
        catalog: SymbolCatalog,
        preview_tokens: usize,
        marker_coloring: MarkerColoring,
    ) -> Self {
        Self {
            catalog,
            preview_tokens,
            marker_coloring,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.symbol_catalog(),
            config.preview.max_tokens,
            config.pairing.marker_coloring,
        )
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    /// Runs every model in parallel. A model that fails is reported in
    /// `failures` and does not affect the others.
    pub fn calculate(&self, text: &str, models: &[&LoadedModel]) -> Report {
        let outcomes: Vec<(String, Result<ModelReport, TokenizeError>)> = models
            .par_iter()
            .map(|model| (model.key.clone(), self.run(text, model)))
            .collect();

        let mut report = Report {
            text_length: text.chars().count(),
            text_preview: text_preview(text, TEXT_PREVIEW_CHARS),
            ..Report::default()
        };
        for (key, outcome) in outcomes {
            match outcome {
                Ok(result) => report.results.push(result),
                Err(err) => {
                    warn!(model = %key, error = %err, "tokenization failed");
                    report.failures.push(FailedModel {
                        model: key,
                        error: err.to_string(),
                    });
                }
            }
        }
        report.results.sort_by(|a, b| a.model.cmp(&b.model));
        report.failures.sort_by(|a, b| a.model.cmp(&b.model));
        report
    }

    fn run(&self, text: &str, model: &LoadedModel) -> Result<ModelReport, TokenizeError> {
        let ids = model.tokenizer.encode(text)?;
        let preview_ids = &ids[..ids.len().min(self.preview_tokens)];
        let preview = model.tokenizer.decode_each(preview_ids)?;
        let pairing = pair_with(&preview, &self.catalog, self.marker_coloring);

        debug!(
            model = %model.key,
            tokens = ids.len(),
            pairs = pairing.pairs().len(),
            "model tokenized"
        );

        Ok(ModelReport {
            model: model.key.clone(),
            model_name: model.name.clone(),
            token_count: ids.len(),
            char_per_token: char_per_token(text, ids.len()),
            preview,
            pairing,
        })
    }
}

fn char_per_token(text: &str, token_count: usize) -> f64 {
    if token_count == 0 {
        return 0.0;
    }
    let ratio = text.chars().count() as f64 / token_count as f64;
    (ratio * 100.0).round() / 100.0
}
