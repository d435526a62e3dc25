use super::event::AppEvent;
use super::mode::AppMode;
use super::render_state::RenderState;
use super::state::{ModelSelection, StatusMessage};
use crate::input::{self, LoadError, LoadedDocument};
use crate::tokenize::{FailedModel, LoadedModel, ModelSource, Report, TokenCalculator};
use tracing::{info, warn};

pub struct App {
    mode: AppMode,
    source: Box<dyn ModelSource>,
    calculator: TokenCalculator,
    selection: ModelSelection,
    document: Option<LoadedDocument>,
    /// Tokenizers loaded so far, reused across runs.
    loaded: Vec<LoadedModel>,
    report: Option<Report>,
    selected_result: usize,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(source: Box<dyn ModelSource>, calculator: TokenCalculator) -> Self {
        let selection = ModelSelection::new(source.models());
        Self {
            mode: AppMode::Command,
            source,
            calculator,
            selection,
            document: None,
            loaded: Vec::new(),
            report: None,
            selected_result: 0,
            status: None,
        }
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn selection(&self) -> &ModelSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut ModelSelection {
        &mut self.selection
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn selected_result(&self) -> usize {
        self.selected_result
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LoadFile(path) => {
                let loaded = input::load_file(&path);
                self.accept_document(loaded);
            }
            AppEvent::LoadClipboard => {
                let loaded = input::clipboard::load();
                self.accept_document(loaded);
            }
            AppEvent::SetText(text) => {
                let loaded = LoadedDocument::new(text, "inline");
                self.accept_document(loaded);
            }
            AppEvent::SelectAll => {
                self.selection.select_all();
                self.status = Some(StatusMessage::info(format!(
                    "{} models selected",
                    self.selection.selected().len()
                )));
            }
            AppEvent::SelectNone => {
                self.selection.select_none();
                self.status = Some(StatusMessage::info("No models selected"));
            }
            AppEvent::ToggleModel(key) => {
                if self.selection.toggle(&key) {
                    let state = if self.selection.is_selected(&key) {
                        "selected"
                    } else {
                        "deselected"
                    };
                    self.status = Some(StatusMessage::info(format!("{key} {state}")));
                } else {
                    self.status = Some(StatusMessage::warning(format!(
                        "Model not available: {key}"
                    )));
                }
            }
            AppEvent::Calculate => self.calculate(),
            AppEvent::Quit => self.mode = AppMode::Quit,
            AppEvent::Help => self.mode = AppMode::Help,
            AppEvent::Warning(text) => self.status = Some(StatusMessage::warning(text)),
            AppEvent::InvalidCommand(input) => {
                self.status = Some(StatusMessage::error(format!("Unknown command: {input}")));
            }
            AppEvent::None => {}
        }
    }

    /// Takes text loaded before the UI started.
    pub fn load_document(&mut self, document: LoadedDocument) {
        self.accept_document(Ok(document));
    }

    /// Any key leaves the help overlay.
    pub fn close_help(&mut self) {
        if self.mode == AppMode::Help {
            self.mode = AppMode::Command;
        }
    }

    /// Tokenizes the current document with every selected model. Tokenizers
    /// that fail to load are reported next to the ones that ran.
    pub fn calculate(&mut self) {
        let Some(document) = &self.document else {
            self.status = Some(StatusMessage::warning("No text loaded"));
            return;
        };

        let keys = self.selection.selected();
        if keys.is_empty() {
            self.status = Some(StatusMessage::warning("No models selected"));
            return;
        }

        let mut load_failures = Vec::new();
        for key in &keys {
            if self.loaded.iter().any(|m| &m.key == key) {
                continue;
            }
            match self.source.load(key) {
                Ok(model) => {
                    info!(model = %key, "tokenizer loaded");
                    self.loaded.push(model);
                }
                Err(err) => {
                    warn!(model = %key, error = %err, "tokenizer failed to load");
                    load_failures.push(FailedModel {
                        model: key.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        let models: Vec<&LoadedModel> = keys
            .iter()
            .filter_map(|key| self.loaded.iter().find(|m| &m.key == key))
            .collect();
        let mut report = self.calculator.calculate(&document.text, &models);
        report.failures.extend(load_failures);
        report.failures.sort_by(|a, b| a.model.cmp(&b.model));

        self.status = Some(if report.failures.is_empty() {
            StatusMessage::info(format!(
                "{} tokenized with {} models",
                document.source,
                report.results.len()
            ))
        } else {
            StatusMessage::warning(format!(
                "{} of {} models failed",
                report.failures.len(),
                keys.len()
            ))
        });
        self.selected_result = 0;
        self.report = Some(report);
    }

    pub fn select_next_result(&mut self) {
        let count = self.report.as_ref().map_or(0, |r| r.results.len());
        if self.selected_result + 1 < count {
            self.selected_result += 1;
        }
    }

    pub fn select_previous_result(&mut self) {
        self.selected_result = self.selected_result.saturating_sub(1);
    }

    pub fn get_render_state(&self) -> RenderState<'_> {
        RenderState::new(
            self.mode,
            &self.selection,
            self.document.as_ref(),
            self.report.as_ref(),
            self.selected_result,
            self.status.as_ref(),
        )
    }

    /// New text replaces the old report and is tokenized right away.
    fn accept_document(&mut self, loaded: Result<LoadedDocument, LoadError>) {
        match loaded {
            Ok(document) => {
                info!(
                    source = %document.source,
                    chars = document.char_count(),
                    "document loaded"
                );
                self.document = Some(document);
                self.report = None;
                self.selected_result = 0;
                self.calculate();
            }
            Err(err) => {
                warn!(error = %err, "document failed to load");
                self.status = Some(StatusMessage::error(err.to_string()));
            }
        }
    }
}
