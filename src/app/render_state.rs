use crate::app::mode::AppMode;
use crate::app::state::{ModelSelection, StatusMessage};
use crate::input::LoadedDocument;
use crate::tokenize::{text_preview, ModelReport, Report, TEXT_PREVIEW_CHARS};

/// One line of the model list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRow {
    pub key: String,
    pub name: String,
    pub available: bool,
    pub selected: bool,
}

/// Render state for UI components
pub struct RenderState<'a> {
    pub mode: AppMode,
    pub models: Vec<ModelRow>,
    pub source: Option<&'a str>,
    pub char_count: usize,
    pub text_preview: Option<String>,
    pub report: Option<&'a Report>,
    pub selected_result: usize,
    pub status: Option<&'a StatusMessage>,
}

impl<'a> RenderState<'a> {
    pub fn new(
        mode: AppMode,
        selection: &ModelSelection,
        document: Option<&'a LoadedDocument>,
        report: Option<&'a Report>,
        selected_result: usize,
        status: Option<&'a StatusMessage>,
    ) -> Self {
        let models = selection
            .models()
            .iter()
            .map(|m| ModelRow {
                key: m.key.clone(),
                name: m.name.clone(),
                available: m.available,
                selected: selection.is_selected(&m.key),
            })
            .collect();

        Self {
            mode,
            models,
            source: document.map(|d| d.source.as_str()),
            char_count: document.map_or(0, LoadedDocument::char_count),
            text_preview: document.map(|d| text_preview(&d.text, TEXT_PREVIEW_CHARS)),
            report,
            selected_result,
            status,
        }
    }

    /// The result whose preview is on screen.
    pub fn focused_result(&self) -> Option<&'a ModelReport> {
        self.report
            .and_then(|report| report.results.get(self.selected_result))
    }
}
