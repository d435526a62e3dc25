use crate::app::{App, AppEvent, AppMode, StatusLevel};
use crate::engine::{MarkerColoring, Role, SymbolCatalog};
use crate::tokenize::{
    LoadedModel, ModelInfo, ModelSource, TokenCalculator, TokenId, TokenizeError, Tokenizer,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// One token per character.
struct CharTokenizer;

impl Tokenizer for CharTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, TokenizeError> {
        Ok(text.chars().map(|c| c as TokenId).collect())
    }

    fn decode_each(&self, ids: &[TokenId]) -> Result<Vec<String>, TokenizeError> {
        Ok(ids
            .iter()
            .map(|id| char::from_u32(*id).map(String::from).unwrap_or_default())
            .collect())
    }
}

struct FakeSource {
    models: Vec<ModelInfo>,
    broken: Vec<String>,
    loads: Arc<AtomicUsize>,
}

impl ModelSource for FakeSource {
    fn models(&self) -> Vec<ModelInfo> {
        self.models.clone()
    }

    fn load(&self, key: &str) -> Result<LoadedModel, TokenizeError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.broken.iter().any(|k| k == key) {
            return Err(TokenizeError::Load {
                model: key.to_string(),
                reason: "corrupt tokenizer.json".to_string(),
            });
        }
        Ok(LoadedModel::new(key, Box::new(CharTokenizer)))
    }
}

fn info(key: &str, available: bool) -> ModelInfo {
    ModelInfo {
        key: key.to_string(),
        name: key.to_string(),
        available,
    }
}

fn app_with(broken: &[&str]) -> (App, Arc<AtomicUsize>) {
    let loads = Arc::new(AtomicUsize::new(0));
    let source = FakeSource {
        models: vec![info("alpha", true), info("beta", true), info("gamma", false)],
        broken: broken.iter().map(|k| k.to_string()).collect(),
        loads: Arc::clone(&loads),
    };
    let calculator = TokenCalculator::new(SymbolCatalog::standard(), 100, MarkerColoring::default());
    (App::new(Box::new(source), calculator), loads)
}

fn app() -> App {
    app_with(&[]).0
}

#[test]
fn test_app_starts_in_command_mode() {
    let app = app();
    assert_eq!(app.mode(), AppMode::Command);
    assert!(app.document().is_none());
    assert!(app.report().is_none());
    assert_eq!(app.selection().selected(), vec!["alpha", "beta"]);
}

#[test]
fn test_app_handle_event_quit() {
    let mut app = app();
    app.handle_event(AppEvent::Quit);
    assert_eq!(app.mode(), AppMode::Quit);
}

#[test]
fn test_app_help_and_close() {
    let mut app = app();
    app.handle_event(AppEvent::Help);
    assert_eq!(app.mode(), AppMode::Help);
    app.close_help();
    assert_eq!(app.mode(), AppMode::Command);
}

#[test]
fn test_set_text_calculates_with_selected_models() {
    let mut app = app();
    app.handle_event(AppEvent::SetText("(a)".to_string()));

    let report = app.report().unwrap();
    assert_eq!(report.text_length, 3);
    assert_eq!(report.text_preview, "(a)");
    assert_eq!(report.results.len(), 2);
    assert!(report.failures.is_empty());

    let result = &report.results[0];
    assert_eq!(result.model, "alpha");
    assert_eq!(result.token_count, 3);
    assert_eq!(result.char_per_token, 1.0);
    assert_eq!(result.pairing.get(0).unwrap().role, Role::Open);
    assert_eq!(result.pairing.get(2).unwrap().role, Role::Close);
    assert_eq!(app.status().unwrap().level, StatusLevel::Info);
}

#[test]
fn test_blank_text_is_rejected() {
    let mut app = app();
    app.handle_event(AppEvent::SetText("  \n ".to_string()));
    assert!(app.document().is_none());
    let status = app.status().unwrap();
    assert_eq!(status.level, StatusLevel::Error);
    assert!(status.text.contains("empty"));
}

#[test]
fn test_calculate_without_text_warns() {
    let mut app = app();
    app.handle_event(AppEvent::Calculate);
    assert!(app.report().is_none());
    assert_eq!(app.status().unwrap().level, StatusLevel::Warning);
}

#[test]
fn test_calculate_without_models_warns() {
    let mut app = app();
    app.handle_event(AppEvent::SelectNone);
    app.handle_event(AppEvent::SetText("hello".to_string()));
    assert!(app.report().is_none());
    assert_eq!(app.status().unwrap().text, "No models selected");
}

#[test]
fn test_toggle_model_changes_next_run() {
    let mut app = app();
    app.handle_event(AppEvent::ToggleModel("alpha".to_string()));
    app.handle_event(AppEvent::SetText("x".to_string()));
    let report = app.report().unwrap();
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].model, "beta");
}

#[test]
fn test_toggle_unavailable_model_warns() {
    let mut app = app();
    app.handle_event(AppEvent::ToggleModel("gamma".to_string()));
    assert!(!app.selection().is_selected("gamma"));
    assert_eq!(app.status().unwrap().level, StatusLevel::Warning);
}

#[test]
fn test_tokenizers_are_loaded_once() {
    let (mut app, loads) = app_with(&[]);
    app.handle_event(AppEvent::SetText("one".to_string()));
    app.handle_event(AppEvent::Calculate);
    app.handle_event(AppEvent::SetText("two".to_string()));
    assert_eq!(loads.load(Ordering::SeqCst), 2);
}

#[test]
fn test_load_failure_is_reported_per_model() {
    let (mut app, _) = app_with(&["beta"]);
    app.handle_event(AppEvent::SetText("[x]".to_string()));

    let report = app.report().unwrap();
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].model, "alpha");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].model, "beta");
    assert!(report.failures[0].error.contains("corrupt"));
    assert_eq!(app.status().unwrap().level, StatusLevel::Warning);
}

#[test]
fn test_missing_file_sets_error_status() {
    let mut app = app();
    app.handle_event(AppEvent::LoadFile("/nonexistent/input.txt".to_string()));
    assert!(app.document().is_none());
    assert_eq!(app.status().unwrap().level, StatusLevel::Error);
}

#[test]
fn test_invalid_command_sets_error_status() {
    let mut app = app();
    app.handle_event(AppEvent::InvalidCommand(":bogus".to_string()));
    let status = app.status().unwrap();
    assert_eq!(status.level, StatusLevel::Error);
    assert_eq!(status.text, "Unknown command: :bogus");
}

#[test]
fn test_result_selection_stays_in_bounds() {
    let mut app = app();
    app.select_previous_result();
    assert_eq!(app.selected_result(), 0);

    app.handle_event(AppEvent::SetText("abc".to_string()));
    app.select_next_result();
    app.select_next_result();
    assert_eq!(app.selected_result(), 1);
    app.select_previous_result();
    assert_eq!(app.selected_result(), 0);
}

#[test]
fn test_render_state_reflects_app() {
    let mut app = app();
    app.handle_event(AppEvent::ToggleModel("beta".to_string()));
    app.handle_event(AppEvent::SetText("<s>hi</s>".to_string()));

    let state = app.get_render_state();
    assert_eq!(state.mode, AppMode::Command);
    assert_eq!(state.source, Some("inline"));
    assert_eq!(state.char_count, 9);
    assert_eq!(state.text_preview.as_deref(), Some("<s>hi</s>"));
    assert_eq!(state.models.len(), 3);
    assert!(state.models[0].selected);
    assert!(!state.models[1].selected);
    assert!(!state.models[2].available);
    assert_eq!(state.focused_result().unwrap().model, "alpha");
}
