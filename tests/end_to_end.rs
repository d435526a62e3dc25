use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tokscope::app::{App, AppMode};
use tokscope::engine::config::Config;
use tokscope::engine::Role;
use tokscope::input;
use tokscope::tokenize::{LoadedModel, ModelRegistry, TokenCalculator};
use tokscope::ui::{command_to_app_event, parse_command, write_report};

const WORD_LEVEL: &str = r#"{
    "version": "1.0",
    "truncation": null,
    "padding": null,
    "added_tokens": [],
    "normalizer": null,
    "pre_tokenizer": { "type": "Whitespace" },
    "post_processor": null,
    "decoder": null,
    "model": {
        "type": "WordLevel",
        "vocab": { "[UNK]": 0, "(": 1, ")": 2, "[": 3, "]": 4, "call": 5, "x": 6 },
        "unk_token": "[UNK]"
    }
}"#;

fn tokenizer_dir(models: &[&str]) -> TempDir {
    let root = TempDir::new().unwrap();
    for model in models {
        let dir = root.path().join(model);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("tokenizer.json"), WORD_LEVEL).unwrap();
    }
    root
}

#[test]
fn file_to_plain_report() {
    let root = tokenizer_dir(&["tiny-a", "tiny-b"]);
    let text_file = root.path().join("input.txt");
    fs::write(&text_file, "call ( x [ x ] )").unwrap();

    let document = input::load_file(&text_file.to_string_lossy()).unwrap();
    let registry = ModelRegistry::scan(root.path()).unwrap();
    assert_eq!(registry.available_keys(), vec!["tiny-a", "tiny-b"]);

    let (loaded, failed) = registry.load_selected(&registry.available_keys()).unwrap();
    assert!(failed.is_empty());
    let models: Vec<&LoadedModel> = loaded.iter().collect();

    let calculator = TokenCalculator::from_config(&Config::default());
    let report = calculator.calculate(&document.text, &models);
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.average_tokens(), 7);

    let result = &report.results[0];
    assert_eq!(result.preview, vec!["call", "(", "x", "[", "x", "]", ")"]);
    assert_eq!(result.char_per_token, 2.29);
    assert_eq!(result.pairing.pairs().len(), 2);
    assert_eq!(result.pairing.get(1).unwrap().role, Role::Open);
    assert_eq!(result.pairing.get(6).unwrap().role, Role::Close);
    assert_ne!(
        result.pairing.get(1).unwrap().color_slot,
        result.pairing.get(3).unwrap().color_slot
    );

    let mut out = Vec::new();
    write_report(&mut out, &report, None).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("tiny-a (tiny-a)"));
    assert!(text.contains("preview: call│(│x│[│x│]│)"));
}

#[test]
fn preview_is_bounded_by_config() {
    let root = tokenizer_dir(&["tiny"]);
    let registry = ModelRegistry::scan(root.path()).unwrap();
    let model = registry.load("tiny").unwrap();

    let mut config = Config::default();
    config.preview.max_tokens = 3;
    let calculator = TokenCalculator::from_config(&config);
    let report = calculator.calculate("( x x x )", &[&model]);

    let result = &report.results[0];
    assert_eq!(result.token_count, 5);
    assert_eq!(result.preview.len(), 3);
    assert!(result.is_truncated());
    // the closing paren fell outside the preview
    assert_eq!(result.pairing.annotated_count(), 0);
}

#[test]
fn tui_commands_drive_the_app() {
    let root = tokenizer_dir(&["tiny", "other"]);
    let registry = ModelRegistry::scan(root.path()).unwrap();
    let calculator = TokenCalculator::from_config(&Config::default());
    let mut app = App::new(Box::new(registry), calculator);

    for line in [":m other", "( x )"] {
        app.handle_event(command_to_app_event(parse_command(line)));
    }

    let report = app.report().unwrap();
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].model, "tiny");
    assert_eq!(report.results[0].pairing.pairs().len(), 1);

    app.handle_event(command_to_app_event(parse_command(":q")));
    assert_eq!(app.mode(), AppMode::Quit);
}

#[test]
fn missing_tokenizer_dir_still_lists_known_models() {
    let registry = ModelRegistry::scan(Path::new("/nonexistent/tokscope")).unwrap();
    assert!(registry.available_keys().is_empty());
    assert!(registry.models().iter().any(|m| m.key == "qwen3-8b"));
    assert!(registry.load_selected(&["qwen3-8b".to_string()]).is_err());
}
