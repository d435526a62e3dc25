//! Command parsing for the TUI command line
//!
//! Parses what the user typed, supporting:
//! - `:q` or `:quit` → Quit
//! - `:h` or `:help` → Help
//! - `:all` / `:none` → select every available model / clear the selection
//! - `:m KEY` or `:model KEY` → toggle one model
//! - `:r` or `:run` → tokenize again with the current selection
//! - `@path` → load a text, PDF or EPUB file
//! - `@@` → load the clipboard
//! - anything else → the text to tokenize

use crate::app::AppEvent;

/// Commands that can be parsed from command line input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quit,
    Help,
    LoadFile(String),
    LoadClipboard,
    SelectAll,
    SelectNone,
    ToggleModel(String),
    Run,
    Text(String),
    /// A known command used with missing arguments; holds the usage line.
    Usage(&'static str),
    Unknown(String),
}

/// Parse command line input into a Command
pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Command::Unknown(trimmed.to_string());
    }

    if let Some(cmd) = trimmed.strip_prefix(':') {
        let (name, arg) = match cmd.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (cmd, ""),
        };
        match name {
            "q" | "quit" => Command::Quit,
            "h" | "help" => Command::Help,
            "all" => Command::SelectAll,
            "none" => Command::SelectNone,
            "r" | "run" => Command::Run,
            "m" | "model" if arg.is_empty() => Command::Usage(":m MODEL"),
            "m" | "model" => Command::ToggleModel(arg.to_string()),
            _ => Command::Unknown(trimmed.to_string()),
        }
    } else if let Some(rest) = trimmed.strip_prefix('@') {
        let filename = rest.trim();
        if filename.is_empty() || filename == "@" {
            Command::LoadClipboard
        } else {
            Command::LoadFile(filename.to_string())
        }
    } else {
        // typed text is kept as-is, surrounding whitespace included
        Command::Text(input.to_string())
    }
}

/// Convert a parsed command into an AppEvent
pub fn command_to_app_event(command: Command) -> AppEvent {
    match command {
        Command::Quit => AppEvent::Quit,
        Command::Help => AppEvent::Help,
        Command::LoadFile(path) => AppEvent::LoadFile(path),
        Command::LoadClipboard => AppEvent::LoadClipboard,
        Command::SelectAll => AppEvent::SelectAll,
        Command::SelectNone => AppEvent::SelectNone,
        Command::ToggleModel(key) => AppEvent::ToggleModel(key),
        Command::Run => AppEvent::Calculate,
        Command::Text(text) => AppEvent::SetText(text),
        Command::Usage(usage) => AppEvent::Warning(format!("Usage: {usage}")),
        Command::Unknown(input) if input.is_empty() => AppEvent::None,
        Command::Unknown(input) => AppEvent::InvalidCommand(input),
    }
}
