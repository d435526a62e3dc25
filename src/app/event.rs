/// Application events
#[derive(Debug, PartialEq, Clone)]
pub enum AppEvent {
    LoadFile(String),
    LoadClipboard,
    SetText(String),
    SelectAll,
    SelectNone,
    ToggleModel(String),
    Calculate,
    Quit,
    Help,
    Warning(String),
    InvalidCommand(String),
    None,
}
