#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Typing commands or text on the command line
    Command,
    /// Help overlay; any key returns to Command
    Help,
    Quit,
}
