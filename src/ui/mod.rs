pub mod command;
pub mod render;
pub mod report;
pub mod sanitize;
pub mod terminal;
pub mod terminal_guard;
pub mod theme;

pub use command::{command_to_app_event, parse_command, Command};
pub use report::{write_model_list, write_report};
pub use sanitize::display_token;
pub use terminal::TuiManager;
pub use terminal_guard::TerminalGuard;
pub use theme::Theme;
