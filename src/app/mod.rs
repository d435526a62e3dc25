pub mod app;
#[cfg(test)]
mod app_tests;
pub mod event;
pub mod mode;
pub mod render_state;
pub mod state;

pub use app::App;
pub use event::AppEvent;
pub use mode::AppMode;
pub use render_state::{ModelRow, RenderState};
pub use state::{ModelSelection, StatusLevel, StatusMessage};
