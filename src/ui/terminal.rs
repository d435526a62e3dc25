use crate::app::{App, AppEvent, AppMode};
use crate::ui::command::{command_to_app_event, parse_command};
use crate::ui::render::{
    render_command_line, render_help, render_model_list, render_results_table,
    render_status_line, render_summary, render_token_preview,
};
use crate::ui::terminal_guard::TerminalGuard;
use crate::ui::theme::Theme;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, Paragraph},
    Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct TuiManager {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    theme: Theme,
    input: String,
    // dropped last so the terminal is restored after ratatui is done with it
    _guard: TerminalGuard,
}

impl TuiManager {
    pub fn new(theme: Theme) -> Result<Self, io::Error> {
        let guard = TerminalGuard::new()?;
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        Ok(TuiManager {
            terminal,
            theme,
            input: String::new(),
            _guard: guard,
        })
    }

    pub fn run_event_loop(&mut self, app: &mut App) -> io::Result<()> {
        loop {
            self.render_frame(app)?;
            if app.mode() == AppMode::Quit {
                return Ok(());
            }

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, &mut self.input, key);
                }
            }
        }
    }

    pub fn render_frame(&mut self, app: &App) -> io::Result<()> {
        let state = app.get_render_state();
        let theme = &self.theme;
        let input = &self.input;

        self.terminal.draw(|frame| {
            let area = frame.area();
            frame.render_widget(
                Block::default().style(ratatui::style::Style::default().bg(theme.background)),
                area,
            );

            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(5),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ])
                .split(area);

            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(48), Constraint::Min(20)])
                .split(rows[0]);

            let left = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(9)])
                .split(columns[0]);
            frame.render_widget(render_model_list(&state.models, theme), left[0]);
            frame.render_widget(
                render_summary(
                    state.source,
                    state.char_count,
                    state.text_preview.as_deref(),
                    state.report,
                    theme,
                ),
                left[1],
            );

            match state.report {
                Some(report) => {
                    let table_height = (report.results.len() + report.failures.len()) as u16 + 3;
                    let right = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Length(table_height), Constraint::Min(3)])
                        .split(columns[1]);
                    frame.render_widget(
                        render_results_table(report, state.selected_result, theme),
                        right[0],
                    );
                    if let Some(result) = state.focused_result() {
                        frame.render_widget(render_token_preview(result, theme), right[1]);
                    }
                }
                None => {
                    let empty = Paragraph::new("").block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(ratatui::style::Style::default().fg(theme.dimmed))
                            .title(" Results "),
                    );
                    frame.render_widget(empty, columns[1]);
                }
            }

            frame.render_widget(render_status_line(state.status, theme), rows[1]);
            frame.render_widget(render_command_line(input, theme), rows[2]);

            if state.mode == AppMode::Help {
                let popup = centered(area, 64, 14);
                frame.render_widget(Clear, popup);
                frame.render_widget(render_help(theme), popup);
            }
        })?;

        Ok(())
    }
}

/// Applies one key press to the command line buffer and the app.
pub fn handle_key(app: &mut App, input: &mut String, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.handle_event(AppEvent::Quit);
        return;
    }

    if app.mode() == AppMode::Help {
        app.close_help();
        return;
    }

    match key.code {
        KeyCode::Enter => {
            let line = std::mem::take(input);
            let event = command_to_app_event(parse_command(&line));
            debug!(?event, "command entered");
            app.handle_event(event);
        }
        KeyCode::Esc => input.clear(),
        KeyCode::Backspace => {
            input.pop();
        }
        KeyCode::Tab => input.push('\t'),
        KeyCode::Up => app.select_previous_result(),
        KeyCode::Down => app.select_next_result(),
        KeyCode::Char(c) => input.push(c),
        _ => {}
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
