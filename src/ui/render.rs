use crate::app::state::{StatusLevel, StatusMessage};
use crate::app::ModelRow;
use crate::engine::Role;
use crate::tokenize::{ModelReport, Report};
use crate::ui::sanitize::{display_token, single_line, truncate_to_width};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

const NAME_WIDTH: usize = 32;

fn panel<'a>(title: impl Into<Line<'a>>, theme: &Theme) -> Block<'a> {
    let title: Line<'a> = title.into();
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dimmed))
        .title(title)
        .style(Style::default().bg(theme.background))
}

pub fn render_model_list(rows: &[ModelRow], theme: &Theme) -> Paragraph<'static> {
    let lines: Vec<Line> = rows
        .iter()
        .map(|row| {
            let mark = if row.selected { "[x] " } else { "[ ] " };
            let style = if row.available {
                Style::default().fg(theme.text)
            } else {
                Style::default().fg(theme.dimmed)
            };
            let mut spans = vec![
                Span::styled(mark, Style::default().fg(theme.accent)),
                Span::styled(row.key.clone(), style.add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("  {}", truncate_to_width(&row.name, NAME_WIDTH)),
                    Style::default().fg(theme.dimmed),
                ),
            ];
            if !row.available {
                spans.push(Span::styled(" (missing)", Style::default().fg(theme.dimmed)));
            }
            Line::from(spans)
        })
        .collect();

    let selected = rows.iter().filter(|r| r.selected).count();
    Paragraph::new(lines).block(panel(format!(" Models {selected}/{} ", rows.len()), theme))
}

/// Source, size and average token count of the loaded text, then the start
/// of the text itself.
pub fn render_summary(
    source: Option<&str>,
    char_count: usize,
    text_preview: Option<&str>,
    report: Option<&Report>,
    theme: &Theme,
) -> Paragraph<'static> {
    let label = Style::default().fg(theme.dimmed);
    let value = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);

    let lines = match source {
        None => vec![Line::from(Span::styled(
            "No text loaded. Type text, @file or @@ for the clipboard.",
            label,
        ))],
        Some(source) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Source      ", label),
                    Span::styled(source.to_string(), value),
                ]),
                Line::from(vec![
                    Span::styled("Characters  ", label),
                    Span::styled(char_count.to_string(), value),
                ]),
            ];
            if let Some(report) = report.filter(|r| !r.results.is_empty()) {
                lines.push(Line::from(vec![
                    Span::styled("Avg tokens  ", label),
                    Span::styled(report.average_tokens().to_string(), value),
                ]));
            }
            if let Some(preview) = text_preview {
                lines.push(Line::from(Span::styled(
                    single_line(preview),
                    Style::default().fg(theme.text),
                )));
            }
            lines
        }
    };

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(panel(" Summary ", theme))
}

pub fn render_results_table(report: &Report, selected: usize, theme: &Theme) -> Table<'static> {
    let header = Row::new(vec!["Model", "Tokens", "Chars/Token", "Pairs"])
        .style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));

    let mut rows: Vec<Row> = report
        .results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let style = if i == selected {
                Style::default()
                    .fg(theme.background)
                    .bg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            Row::new(vec![
                Cell::from(result.model.clone()),
                Cell::from(result.token_count.to_string()),
                Cell::from(format!("{:.2}", result.char_per_token)),
                Cell::from(result.pairing.pairs().len().to_string()),
            ])
            .style(style)
        })
        .collect();

    rows.extend(report.failures.iter().map(|failure| {
        Row::new(vec![
            Cell::from(failure.model.clone()),
            Cell::from("error"),
            Cell::from(truncate_to_width(&failure.error, 40)),
            Cell::from(""),
        ])
        .style(Style::default().fg(theme.error))
    }));

    Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(panel(" Results (↑/↓ to choose) ", theme))
}

/// One span per preview token. Paired tokens take their pair color, opens in
/// bold and closes bold and underlined; neighbours alternate backgrounds.
pub fn preview_spans(result: &ModelReport, theme: &Theme) -> Vec<Span<'static>> {
    result
        .preview
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let base = Style::default().bg(theme.token_background(i));
            let style = match result.pairing.get(i) {
                Some(annotation) => {
                    let style = base
                        .fg(theme.pair_color(&annotation))
                        .add_modifier(Modifier::BOLD);
                    match annotation.role {
                        Role::Open => style,
                        Role::Close => style.add_modifier(Modifier::UNDERLINED),
                    }
                }
                None => base.fg(theme.text),
            };
            Span::styled(display_token(token), style)
        })
        .collect()
}

pub fn render_token_preview(result: &ModelReport, theme: &Theme) -> Paragraph<'static> {
    let title = if result.is_truncated() {
        format!(
            " {} · first {} of {} tokens ",
            result.model_name,
            result.preview.len(),
            result.token_count
        )
    } else {
        format!(" {} · {} tokens ", result.model_name, result.token_count)
    };

    Paragraph::new(Line::from(preview_spans(result, theme)))
        .wrap(Wrap { trim: false })
        .block(panel(title, theme))
}

pub fn render_status_line(status: Option<&StatusMessage>, theme: &Theme) -> Line<'static> {
    match status {
        None => Line::from(Span::styled(
            ":h help  :q quit",
            Style::default().fg(theme.dimmed),
        )),
        Some(status) => {
            let color = match status.level {
                StatusLevel::Info => theme.text,
                StatusLevel::Warning => theme.warning,
                StatusLevel::Error => theme.error,
            };
            Line::from(Span::styled(status.text.clone(), Style::default().fg(color)))
        }
    }
}

pub fn render_command_line(input: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled("> ", Style::default().fg(theme.accent)),
        Span::styled(display_command(input), Style::default().fg(theme.text)),
        Span::styled("▏", Style::default().fg(theme.accent)),
    ])
}

/// Pasted tabs and newlines show as dots on the one-line input.
fn display_command(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_control() { '·' } else { c })
        .collect()
}

pub fn render_help(theme: &Theme) -> Paragraph<'static> {
    let entries = [
        ("text", "tokenize the typed text"),
        ("@path", "load a text, PDF or EPUB file"),
        ("@@", "load the clipboard"),
        (":m KEY", "toggle a model"),
        (":all / :none", "select every model / no model"),
        (":r", "tokenize again"),
        ("↑ / ↓", "choose the result to preview"),
        (":q / Ctrl+C", "quit"),
    ];
    let mut lines: Vec<Line> = entries
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(
                    format!("{keys:<14}"),
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                ),
                Span::styled(*what, Style::default().fg(theme.text)),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Paired tokens share a color: bold opens, underlined closes.",
        Style::default().fg(theme.dimmed),
    )));
    lines.push(Line::from(Span::styled(
        "Press any key to close.",
        Style::default().fg(theme.dimmed),
    )));

    Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(panel(" Help ", theme))
}
