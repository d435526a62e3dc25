//! Plain output for `--plain` and `--list-models`.

use crate::engine::Role;
use crate::tokenize::{ModelInfo, ModelReport, Report};
use crate::ui::sanitize::{display_token, single_line};
use crate::ui::theme::{to_crossterm, Theme};
use crossterm::style::Stylize;
use std::io::{self, Write};

const SEPARATOR: &str = "│";

pub fn write_model_list<W: Write>(out: &mut W, models: &[ModelInfo]) -> io::Result<()> {
    let width = models.iter().map(|m| m.key.len()).max().unwrap_or(0);
    for model in models {
        let state = if model.available { "available" } else { "missing" };
        writeln!(out, "{:<width$}  {:<9}  {}", model.key, state, model.name)?;
    }
    Ok(())
}

/// Writes the report. With a theme, paired tokens are colored with ANSI
/// escapes; without one, pairs are listed by index instead.
pub fn write_report<W: Write>(out: &mut W, report: &Report, theme: Option<&Theme>) -> io::Result<()> {
    writeln!(out, "Text length: {} characters", report.text_length)?;
    if !report.text_preview.is_empty() {
        writeln!(out, "Text preview: {}", single_line(&report.text_preview))?;
    }
    if !report.results.is_empty() {
        writeln!(out, "Average tokens: {}", report.average_tokens())?;
    }

    for result in &report.results {
        writeln!(out)?;
        write_model(out, result, theme)?;
    }

    for failure in &report.failures {
        writeln!(out)?;
        writeln!(out, "{}: error: {}", failure.model, failure.error)?;
    }
    Ok(())
}

fn write_model<W: Write>(out: &mut W, result: &ModelReport, theme: Option<&Theme>) -> io::Result<()> {
    writeln!(out, "{} ({})", result.model, result.model_name)?;
    writeln!(
        out,
        "  tokens: {}  chars/token: {:.2}  pairs: {}",
        result.token_count,
        result.char_per_token,
        result.pairing.pairs().len()
    )?;

    if result.is_truncated() {
        write!(out, "  preview (first {} of {}): ", result.preview.len(), result.token_count)?;
    } else {
        write!(out, "  preview: ")?;
    }
    for (i, token) in result.preview.iter().enumerate() {
        if i > 0 {
            write!(out, "{SEPARATOR}")?;
        }
        let text = display_token(token);
        match (theme, result.pairing.get(i)) {
            (Some(theme), Some(annotation)) => {
                let styled = text.with(to_crossterm(theme.pair_color(&annotation))).bold();
                match annotation.role {
                    Role::Open => write!(out, "{styled}")?,
                    Role::Close => write!(out, "{}", styled.underlined())?,
                }
            }
            _ => write!(out, "{text}")?,
        }
    }
    writeln!(out)?;

    if theme.is_none() && !result.pairing.pairs().is_empty() {
        let pairs: Vec<String> = result
            .pairing
            .pairs()
            .iter()
            .map(|p| format!("{}-{}#{}", p.open_index, p.close_index, p.color_slot))
            .collect();
        writeln!(out, "  pairs (open-close#slot): {}", pairs.join(" "))?;
    }
    Ok(())
}
