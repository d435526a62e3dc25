//! Making decoded tokens safe and visible on a terminal.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Shown for a token that decodes to nothing.
pub const EMPTY_TOKEN: &str = "∅";

/// Replaces whitespace and control characters with visible symbols so token
/// boundaries stay readable and raw escape sequences never reach the terminal.
pub fn display_token(token: &str) -> String {
    if token.is_empty() {
        return EMPTY_TOKEN.to_string();
    }

    let mut out = String::with_capacity(token.len());
    for c in token.chars() {
        match c {
            ' ' => out.push('·'),
            '\n' => out.push('↵'),
            '\r' => out.push('␍'),
            '\t' => out.push('⇥'),
            // C0 controls map onto the Control Pictures block
            c if (c as u32) < 0x20 => {
                out.push(char::from_u32(0x2400 + c as u32).unwrap_or('�'));
            }
            '\u{7f}' => out.push('␡'),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Cuts `text` to at most `max_width` terminal columns without splitting a
/// grapheme, ending with `…` when anything was removed.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let width = grapheme.width();
        if used + width > max_width - 1 {
            break;
        }
        out.push_str(grapheme);
        used += width;
    }
    out.push('…');
    out
}

/// Folds line breaks and tabs into spaces and hides other control
/// characters, for showing a stretch of input text on one line.
pub fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '·',
            c => c,
        })
        .collect()
}
