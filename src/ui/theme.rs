use crate::engine::config::{Config, ThemeConfig};
use crate::engine::Annotation;
use ratatui::style::Color;
use tracing::warn;

/// Midnight theme colors plus the pair highlight palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub dimmed: Color,
    pub accent: Color,
    pub warning: Color,
    pub error: Color,
    /// Backgrounds alternated between neighbouring preview tokens.
    pub token_backgrounds: [Color; 2],
    pub pair_colors: Vec<Color>,
    /// Slots are reduced modulo this before indexing `pair_colors`.
    pub palette_size: usize,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::midnight()
    }
}

impl Theme {
    pub fn midnight() -> Self {
        let defaults = ThemeConfig::default();
        Self {
            background: Color::Rgb(26, 27, 38), // #1A1B26 Stormy Dark
            text: Color::Rgb(169, 177, 214),    // #A9B1D6 Light Blue
            dimmed: Color::Rgb(100, 110, 150),  // #646E96 Dimmed Blue
            accent: Color::Rgb(122, 162, 247),  // #7AA2F7
            warning: Color::Rgb(224, 175, 104), // #E0AF68
            error: Color::Rgb(247, 118, 142),   // #F7768E Coral Red
            token_backgrounds: [Color::Rgb(36, 40, 59), Color::Rgb(47, 53, 77)],
            pair_colors: parse_palette(&defaults.pair_colors),
            palette_size: defaults.pair_colors.len(),
        }
    }

    /// Midnight with the configured pair palette. Unparseable colors are
    /// skipped; an empty result keeps the default palette.
    pub fn from_config(config: &Config) -> Self {
        let mut theme = Self::midnight();
        let colors = parse_palette(&config.theme.pair_colors);
        if colors.is_empty() {
            warn!("no usable pair colors configured, keeping defaults");
        } else {
            theme.pair_colors = colors;
        }
        theme.palette_size = config.pairing.palette_size;
        theme
    }

    /// Highlight color for an annotated token.
    pub fn pair_color(&self, annotation: &Annotation) -> Color {
        let index = annotation.palette_index(self.palette_size);
        self.pair_colors
            .get(index % self.pair_colors.len().max(1))
            .copied()
            .unwrap_or(self.accent)
    }

    pub fn token_background(&self, index: usize) -> Color {
        self.token_backgrounds[index % 2]
    }
}

fn parse_palette(colors: &[String]) -> Vec<Color> {
    colors
        .iter()
        .filter_map(|raw| match parse_hex(raw) {
            Some((r, g, b)) => Some(Color::Rgb(r, g, b)),
            None => {
                warn!(color = %raw, "ignoring invalid pair color");
                None
            }
        })
        .collect()
}

/// Parses `#RRGGBB` (the `#` is optional).
pub fn parse_hex(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// The same color for crossterm output in plain mode.
pub fn to_crossterm(color: Color) -> crossterm::style::Color {
    match color {
        Color::Rgb(r, g, b) => crossterm::style::Color::Rgb { r, g, b },
        _ => crossterm::style::Color::Reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Role;

    fn open(slot: usize) -> Annotation {
        Annotation {
            color_slot: slot,
            role: Role::Open,
        }
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#F7768E"), Some((247, 118, 142)));
        assert_eq!(parse_hex("00ff10"), Some((0, 255, 16)));
        assert_eq!(parse_hex("#FFF"), None);
        assert_eq!(parse_hex("#GG0000"), None);
        assert_eq!(parse_hex("#ÿÿÿ"), None);
    }

    #[test]
    fn test_midnight_palette_has_eight_colors() {
        let theme = Theme::midnight();
        assert_eq!(theme.pair_colors.len(), 8);
        assert_eq!(theme.palette_size, 8);
        assert_eq!(theme.pair_colors[0], Color::Rgb(247, 118, 142));
    }

    #[test]
    fn test_pair_color_wraps_palette() {
        let theme = Theme::midnight();
        assert_eq!(theme.pair_color(&open(0)), theme.pair_color(&open(8)));
        assert_ne!(theme.pair_color(&open(0)), theme.pair_color(&open(1)));
    }

    #[test]
    fn test_from_config_with_smaller_palette() {
        let mut config = Config::default();
        config.pairing.palette_size = 2;
        config.theme.pair_colors = vec!["#000000".into(), "bogus".into(), "#FFFFFF".into()];

        let theme = Theme::from_config(&config);
        assert_eq!(theme.pair_colors.len(), 2);
        assert_eq!(theme.pair_color(&open(0)), Color::Rgb(0, 0, 0));
        assert_eq!(theme.pair_color(&open(1)), Color::Rgb(255, 255, 255));
        assert_eq!(theme.pair_color(&open(2)), Color::Rgb(0, 0, 0));
    }

    #[test]
    fn test_from_config_without_usable_colors_keeps_defaults() {
        let mut config = Config::default();
        config.theme.pair_colors = vec!["nope".into()];
        let theme = Theme::from_config(&config);
        assert_eq!(theme.pair_colors, Theme::midnight().pair_colors);
    }

    #[test]
    fn test_palette_larger_than_color_list() {
        let mut config = Config::default();
        config.pairing.palette_size = 16;
        let theme = Theme::from_config(&config);
        // slot 9 reduces to 9 and wraps onto the 8 colors
        assert_eq!(theme.pair_color(&open(9)), theme.pair_colors[1]);
    }

    #[test]
    fn test_to_crossterm() {
        assert_eq!(
            to_crossterm(Color::Rgb(1, 2, 3)),
            crossterm::style::Color::Rgb { r: 1, g: 2, b: 3 }
        );
        assert_eq!(to_crossterm(Color::Red), crossterm::style::Color::Reset);
    }
}
