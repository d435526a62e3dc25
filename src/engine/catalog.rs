//! Delimiter catalog consumed by the pairing engine.
//!
//! Three kinds of definitions exist: distinct open/close glyphs, glyphs that
//! act as both open and close, and whole-token start/end markers.

use serde::Deserialize;

/// Bumped whenever the standard definition lists change.
pub const STANDARD_CATALOG_VERSION: u32 = 1;

const DISTINCT_PAIRS: &[(&str, &str)] = &[
    ("(", ")"),
    ("[", "]"),
    ("{", "}"),
    ("<", ">"),
    ("（", "）"),
    ("【", "】"),
    ("［", "］"),
    ("｛", "｝"),
    ("「", "」"),
    ("『", "』"),
    ("〈", "〉"),
    ("《", "》"),
    ("\u{201C}", "\u{201D}"),
    ("\u{2018}", "\u{2019}"),
];

const AMBIGUOUS_GLYPHS: &[&str] = &["\"", "'", "`", "```"];

const MARKER_PAIRS: &[(&str, &str)] = &[
    ("<|start|>", "<|end|>"),
    ("<s>", "</s>"),
    ("<bos>", "<eos>"),
    ("[CLS]", "[SEP]"),
    ("<|im_start|>", "<|im_end|>"),
    ("<|begin|>", "<|finish|>"),
    ("<|begin_of_text|>", "<|end_of_text|>"),
    ("<|startoftext|>", "<|endoftext|>"),
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SymbolDefinition {
    /// Open and close differ; each definition keeps its own stack.
    Distinct { open: String, close: String },
    /// One glyph serves as both open and close.
    Ambiguous { glyph: String },
    /// Full-token sentinels paired by occurrence count.
    Marker { start: String, end: String },
}

impl SymbolDefinition {
    pub fn distinct(open: &str, close: &str) -> Self {
        Self::Distinct {
            open: open.to_string(),
            close: close.to_string(),
        }
    }

    pub fn ambiguous(glyph: &str) -> Self {
        Self::Ambiguous {
            glyph: glyph.to_string(),
        }
    }

    pub fn marker(start: &str, end: &str) -> Self {
        Self::Marker {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    fn is_usable(&self) -> bool {
        match self {
            Self::Distinct { open, close } => !open.is_empty() && !close.is_empty() && open != close,
            Self::Ambiguous { glyph } => !glyph.is_empty(),
            Self::Marker { start, end } => !start.is_empty() && !end.is_empty() && start != end,
        }
    }
}

/// Read-only set of delimiter definitions, shared across pairing runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolCatalog {
    version: u32,
    definitions: Vec<SymbolDefinition>,
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl SymbolCatalog {
    /// Builds a catalog, dropping definitions with empty or self-identical glyphs.
    pub fn new(version: u32, definitions: Vec<SymbolDefinition>) -> Self {
        Self {
            version,
            definitions: definitions.into_iter().filter(|d| d.is_usable()).collect(),
        }
    }

    /// Brackets, quotes and model control markers.
    pub fn standard() -> Self {
        let definitions = DISTINCT_PAIRS
            .iter()
            .map(|(open, close)| SymbolDefinition::distinct(open, close))
            .chain(AMBIGUOUS_GLYPHS.iter().map(|g| SymbolDefinition::ambiguous(g)))
            .chain(
                MARKER_PAIRS
                    .iter()
                    .map(|(start, end)| SymbolDefinition::marker(start, end)),
            )
            .collect();
        Self::new(STANDARD_CATALOG_VERSION, definitions)
    }

    /// Returns a copy with `extra` appended after the existing definitions.
    pub fn extended<I>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = SymbolDefinition>,
    {
        let mut definitions = self.definitions.clone();
        definitions.extend(extra);
        Self::new(self.version, definitions)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn definitions(&self) -> &[SymbolDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn distinct_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.definitions.iter().filter_map(|d| match d {
            SymbolDefinition::Distinct { open, close } => Some((open.as_str(), close.as_str())),
            _ => None,
        })
    }

    pub fn ambiguous_glyphs(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().filter_map(|d| match d {
            SymbolDefinition::Ambiguous { glyph } => Some(glyph.as_str()),
            _ => None,
        })
    }

    pub fn marker_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.definitions.iter().filter_map(|d| match d {
            SymbolDefinition::Marker { start, end } => Some((start.as_str(), end.as_str())),
            _ => None,
        })
    }

    /// True when `token` is exactly the start or end string of some marker.
    pub fn is_marker_token(&self, token: &str) -> bool {
        self.marker_pairs()
            .any(|(start, end)| token == start || token == end)
    }
}
