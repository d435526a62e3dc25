//! Delimiter pairing over a token sequence.
//!
//! Runs three passes in priority order: distinct brackets, same-glyph quotes,
//! then whole-token markers. An index keeps the first annotation it receives.
//!
//! Pairs are resolved even when one of their indices is already claimed, so a
//! close can carry a slot whose open index shows an earlier pair's color. With
//! `["\"\"\"", "\""]` the first token opens and closes slot 0, then opens
//! slot 1; index 0 stays `Open` slot 0 while index 1 becomes `Close` slot 1.
//! `PairingResult::pairs` still lists both pairs.
//!
//! Within a token, glyphs are visited left to right across every definition of
//! a pass, and at any position the longest matching glyph wins. Tokens that are
//! exactly a marker string are left to the marker pass.

use super::catalog::SymbolCatalog;
use super::slot::ColorSlotAllocator;
use serde::Deserialize;

/// Number of distinct highlight colors renderers cycle through.
pub const PALETTE_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Open,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Annotation {
    pub color_slot: usize,
    pub role: Role,
}

impl Annotation {
    /// Palette entry for this annotation; a zero palette is treated as one color.
    pub fn palette_index(&self, palette_size: usize) -> usize {
        self.color_slot % palette_size.max(1)
    }
}

/// A resolved pair. Marker pairs may have `close_index < open_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairRecord {
    pub open_index: usize,
    pub close_index: usize,
    pub color_slot: usize,
}

/// How color slots are handed to marker pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerColoring {
    /// Every instance of one start/end definition shares a slot.
    #[default]
    PerDefinition,
    /// Each matched start/end instance gets its own slot.
    PerInstance,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PairingResult {
    annotations: Vec<Option<Annotation>>,
    pairs: Vec<PairRecord>,
}

impl PairingResult {
    /// Always equal to the number of tokens paired.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Annotation> {
        self.annotations.get(index).copied().flatten()
    }

    pub fn annotations(&self) -> &[Option<Annotation>] {
        &self.annotations
    }

    /// Every resolved pair in resolution order, including pairs whose
    /// indices were already claimed by an earlier pair. For those, the
    /// annotations at `open_index` and `close_index` may carry different
    /// slots.
    pub fn pairs(&self) -> &[PairRecord] {
        &self.pairs
    }

    pub fn annotated_count(&self) -> usize {
        self.annotations.iter().filter(|a| a.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<Annotation>)> + '_ {
        self.annotations.iter().copied().enumerate()
    }
}

/// Pairs `tokens` with per-definition marker coloring.
pub fn pair<S: AsRef<str>>(tokens: &[S], catalog: &SymbolCatalog) -> PairingResult {
    pair_with(tokens, catalog, MarkerColoring::default())
}

pub fn pair_with<S: AsRef<str>>(
    tokens: &[S],
    catalog: &SymbolCatalog,
    marker_coloring: MarkerColoring,
) -> PairingResult {
    let trimmed: Vec<Option<&str>> = tokens
        .iter()
        .map(|t| {
            let t = t.as_ref().trim();
            (!t.is_empty()).then_some(t)
        })
        .collect();

    let scannable: Vec<(usize, &str)> = trimmed
        .iter()
        .enumerate()
        .filter_map(|(i, t)| t.map(|t| (i, t)))
        .filter(|(_, t)| !catalog.is_marker_token(t))
        .collect();

    let mut run = Resolution::new(tokens.len());
    pair_distinct(&scannable, catalog, &mut run);
    pair_ambiguous(&scannable, catalog, &mut run);
    pair_markers(&trimmed, catalog, marker_coloring, &mut run);

    PairingResult {
        annotations: run.annotations,
        pairs: run.pairs,
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    index: usize,
    slot: usize,
}

struct Resolution {
    annotations: Vec<Option<Annotation>>,
    pairs: Vec<PairRecord>,
    slots: ColorSlotAllocator,
}

impl Resolution {
    fn new(len: usize) -> Self {
        Self {
            annotations: vec![None; len],
            pairs: Vec::new(),
            slots: ColorSlotAllocator::new(),
        }
    }

    fn open(&mut self, index: usize) -> Pending {
        Pending {
            index,
            slot: self.slots.next(),
        }
    }

    fn resolve(&mut self, open: Pending, close_index: usize) {
        self.pairs.push(PairRecord {
            open_index: open.index,
            close_index,
            color_slot: open.slot,
        });
        self.claim(open.index, open.slot, Role::Open);
        self.claim(close_index, open.slot, Role::Close);
    }

    fn claim(&mut self, index: usize, color_slot: usize, role: Role) {
        if let Some(entry) = self.annotations.get_mut(index) {
            if entry.is_none() {
                *entry = Some(Annotation { color_slot, role });
            }
        }
    }
}

struct Glyph<'a, K> {
    text: &'a str,
    kind: K,
}

/// Longest glyphs first; the sort is stable so equal lengths keep catalog order.
fn by_length<K>(mut glyphs: Vec<Glyph<'_, K>>) -> Vec<Glyph<'_, K>> {
    glyphs.sort_by(|a, b| b.text.len().cmp(&a.text.len()));
    glyphs
}

/// Yields the kind of every glyph occurrence in `text`, left to right.
fn occurrences<'a, K: Copy>(
    text: &'a str,
    glyphs: &'a [Glyph<'a, K>],
) -> impl Iterator<Item = K> + 'a {
    let mut pos = 0;
    std::iter::from_fn(move || {
        while pos < text.len() {
            let rest = &text[pos..];
            if let Some(glyph) = glyphs.iter().find(|g| rest.starts_with(g.text)) {
                pos += glyph.text.len();
                return Some(glyph.kind);
            }
            pos += rest.chars().next().map_or(1, char::len_utf8);
        }
        None
    })
}

#[derive(Clone, Copy)]
enum Bracket {
    Open(usize),
    Close(usize),
}

fn pair_distinct(tokens: &[(usize, &str)], catalog: &SymbolCatalog, run: &mut Resolution) {
    let glyphs = by_length(
        catalog
            .distinct_pairs()
            .enumerate()
            .flat_map(|(def, (open, close))| {
                [
                    Glyph { text: open, kind: Bracket::Open(def) },
                    Glyph { text: close, kind: Bracket::Close(def) },
                ]
            })
            .collect(),
    );
    let mut stacks: Vec<Vec<Pending>> = vec![Vec::new(); catalog.distinct_pairs().count()];

    for &(index, text) in tokens {
        for bracket in occurrences(text, &glyphs) {
            match bracket {
                Bracket::Open(def) => {
                    let pending = run.open(index);
                    stacks[def].push(pending);
                }
                Bracket::Close(def) => {
                    if let Some(open) = stacks[def].pop() {
                        run.resolve(open, index);
                    }
                }
            }
        }
    }
}

/// An occurrence closes the pending instance of its glyph if there is one,
/// otherwise it opens a new one.
fn pair_ambiguous(tokens: &[(usize, &str)], catalog: &SymbolCatalog, run: &mut Resolution) {
    let glyphs = by_length(
        catalog
            .ambiguous_glyphs()
            .enumerate()
            .map(|(def, text)| Glyph { text, kind: def })
            .collect(),
    );
    let mut pending: Vec<Option<Pending>> = vec![None; glyphs.len()];

    for &(index, text) in tokens {
        for def in occurrences(text, &glyphs) {
            match pending[def].take() {
                Some(open) => run.resolve(open, index),
                None => pending[def] = Some(run.open(index)),
            }
        }
    }
}

fn pair_markers(
    tokens: &[Option<&str>],
    catalog: &SymbolCatalog,
    coloring: MarkerColoring,
    run: &mut Resolution,
) {
    let positions = |needle: &str| -> Vec<usize> {
        tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == Some(needle))
            .map(|(i, _)| i)
            .collect()
    };

    let mut groups: Vec<(Vec<usize>, Vec<usize>)> = catalog
        .marker_pairs()
        .map(|(start, end)| (positions(start), positions(end)))
        .filter(|(starts, ends)| !starts.is_empty() && starts.len() == ends.len())
        .collect();
    groups.sort_by_key(|(starts, ends)| starts[0].min(ends[0]));

    for (starts, ends) in groups {
        let shared = match coloring {
            MarkerColoring::PerDefinition => Some(run.slots.next()),
            MarkerColoring::PerInstance => None,
        };
        for (&start, &end) in starts.iter().zip(&ends) {
            let slot = shared.unwrap_or_else(|| run.slots.next());
            run.resolve(Pending { index: start, slot }, end);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SymbolDefinition;

    fn annotate(tokens: &[&str]) -> PairingResult {
        pair(tokens, &SymbolCatalog::standard())
    }

    fn open(color_slot: usize) -> Option<Annotation> {
        Some(Annotation { color_slot, role: Role::Open })
    }

    fn close(color_slot: usize) -> Option<Annotation> {
        Some(Annotation { color_slot, role: Role::Close })
    }

    #[test]
    fn test_single_pair() {
        let result = annotate(&["(", "a", ")"]);
        assert_eq!(result.annotations(), &[open(0), None, close(0)]);
        assert_eq!(
            result.pairs(),
            &[PairRecord { open_index: 0, close_index: 2, color_slot: 0 }]
        );
    }

    #[test]
    fn test_unmatched_close_is_ignored() {
        let result = annotate(&[")", "a"]);
        assert_eq!(result.len(), 2);
        assert_eq!(result.annotated_count(), 0);
    }

    #[test]
    fn test_unmatched_open_is_discarded() {
        let result = annotate(&["(", "a", "("]);
        assert_eq!(result.annotated_count(), 0);
        assert!(result.pairs().is_empty());
    }

    #[test]
    fn test_same_type_nesting() {
        let result = annotate(&["(", "(", "a", ")", ")"]);
        assert_eq!(
            result.annotations(),
            &[open(0), open(1), None, close(1), close(0)]
        );
    }

    #[test]
    fn test_mismatched_types_never_cross() {
        let result = annotate(&["(", "[", ")", "]"]);
        assert_eq!(result.annotations(), &[open(0), open(1), close(0), close(1)]);
    }

    #[test]
    fn test_substring_occurrences_are_counted() {
        let result = annotate(&["f(x", ",", "g(y))"]);
        // "g(y))" opens slot 1, closes it, then closes slot 0
        assert_eq!(result.annotations(), &[open(0), None, open(1)]);
        assert_eq!(result.pairs().len(), 2);
        assert_eq!(result.pairs()[1].open_index, 0);
        assert_eq!(result.pairs()[1].close_index, 2);
    }

    #[test]
    fn test_close_before_open_inside_one_token() {
        let result = annotate(&["(", ")(", ")"]);
        assert_eq!(result.annotations(), &[open(0), close(0), close(1)]);
    }

    #[test]
    fn test_token_of_repeated_glyph() {
        let result = annotate(&["((((", "))))"]);
        assert_eq!(result.pairs().len(), 4);
        assert_eq!(result.annotations(), &[open(3), close(3)]);
    }

    #[test]
    fn test_whitespace_tokens_are_skipped() {
        let result = annotate(&["  ", "(", "\n", ")", ""]);
        assert_eq!(result.annotations(), &[None, open(0), None, close(0), None]);
    }

    #[test]
    fn test_cjk_and_curly_quotes() {
        let result = annotate(&["「", "你好", "」", "\u{201C}hi\u{201D}"]);
        assert_eq!(result.annotations(), &[open(0), None, close(0), open(1)]);
    }

    #[test]
    fn test_ambiguous_quote_pairs() {
        let result = annotate(&["\"", "hi", "\"", "'"]);
        assert_eq!(result.annotations(), &[open(0), None, close(0), None]);
    }

    #[test]
    fn test_ambiguous_pass_does_not_overwrite_brackets() {
        let result = annotate(&["(\"", "x", ")\""]);
        assert_eq!(result.annotations(), &[open(0), None, close(0)]);
        assert_eq!(result.pairs().len(), 2);
        assert_eq!(result.pairs()[1].color_slot, 1);
    }

    #[test]
    fn test_close_slot_can_differ_from_claimed_open() {
        let result = annotate(&["\"\"\"", "\""]);
        assert_eq!(result.annotations(), &[open(0), close(1)]);
        assert_eq!(
            result.pairs(),
            &[
                PairRecord { open_index: 0, close_index: 0, color_slot: 0 },
                PairRecord { open_index: 0, close_index: 1, color_slot: 1 },
            ]
        );
    }

    #[test]
    fn test_code_fence_beats_backtick() {
        let result = annotate(&["```rust", "let", "`x`", "```"]);
        assert_eq!(result.annotations(), &[open(0), None, open(1), close(0)]);
    }

    #[test]
    fn test_markers_pair_positionally() {
        let result = annotate(&["<s>", "a", "</s>", "<s>", "b", "</s>"]);
        assert_eq!(
            result.annotations(),
            &[open(0), None, close(0), open(0), None, close(0)]
        );
        let spans: Vec<_> = result.pairs().iter().map(|p| (p.open_index, p.close_index)).collect();
        assert_eq!(spans, vec![(0, 2), (3, 5)]);
    }

    #[test]
    fn test_markers_per_instance_coloring() {
        let tokens = ["<s>", "a", "</s>", "<s>", "b", "</s>"];
        let result = pair_with(&tokens, &SymbolCatalog::standard(), MarkerColoring::PerInstance);
        assert_eq!(
            result.annotations(),
            &[open(0), None, close(0), open(1), None, close(1)]
        );
    }

    #[test]
    fn test_markers_require_equal_counts() {
        let result = annotate(&["<s>", "a", "<s>", "b", "</s>"]);
        assert_eq!(result.annotated_count(), 0);
    }

    #[test]
    fn test_markers_pair_regardless_of_order() {
        let result = annotate(&["</s>", "x", "<s>"]);
        assert_eq!(result.annotations(), &[close(0), None, open(0)]);
    }

    #[test]
    fn test_marker_tokens_are_not_scanned_for_brackets() {
        let result = annotate(&["[CLS]", "(", "<s>", ")", "[SEP]", "</s>"]);
        // "(" takes slot 0; [CLS] appears first so its group takes slot 1
        assert_eq!(
            result.annotations(),
            &[open(1), open(0), open(2), close(0), close(1), close(2)]
        );
    }

    #[test]
    fn test_palette_index_wraps() {
        let mut tokens = vec!["("; 10];
        tokens.extend(vec![")"; 10]);
        let result = annotate(&tokens);
        let innermost = result.get(9).unwrap();
        assert_eq!(innermost.color_slot, 9);
        assert_eq!(innermost.palette_index(PALETTE_SIZE), 1);
        assert_eq!(innermost.palette_index(0), 0);
        assert_eq!(result.get(10), Some(innermost).map(|a| Annotation { role: Role::Close, ..a }));
    }

    #[test]
    fn test_empty_sequence() {
        let tokens: [&str; 0] = [];
        let result = annotate(&tokens);
        assert!(result.is_empty());
        assert!(result.pairs().is_empty());
    }

    #[test]
    fn test_custom_catalog_without_engine_change() {
        let catalog = SymbolCatalog::new(
            2,
            vec![
                SymbolDefinition::distinct("begin", "end"),
                SymbolDefinition::marker("<think>", "</think>"),
            ],
        );
        let result = pair(&["begin", "<think>", "x", "end", "</think>"], &catalog);
        assert_eq!(
            result.annotations(),
            &[open(0), open(1), None, close(0), close(1)]
        );
    }
}
