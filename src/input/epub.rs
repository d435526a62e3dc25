use super::{LoadError, LoadedDocument};
use epub::doc::EpubDoc;
use std::path::Path;
use tracing::debug;

/// Elements whose content is never reader-visible text.
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style"];

/// Elements that end a line of text.
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "br", "li", "tr", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "blockquote",
];

const ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&nbsp;", " "),
    // last, so "&amp;lt;" stays "&lt;"
    ("&amp;", "&"),
];

/// Every chapter's text in spine order, chapters separated by a blank line.
pub fn load(path: &str) -> Result<LoadedDocument, LoadError> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }

    let mut doc = EpubDoc::new(path).map_err(|e| LoadError::EpubParse(e.to_string()))?;
    let chapter_count = doc.get_num_chapters();
    if chapter_count == 0 {
        return Err(LoadError::EpubParse("no chapters in spine".to_string()));
    }

    let chapters: Vec<String> = (0..chapter_count)
        .filter_map(|index| {
            if !doc.set_current_chapter(index) {
                debug!(index, "skipping unreadable chapter");
                return None;
            }
            doc.get_current_str().map(|(xhtml, _mime)| chapter_text(&xhtml))
        })
        .filter(|text| !text.is_empty())
        .collect();

    if chapters.is_empty() {
        return Err(LoadError::EpubParse("no text in any chapter".to_string()));
    }

    LoadedDocument::new(chapters.join("\n\n"), format!("epub:{}", path.display()))
}

/// Visible text of one XHTML chapter, one non-blank line per block.
fn chapter_text(xhtml: &str) -> String {
    let mut text = String::with_capacity(xhtml.len() / 2);
    let mut hidden_depth = 0usize;
    let mut rest = xhtml;

    while let Some(start) = rest.find('<') {
        if hidden_depth == 0 {
            text.push_str(&rest[..start]);
        }
        let Some(len) = rest[start..].find('>') else {
            rest = "";
            break;
        };
        let tag = &rest[start + 1..start + len];
        rest = &rest[start + len + 1..];

        let closing = tag.starts_with('/');
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        let self_closing = tag.ends_with('/');

        if HIDDEN_ELEMENTS.contains(&name.as_str()) && !self_closing {
            hidden_depth = if closing {
                hidden_depth.saturating_sub(1)
            } else {
                hidden_depth + 1
            };
        } else if hidden_depth == 0 && BLOCK_ELEMENTS.contains(&name.as_str()) {
            text.push('\n');
        }
    }
    if hidden_depth == 0 {
        text.push_str(rest);
    }

    let decoded = ENTITIES
        .iter()
        .fold(text, |acc, (entity, plain)| acc.replace(entity, plain));

    decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epub_load_nonexistent_file() {
        let result = load("/nonexistent/path/book.epub");
        assert!(matches!(result, Err(LoadError::FileNotFound(_))));
    }

    #[test]
    fn test_epub_load_garbage_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.epub");
        std::fs::write(&path, b"not a zip archive").unwrap();
        let result = load(&path.to_string_lossy());
        assert!(matches!(result, Err(LoadError::EpubParse(_))));
    }

    #[test]
    fn test_chapter_text_strips_markup() {
        let xhtml = "<html><body><p>Hello World</p></body></html>";
        assert_eq!(chapter_text(xhtml), "Hello World");
    }

    #[test]
    fn test_chapter_text_decodes_entities() {
        let xhtml = "<p>if (a &lt; b) { &quot;x&quot; }</p>\n<p>  </p>\n<p>&amp;&amp; &amp;lt;</p>";
        assert_eq!(chapter_text(xhtml), "if (a < b) { \"x\" }\n&& &lt;");
    }

    #[test]
    fn test_chapter_text_skips_head_and_style() {
        let xhtml = "<html><head><title>T</title><style>p { x: 1 }</style></head>\
                     <body><p>one</p><p>two<br/>three</p></body></html>";
        assert_eq!(chapter_text(xhtml), "one\ntwo\nthree");
    }

    #[test]
    fn test_chapter_text_unterminated_tag() {
        assert_eq!(chapter_text("text <p"), "text");
    }
}
