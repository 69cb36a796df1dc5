//! Frontmatter boundary detection
//!
//! A [`Document`] is the raw text of a post with the span of its frontmatter
//! block, if any. The block opens with `---` and closes at the next `---`
//! found searching from the fourth character onward. The search is textual:
//! it does not require the closing marker to sit on its own line, so a body
//! `---` is picked up when the real closing line is missing.

/// Delimiter line marking both ends of a frontmatter block
pub const DELIMITER: &str = "---";

/// Byte range of a frontmatter block within its document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontMatterSpan {
    /// Offset of the opening delimiter
    pub start: usize,
    /// Offset of the closing delimiter
    pub end: usize,
}

/// A post document: raw text plus its frontmatter span
#[derive(Debug, Clone)]
pub struct Document {
    raw: String,
    span: Option<FrontMatterSpan>,
}

impl Document {
    /// Parse the frontmatter span out of `raw`
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let span = closing_delimiter(&raw).map(|end| FrontMatterSpan { start: 0, end });
        Self { raw, span }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn into_raw(self) -> String {
        self.raw
    }

    pub fn span(&self) -> Option<FrontMatterSpan> {
        self.span
    }

    pub fn has_front_matter(&self) -> bool {
        self.span.is_some()
    }

    /// Frontmatter text between the two delimiters, excluding both
    pub fn front_matter(&self) -> Option<&str> {
        let span = self.span?;
        self.raw.get(span.start + DELIMITER.len()..span.end)
    }

    /// Text from the closing delimiter onward, or the whole text without frontmatter
    pub fn body(&self) -> &str {
        match self.span {
            Some(span) => &self.raw[span.end..],
            None => &self.raw,
        }
    }
}

/// Offset of the closing `---`, searching from character offset 3.
///
/// Documents shorter than four characters have no room for a closing
/// delimiter and yield `None`.
pub fn closing_delimiter(content: &str) -> Option<usize> {
    let from = content.char_indices().nth(DELIMITER.len()).map(|(i, _)| i)?;
    content[from..].find(DELIMITER).map(|pos| from + pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = "---\ntitle: Hello\ndate: 2024-03-07\n---\nBody text.\n";

    #[test]
    fn test_closing_delimiter() {
        assert_eq!(closing_delimiter(POST), Some(34));
        assert_eq!(&POST[34..37], "---");
    }

    #[test]
    fn test_no_closing_delimiter() {
        assert_eq!(closing_delimiter("---\ntitle: Hello\n"), None);
        assert_eq!(closing_delimiter("---"), None);
        assert_eq!(closing_delimiter(""), None);
    }

    #[test]
    fn test_search_starts_at_char_offset_three() {
        // "----" has a second marker starting at offset 1, which is before the search window
        assert_eq!(closing_delimiter("----"), None);
        assert_eq!(closing_delimiter("------"), Some(3));
        // multi-byte characters count as one character each
        assert_eq!(closing_delimiter("ééé---"), Some(6));
    }

    #[test]
    fn test_body_marker_is_picked_up_without_closing_line() {
        let doc = Document::parse("---\ntitle: Hi\nBody\n---\nmore");
        assert!(doc.has_front_matter());
        assert_eq!(doc.body(), "---\nmore");
    }

    #[test]
    fn test_document_accessors() {
        let doc = Document::parse(POST);
        assert_eq!(doc.front_matter(), Some("\ntitle: Hello\ndate: 2024-03-07\n"));
        assert_eq!(doc.body(), "---\nBody text.\n");
    }

    #[test]
    fn test_document_without_front_matter() {
        let doc = Document::parse("Just a body");
        assert!(!doc.has_front_matter());
        assert_eq!(doc.front_matter(), None);
        assert_eq!(doc.body(), "Just a body");
    }
}
