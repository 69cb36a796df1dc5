//! Frontmatter edits applied to a post's raw text
//!
//! Each edit is pure: it takes the full text and returns either the rewritten
//! text or the reason it left the text alone. Re-running an edit on its own
//! output is a skip for any well-formed frontmatter block.

use crate::core::front_matter::{Document, DELIMITER};
use crate::error::Result;
use regex::Regex;
use std::fmt;

/// Layout value written by [`Edit::InsertLayout`] when none is configured
pub const DEFAULT_LAYOUT: &str = "single_post.njk";

/// Line spliced in by [`Edit::AddDefaultTag`]
const DEFAULT_TAG_LINE: &str = "tags: post\n";

/// Replacement for the categories/portfolio list
const PORTFOLIO_TAG: &str = "tags: portfolio";

/// The frontmatter mutations available to the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Add `layout: <layout>` after the title line
    InsertLayout { layout: String },
    /// Add `tags: post` to posts without any tags
    AddDefaultTag,
    /// Turn `categories:` / `- "portfolio"` into `tags: portfolio`
    CategoriesToTags,
}

impl Edit {
    pub fn insert_layout(layout: impl Into<String>) -> Self {
        Self::InsertLayout {
            layout: layout.into(),
        }
    }

    /// Short name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            Self::InsertLayout { .. } => "add-layout",
            Self::AddDefaultTag => "add-tags",
            Self::CategoriesToTags => "categories-to-tags",
        }
    }

    /// What a successful application of this edit did
    pub fn change_description(&self) -> String {
        match self {
            Self::InsertLayout { layout } => format!("added layout: {}", layout),
            Self::AddDefaultTag => "added tags: post".to_string(),
            Self::CategoriesToTags => "changed categories to tags: portfolio".to_string(),
        }
    }
}

/// Why an edit left a document unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyHasLayout,
    AlreadyHasPortfolioTags,
    AlreadyHasOtherTags,
    NoFrontMatter,
    NoMatch,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::AlreadyHasLayout => "already has layout defined",
            Self::AlreadyHasPortfolioTags => "already has portfolio tags",
            Self::AlreadyHasOtherTags => "already has other tags",
            Self::NoFrontMatter => "no frontmatter found",
            Self::NoMatch => "no match",
        };
        f.write_str(reason)
    }
}

/// Result of applying an edit to a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The rewritten document text
    Changed(String),
    /// The document was left as is
    Skipped(SkipReason),
}

impl EditOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }
}

/// Applies [`Edit`]s to document text.
///
/// Holds the compiled patterns so a batch compiles them once.
#[derive(Debug, Clone)]
pub struct FrontMatterEditor {
    portfolio_tags: Regex,
    any_tags: Regex,
    portfolio_categories: Regex,
}

impl FrontMatterEditor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            portfolio_tags: Regex::new(r"(?m)^tags:\s*portfolio")?,
            any_tags: Regex::new(r"(?m)^tags:")?,
            portfolio_categories: Regex::new(r#"categories:\s*\n\s*-\s*"portfolio""#)?,
        })
    }

    pub fn apply(&self, edit: &Edit, content: &str) -> EditOutcome {
        let doc = Document::parse(content);
        match edit {
            Edit::InsertLayout { layout } => insert_layout(&doc, layout),
            Edit::AddDefaultTag => self.add_default_tag(&doc),
            Edit::CategoriesToTags => self.categories_to_tags(doc.raw()),
        }
    }

    fn add_default_tag(&self, doc: &Document) -> EditOutcome {
        let content = doc.raw();
        if self.portfolio_tags.is_match(content) {
            return EditOutcome::Skipped(SkipReason::AlreadyHasPortfolioTags);
        }
        if self.any_tags.is_match(content) {
            return EditOutcome::Skipped(SkipReason::AlreadyHasOtherTags);
        }
        let Some(span) = doc.span() else {
            return EditOutcome::Skipped(SkipReason::NoFrontMatter);
        };
        let end = span.end;

        let mut updated = String::with_capacity(content.len() + DEFAULT_TAG_LINE.len());
        updated.push_str(&content[..end]);
        updated.push_str(DEFAULT_TAG_LINE);
        updated.push_str(&content[end..]);
        EditOutcome::Changed(updated)
    }

    fn categories_to_tags(&self, content: &str) -> EditOutcome {
        let mut updated = String::with_capacity(content.len());
        let mut last = 0;
        let mut replaced = 0;
        for m in self.portfolio_categories.find_iter(content) {
            if continues_list(&content[m.end()..]) {
                continue;
            }
            updated.push_str(&content[last..m.start()]);
            updated.push_str(PORTFOLIO_TAG);
            last = m.end();
            replaced += 1;
        }
        if replaced == 0 {
            return EditOutcome::Skipped(SkipReason::NoMatch);
        }
        updated.push_str(&content[last..]);
        EditOutcome::Changed(updated)
    }
}

/// Insert `layout: <layout>` after the title, or right after the opening delimiter.
///
/// The `layout:` check looks at the whole text, body included.
fn insert_layout(doc: &Document, layout: &str) -> EditOutcome {
    let content = doc.raw();
    if content.contains("layout:") {
        return EditOutcome::Skipped(SkipReason::AlreadyHasLayout);
    }
    if !doc.has_front_matter() {
        return EditOutcome::Skipped(SkipReason::NoFrontMatter);
    }

    let mut lines: Vec<&str> = content.split('\n').collect();
    let mut insert_at = 1;
    for (i, line) in lines.iter().enumerate().skip(1) {
        let trimmed = line.trim();
        if trimmed == DELIMITER {
            break;
        }
        if trimmed.starts_with("title:") {
            insert_at = i + 1;
            break;
        }
    }

    let layout_line = format!("layout: {}", layout);
    lines.insert(insert_at, layout_line.as_str());
    EditOutcome::Changed(lines.join("\n"))
}

/// Whether the line after a matched `- "portfolio"` entry is another list item.
fn continues_list(rest: &str) -> bool {
    rest.split('\n')
        .nth(1)
        .map(|next| next.trim_start().starts_with('-') && next.trim() != DELIMITER)
        .unwrap_or(false)
}
