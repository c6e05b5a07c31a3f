//! Article body model: typed content blocks.
//!
//! An [`ArticleBody`] is an ordered list of [`Block`]s. Order is display order,
//! and it is also what ties each heading to the content that follows it.
//!
//! # Storage Format
//!
//! Bodies serialize as a stream of `{"type": ..., "value": ...}` objects:
//!
//! | Type            | Value                                           |
//! |-----------------|-------------------------------------------------|
//! | `heading`       | `{"heading_text": "...", "level": "h2"}`        |
//! | `rich_text`     | `"<p>html</p>"`                                 |
//! | `markdown`      | `"markdown source"`                             |
//! | `bullet_points` | `["item", ...]`                                 |
//! | `key_facts`     | `{"content": ["fact", ...]}`                    |
//! | `faqs`          | `[{"question": "...", "answer": "..."}, ...]`   |
//! | `references`    | `[{"reference_number": 1, "title": "..."}, ...]`|

mod validate;

pub use validate::{BlockIssue, IssueLevel, MAX_HEADING_LEN};

use serde::{Deserialize, Serialize};

// ============================================================================
// Heading
// ============================================================================

/// Heading depth inside an article. `h1` is reserved for the page title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    #[default]
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    /// Numeric level (2, 3 or 4).
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::H2 => 2,
            Self::H3 => 3,
            Self::H4 => 4,
        }
    }

    /// Parse a numeric level, rejecting anything outside 2..=4.
    pub const fn from_u8(level: u8) -> Option<Self> {
        match level {
            2 => Some(Self::H2),
            3 => Some(Self::H3),
            4 => Some(Self::H4),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    #[serde(rename = "heading_text")]
    pub text: String,
    #[serde(default)]
    pub level: HeadingLevel,
}

// ============================================================================
// List payloads
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFacts {
    #[serde(rename = "content", default)]
    pub facts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    /// Rich-text HTML.
    pub answer: String,
}

/// One entry of a reference list. `number` is the citation key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "reference_number")]
    pub number: u64,
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub year: String,
    pub title: String,
    #[serde(rename = "journal_source", default)]
    pub journal: String,
    #[serde(rename = "url_doi", default)]
    pub url_or_doi: String,
}

impl Reference {
    /// Anchor id used both on the rendered entry and by citation links.
    pub fn anchor_id(&self) -> String {
        reference_anchor(self.number)
    }
}

/// Anchor id for a reference number.
#[inline]
pub fn reference_anchor(number: u64) -> String {
    format!("ref-{number}")
}

// ============================================================================
// Block
// ============================================================================

/// One typed unit of article content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Block {
    Heading(Heading),
    /// Pre-sanitized HTML from the rich-text editor.
    RichText(String),
    /// Markdown source, converted at render time.
    Markdown(String),
    BulletPoints(Vec<String>),
    KeyFacts(KeyFacts),
    #[serde(rename = "faqs")]
    FaqList(Vec<FaqEntry>),
    #[serde(rename = "references")]
    ReferenceList(Vec<Reference>),
}

impl Block {
    pub fn heading(text: impl Into<String>, level: HeadingLevel) -> Self {
        Self::Heading(Heading {
            text: text.into(),
            level,
        })
    }

    pub fn markdown(source: impl Into<String>) -> Self {
        Self::Markdown(source.into())
    }

    pub fn rich_text(html: impl Into<String>) -> Self {
        Self::RichText(html.into())
    }

    pub fn key_facts(facts: Vec<String>) -> Self {
        Self::KeyFacts(KeyFacts { facts })
    }

    /// Storage type tag.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Heading(_) => "heading",
            Self::RichText(_) => "rich_text",
            Self::Markdown(_) => "markdown",
            Self::BulletPoints(_) => "bullet_points",
            Self::KeyFacts(_) => "key_facts",
            Self::FaqList(_) => "faqs",
            Self::ReferenceList(_) => "references",
        }
    }
}

// ============================================================================
// ArticleBody
// ============================================================================

/// Ordered block sequence stored as an article's body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleBody(Vec<Block>);

impl ArticleBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.0.push(block);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All references across every reference list, in body order.
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.0.iter().flat_map(|block| match block {
            Block::ReferenceList(entries) => entries.as_slice(),
            _ => &[],
        })
    }

    /// Heading blocks in body order.
    pub fn headings(&self) -> impl Iterator<Item = &Heading> {
        self.0.iter().filter_map(|block| match block {
            Block::Heading(h) => Some(h),
            _ => None,
        })
    }
}

impl From<Vec<Block>> for ArticleBody {
    fn from(blocks: Vec<Block>) -> Self {
        Self(blocks)
    }
}

impl FromIterator<Block> for ArticleBody {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ArticleBody {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// tests
// ============================================================================
