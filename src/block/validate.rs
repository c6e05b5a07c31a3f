//! Structural checks for article bodies.
//!
//! Validation reports problems; it never rejects a body. Imported bodies may
//! legitimately carry duplicate reference numbers, and the renderer copes with
//! every case listed here.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use super::{ArticleBody, Block};

/// Longest heading text the editor accepts.
pub const MAX_HEADING_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IssueLevel {
    Warning,
    Error,
}

/// A single problem found in a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockIssue {
    /// Index of the offending block.
    pub block: usize,
    pub level: IssueLevel,
    pub message: String,
}

impl BlockIssue {
    fn error(block: usize, message: impl Into<String>) -> Self {
        Self {
            block,
            level: IssueLevel::Error,
            message: message.into(),
        }
    }

    fn warning(block: usize, message: impl Into<String>) -> Self {
        Self {
            block,
            level: IssueLevel::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == IssueLevel::Error
    }
}

impl fmt::Display for BlockIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {}: {}", self.block, self.message)
    }
}

impl ArticleBody {
    /// Check every block, returning issues in body order.
    pub fn validate(&self) -> Vec<BlockIssue> {
        let mut issues = Vec::new();
        // reference number -> index of the list block that first used it
        let mut seen_numbers: FxHashMap<u64, usize> = FxHashMap::default();

        for (index, block) in self.iter().enumerate() {
            match block {
                Block::Heading(heading) => {
                    if heading.text.trim().is_empty() {
                        issues.push(BlockIssue::error(index, "heading text is empty"));
                    } else if heading.text.chars().count() > MAX_HEADING_LEN {
                        issues.push(BlockIssue::error(
                            index,
                            format!("heading text exceeds {MAX_HEADING_LEN} characters"),
                        ));
                    }
                }
                Block::FaqList(entries) => {
                    for (i, entry) in entries.iter().enumerate() {
                        if entry.question.trim().is_empty() {
                            issues.push(BlockIssue::error(
                                index,
                                format!("faq #{} has an empty question", i + 1),
                            ));
                        }
                    }
                }
                Block::ReferenceList(entries) => {
                    validate_references(index, entries, &mut seen_numbers, &mut issues);
                }
                Block::RichText(_)
                | Block::Markdown(_)
                | Block::BulletPoints(_)
                | Block::KeyFacts(_) => {}
            }
        }

        issues
    }
}

fn validate_references(
    index: usize,
    entries: &[super::Reference],
    seen_numbers: &mut FxHashMap<u64, usize>,
    issues: &mut Vec<BlockIssue>,
) {
    let mut local = FxHashSet::default();

    for entry in entries {
        if entry.number == 0 {
            issues.push(BlockIssue::error(index, "reference number must not be 0"));
        }
        if entry.title.trim().is_empty() {
            issues.push(BlockIssue::error(
                index,
                format!("reference {} has an empty title", entry.number),
            ));
        }

        if !local.insert(entry.number) {
            issues.push(BlockIssue::error(
                index,
                format!("reference number {} is used twice in this list", entry.number),
            ));
            continue;
        }

        match seen_numbers.get(&entry.number) {
            Some(&first) if first != index => issues.push(BlockIssue::warning(
                index,
                format!(
                    "reference number {} also appears in block {first}; citations link to this one",
                    entry.number
                ),
            )),
            Some(_) => {}
            None => {
                seen_numbers.insert(entry.number, index);
            }
        }
    }
}

// ============================================================================
// tests
// ============================================================================
