//! Table of contents assembly.
//!
//! | Heading | Placement                                           |
//! |---------|-----------------------------------------------------|
//! | `h2`    | new top-level entry; closes the current `h3`        |
//! | `h3`    | child of the current `h2`, dropped if none          |
//! | `h4`    | child of the current `h3`, else of the `h2`, else dropped |

use serde::Serialize;

use crate::block::HeadingLevel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub text: String,
    #[serde(rename = "id")]
    pub anchor_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TocEntry>,
}

impl TocEntry {
    fn new(text: &str, anchor_id: &str) -> Self {
        Self {
            text: text.to_owned(),
            anchor_id: anchor_id.to_owned(),
            children: Vec::new(),
        }
    }
}

/// Builds a nested TOC from headings fed in document order.
#[derive(Debug, Default)]
pub struct TocBuilder {
    entries: Vec<TocEntry>,
    /// Whether the last child of the current `h2` is an open `h3`.
    in_h3: bool,
}

impl TocBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: HeadingLevel, text: &str, anchor_id: &str) {
        let entry = TocEntry::new(text, anchor_id);
        match level {
            HeadingLevel::H2 => {
                self.entries.push(entry);
                self.in_h3 = false;
            }
            HeadingLevel::H3 => {
                if let Some(h2) = self.entries.last_mut() {
                    h2.children.push(entry);
                    self.in_h3 = true;
                }
            }
            HeadingLevel::H4 => {
                let Some(h2) = self.entries.last_mut() else {
                    return;
                };
                match h2.children.last_mut() {
                    Some(h3) if self.in_h3 => h3.children.push(entry),
                    _ => h2.children.push(entry),
                }
            }
        }
    }

    pub fn finish(self) -> Vec<TocEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use HeadingLevel::{H2, H3, H4};

    fn build(headings: &[(HeadingLevel, &str)]) -> Vec<TocEntry> {
        let mut toc = TocBuilder::new();
        for (level, text) in headings {
            toc.push(*level, text, &text.to_lowercase());
        }
        toc.finish()
    }

    fn shape(entries: &[TocEntry]) -> String {
        entries
            .iter()
            .map(|e| {
                if e.children.is_empty() {
                    e.text.clone()
                } else {
                    format!("{}({})", e.text, shape(&e.children))
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_nesting() {
        let toc = build(&[(H2, "A"), (H3, "B"), (H4, "C"), (H2, "D"), (H4, "E")]);
        assert_eq!(shape(&toc), "A(B(C)) D(E)");
    }

    #[test]
    fn test_orphans_dropped() {
        let toc = build(&[(H3, "x"), (H4, "y"), (H2, "A")]);
        assert_eq!(shape(&toc), "A");
    }

    #[test]
    fn test_h2_closes_h3() {
        let toc = build(&[(H2, "A"), (H3, "B"), (H2, "C"), (H4, "D"), (H3, "E"), (H4, "F")]);
        assert_eq!(shape(&toc), "A(B) C(D E(F))");
    }

    #[test]
    fn test_serialized_shape() {
        let toc = build(&[(H2, "A"), (H3, "B")]);
        let value = serde_json::to_value(&toc).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"text": "A", "id": "a", "children": [{"text": "B", "id": "b"}]}])
        );
    }
}
