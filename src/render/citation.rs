//! Citation markers → reference anchor links.
//!
//! A marker is a bracketed list of numbers, `[3]` or `[1, 4]`. Each number
//! with a matching reference entry becomes `<a href='#ref-n'>[n]</a>`, the
//! rest stay as plain `[n]`.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use rustc_hash::FxHashMap;

use crate::block::{ArticleBody, reference_anchor};

static CITATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([\d,\s]+)\]").unwrap());

/// Reference number → anchor id, built once per render.
#[derive(Debug, Clone, Default)]
pub struct ReferenceMap(FxHashMap<u64, String>);

impl ReferenceMap {
    /// Index every reference of every list. A number used twice maps to the
    /// anchor of its last occurrence.
    pub fn from_body(body: &ArticleBody) -> Self {
        Self(
            body.references()
                .map(|reference| (reference.number, reference.anchor_id()))
                .collect(),
        )
    }

    pub fn get(&self, number: u64) -> Option<&str> {
        self.0.get(&number).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<u64> for ReferenceMap {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|number| (number, reference_anchor(number)))
                .collect(),
        )
    }
}

/// Replace every citation marker in `text`. Borrows when nothing matches.
pub fn link_citations<'a>(text: &'a str, references: &ReferenceMap) -> Cow<'a, str> {
    CITATION.replace_all(text, |caps: &Captures<'_>| {
        let parts: Vec<String> = caps[1]
            .split(',')
            .map(|part| link_part(part.trim(), references))
            .collect();
        parts.join(", ")
    })
}

fn link_part(part: &str, references: &ReferenceMap) -> String {
    let anchor = part
        .parse::<u64>()
        .ok()
        .and_then(|number| references.get(number));

    match anchor {
        Some(anchor) => format!("<a href='#{anchor}'>[{part}]</a>"),
        None => format!("[{part}]"),
    }
}
