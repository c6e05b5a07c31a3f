//! Topic importer: loosely structured topic JSON → article metadata + body.
//!
//! # Topic Document
//!
//! ```json
//! {
//!   "title": "Hay Fever",
//!   "subtitle": "Seasonal allergic rhinitis",
//!   "keywords": ["pollen", "allergy"],
//!   "symptoms": {"heading": "Symptoms", "content": ["Sneezing", "Itchy eyes"]},
//!   "references": {"heading": "References", "content": [{"reference_number": 1, "title": "..."}]}
//! }
//! ```
//!
//! `title`, `subtitle`, `keywords` and `article_image` are metadata. Every
//! other key whose value is an object with a `heading` string and a
//! `content` field is a section; anything else is skipped. Sections keep
//! their document order.
//!
//! Each section becomes an `h2` heading (when the heading is non-empty)
//! followed by its content block, converted according to the heading's
//! entry in the [`policy`] table.
//!
//! Only a malformed document or a missing title is fatal. Content that does
//! not fit its section's shape degrades to a coarser block and is reported
//! as an [`ImportWarning`].

mod convert;
mod ingest;
pub mod policy;

pub use ingest::{
    IngestAction, IngestError, IngestOutcome, KeywordsOutcome, OnExisting, backfill_keywords,
    import_topic, ingest_str,
};

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::block::{ArticleBody, Block, HeadingLevel};
use crate::repo::ArticleMeta;

use convert::{convert_default, convert_section, kind_name, stringify};

/// Top-level keys that carry metadata rather than sections.
const META_KEYS: [&str; 4] = ["title", "subtitle", "keywords", "article_image"];

// ============================================================================
// Errors & warnings
// ============================================================================

/// Fatal import errors. Nothing is written when one occurs.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("malformed topic JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("topic document must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("topic document has no 'title' field")]
    MissingTitle,

    #[error("'title' must be a non-empty string, found {0}")]
    InvalidTitle(String),

    #[error("topic document has no '{0}' field")]
    MissingField(&'static str),
}

/// Content that was imported in degraded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportWarning {
    /// Section heading is not in the policy table.
    UnknownHeading { key: String, heading: String },
    /// Content did not match any shape the heading accepts.
    ShapeMismatch { heading: String, found: &'static str },
    /// List mixing strings and objects, imported as one rich-text block.
    MixedList { heading: String },
    /// Reference entry skipped.
    InvalidReference {
        heading: String,
        index: usize,
        reason: String,
    },
    /// Reference section with no usable entry; no block was produced.
    NoValidReferences { heading: String },
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownHeading { key, heading } if heading.is_empty() => {
                write!(f, "section '{key}' has an empty heading, using default conversion")
            }
            Self::UnknownHeading { heading, .. } => {
                write!(f, "unknown heading '{heading}', using default conversion")
            }
            Self::ShapeMismatch { heading, found } => {
                write!(f, "'{heading}': unexpected {found} content, using default conversion")
            }
            Self::MixedList { heading } => {
                write!(f, "'{heading}': mixed list imported as rich text")
            }
            Self::InvalidReference {
                heading,
                index,
                reason,
            } => write!(f, "'{heading}': skipped entry #{}: {reason}", index + 1),
            Self::NoValidReferences { heading } => {
                write!(f, "'{heading}': no valid references, section dropped")
            }
        }
    }
}

// ============================================================================
// Import
// ============================================================================

/// Result of converting one topic document.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicImport {
    pub meta: ArticleMeta,
    pub body: ArticleBody,
    pub warnings: Vec<ImportWarning>,
}

/// Parse and convert a topic document.
pub fn import_str(source: &str) -> Result<TopicImport, ImportError> {
    let value: Value = serde_json::from_str(source)?;
    import(&value)
}

/// Convert an already parsed topic document.
pub fn import(document: &Value) -> Result<TopicImport, ImportError> {
    let Value::Object(document) = document else {
        return Err(ImportError::NotAnObject(kind_name(document)));
    };

    let meta = extract_meta(document)?;
    let mut warnings = Vec::new();
    let mut body = ArticleBody::new();

    for (key, value) in document {
        if META_KEYS.contains(&key.as_str()) {
            continue;
        }
        let Some((heading, content)) = as_section(value) else {
            crate::debug!("import"; "skipping non-section key '{}'", key);
            continue;
        };

        if !heading.is_empty() {
            body.push(Block::heading(heading, HeadingLevel::H2));
        }

        let block = match policy::accepted_shapes(heading) {
            Some(shapes) => convert_section(heading, shapes, content, &mut warnings),
            None => {
                warnings.push(ImportWarning::UnknownHeading {
                    key: key.clone(),
                    heading: heading.to_owned(),
                });
                Some(convert_default(heading, content, &mut warnings))
            }
        };
        if let Some(block) = block {
            body.push(block);
        }
    }

    Ok(TopicImport {
        meta,
        body,
        warnings,
    })
}

/// A section is an object with a string `heading` and any `content`.
fn as_section(value: &Value) -> Option<(&str, &Value)> {
    let section = value.as_object()?;
    let heading = section.get("heading")?.as_str()?;
    let content = section.get("content")?;
    Some((heading, content))
}

fn extract_meta(document: &Map<String, Value>) -> Result<ArticleMeta, ImportError> {
    let title = match document.get("title") {
        None => return Err(ImportError::MissingTitle),
        Some(Value::String(title)) if !title.trim().is_empty() => title.trim().to_owned(),
        Some(other) => return Err(ImportError::InvalidTitle(describe(other))),
    };

    let subtitle = document
        .get("subtitle")
        .filter(|v| !v.is_null())
        .map(stringify)
        .unwrap_or_default();

    let article_image = document
        .get("article_image")
        .filter(|v| !v.is_null())
        .map(stringify);

    Ok(ArticleMeta {
        title,
        subtitle,
        keywords: keywords(document.get("keywords")),
        article_image,
    })
}

/// Keywords as stored: a list is joined with `", "`.
fn keywords(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Array(items)) => {
            let items: Vec<String> = items.iter().map(stringify).collect();
            items.join(", ")
        }
        Some(other) => stringify(other),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(_) => "an empty string".to_owned(),
        other => format!("a {}", kind_name(other)),
    }
}

// ============================================================================
// Tests
// ============================================================================
