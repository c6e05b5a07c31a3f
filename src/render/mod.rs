//! Article renderer: block sequence → HTML + table of contents.
//!
//! # Passes
//!
//! | Pass | Work                                                        |
//! |------|-------------------------------------------------------------|
//! | 1    | index every reference entry into a [`ReferenceMap`]         |
//! | 2    | emit HTML per block, assign heading ids, build the TOC      |
//! | 3    | link `[n]` citation markers to reference anchors            |
//!
//! Pass 3 runs per block ([`CitationScope::Blocks`], the default) or once
//! over the finished document ([`CitationScope::Document`]). Per-block
//! linking never touches reference-list markup.
//!
//! Rendering keeps no state between calls: the same body and options always
//! produce the same output.

mod anchor;
mod citation;
mod emit;
mod markdown;
mod toc;

pub use anchor::{AnchorSet, slugify};
pub use citation::{ReferenceMap, link_citations};
pub use emit::reference_url;
pub use markdown::MarkdownOptions;
pub use toc::{TocBuilder, TocEntry};

use serde::{Deserialize, Serialize};

use crate::block::{ArticleBody, Block};

/// Where citation markers are linked.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CitationScope {
    /// Each text-bearing block separately; reference lists are left alone.
    #[default]
    Blocks,
    /// The whole rendered document, reference lists included.
    Document,
}

/// Renderer settings, read from the `[render]` config section.
///
/// ```toml
/// [render]
/// citation_scope = "blocks"   # blocks | document
/// code_highlight = true       # wrap code blocks in <div class='codehilite'>
///
/// [render.markdown]
/// tables = true
/// footnotes = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub citation_scope: CitationScope,
    pub code_highlight: bool,
    pub markdown: MarkdownOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            citation_scope: CitationScope::Blocks,
            code_highlight: true,
            markdown: MarkdownOptions::default(),
        }
    }
}

/// Rendered article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    /// Trusted HTML, ready to embed in a page.
    pub html: String,
    pub toc: Vec<TocEntry>,
}

/// Render an article body.
pub fn render(body: &ArticleBody, options: &RenderOptions) -> Rendered {
    let references = ReferenceMap::from_body(body);
    let mut anchors = AnchorSet::new();
    let mut toc = TocBuilder::new();

    let mut html = String::new();
    let mut chunk = String::new();

    for block in body {
        chunk.clear();
        match block {
            Block::Heading(heading) => {
                let id = anchors.claim(&heading.text);
                toc.push(heading.level, &heading.text, &id);
                emit::heading(&mut chunk, heading.level, &id, &heading.text);
            }
            Block::Markdown(source) => {
                emit::markdown(
                    &mut chunk,
                    source,
                    &options.markdown,
                    options.code_highlight,
                );
            }
            Block::RichText(rich) => emit::rich_text(&mut chunk, rich),
            Block::BulletPoints(items) => emit::bullet_points(&mut chunk, items),
            Block::KeyFacts(facts) => emit::key_facts(&mut chunk, &facts.facts),
            Block::FaqList(entries) => emit::faqs(&mut chunk, entries),
            Block::ReferenceList(entries) => emit::references(&mut chunk, entries),
        }

        let link_here = options.citation_scope == CitationScope::Blocks
            && !matches!(block, Block::ReferenceList(_));
        if link_here {
            html.push_str(&link_citations(&chunk, &references));
        } else {
            html.push_str(&chunk);
        }
    }

    if options.citation_scope == CitationScope::Document {
        html = link_citations(&html, &references).into_owned();
    }

    Rendered {
        html,
        toc: toc.finish(),
    }
}

// ============================================================================
// Tests
// ============================================================================
