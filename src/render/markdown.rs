//! Markdown block rendering using pulldown-cmark.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use serde::{Deserialize, Serialize};

/// Markdown extensions enabled for `markdown` blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable footnotes extension
    pub footnotes: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable definition lists extension
    pub definition_lists: bool,
    /// Enable heading attributes extension (e.g., `# Heading {#custom-id}`)
    pub heading_attributes: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            definition_lists: true,
            heading_attributes: true,
        }
    }
}

impl MarkdownOptions {
    /// Create options with every extension disabled (plain CommonMark)
    pub fn none() -> Self {
        Self {
            tables: false,
            footnotes: false,
            strikethrough: false,
            definition_lists: false,
            heading_attributes: false,
        }
    }

    /// Convert to pulldown-cmark Options
    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.definition_lists {
            opts.insert(Options::ENABLE_DEFINITION_LIST);
        }
        if self.heading_attributes {
            opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        opts
    }
}

const CODE_OPEN: &str = "<div class='codehilite'>\n";
const CODE_CLOSE: &str = "</div>";

/// Render markdown source to HTML.
///
/// With `code_highlight`, every code block is wrapped in
/// `<div class='codehilite'>` so the site stylesheet can target it.
pub fn to_html(source: &str, options: &MarkdownOptions, code_highlight: bool) -> String {
    let parser = Parser::new_ext(source, options.to_pulldown_options());
    let mut out = String::with_capacity(source.len() * 3 / 2);

    if code_highlight {
        let events = parser.flat_map(|event| {
            let (before, after) = match &event {
                Event::Start(Tag::CodeBlock(_)) => (Some(CODE_OPEN), None),
                Event::End(TagEnd::CodeBlock) => (None, Some(CODE_CLOSE)),
                _ => (None, None),
            };
            let html_event = |s: &'static str| Event::Html(CowStr::Borrowed(s));
            before
                .map(html_event)
                .into_iter()
                .chain(std::iter::once(event))
                .chain(after.map(html_event))
        });
        html::push_html(&mut out, events);
    } else {
        html::push_html(&mut out, parser);
    }

    out
}
