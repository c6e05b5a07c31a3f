//! HTML emitters, one per block type.
//!
//! Plain-text fields are escaped here. HTML-bearing fields (rich text,
//! bullet items, key facts, FAQ answers) pass through untouched.

use crate::block::{FaqEntry, HeadingLevel, Reference};
use crate::utils::html::{escape, escape_attr};

use super::markdown::{self, MarkdownOptions};

pub fn heading(out: &mut String, level: HeadingLevel, id: &str, text: &str) {
    let level = level.as_u8();
    out.push_str(&format!(
        "<h{level} id='{}'>{}</h{level}>",
        escape_attr(id),
        escape(text)
    ));
}

pub fn markdown(out: &mut String, source: &str, options: &MarkdownOptions, code_highlight: bool) {
    out.push_str("<div class='markdown-block'>");
    out.push_str(&markdown::to_html(source, options, code_highlight));
    out.push_str("</div>");
}

pub fn rich_text(out: &mut String, html: &str) {
    out.push_str("<div class='rich-text'>");
    out.push_str(html);
    out.push_str("</div>");
}

pub fn bullet_points(out: &mut String, items: &[String]) {
    out.push_str("<ul class='bullet-points'>");
    for item in items {
        out.push_str("<li>");
        out.push_str(item);
        out.push_str("</li>");
    }
    out.push_str("</ul>");
}

pub fn key_facts(out: &mut String, facts: &[String]) {
    out.push_str("<ul class='key-facts'>");
    for fact in facts {
        out.push_str("<li>");
        out.push_str(&fact.replace('\n', "<br>"));
        out.push_str("</li>");
    }
    out.push_str("</ul>");
}

pub fn faqs(out: &mut String, entries: &[FaqEntry]) {
    out.push_str("<div class='faqs'>");
    for entry in entries {
        out.push_str(&format!(
            "<p><strong>{}</strong></p><p>{}</p>",
            escape(&entry.question),
            entry.answer
        ));
    }
    out.push_str("</div>");
}

pub fn references(out: &mut String, entries: &[Reference]) {
    out.push_str("<div class='references'><ul>");
    for entry in entries {
        let journal = escape(&entry.journal);
        let source = match reference_url(&entry.url_or_doi) {
            Some(url) => format!(
                "<a href='{}' target='_blank'>{journal}</a>",
                escape_attr(&url)
            ),
            None => journal.into_owned(),
        };
        out.push_str(&format!(
            "<li id='{}' class='reference'><strong>{}</strong>. {} ({}) - {source}</li>",
            entry.anchor_id(),
            entry.number,
            escape(&entry.title),
            escape(&entry.year),
        ));
    }
    out.push_str("</ul></div>");
}

/// Resolve a reference's `url_or_doi` field into a link target.
///
/// | Input (trimmed)   | Link                         |
/// |-------------------|------------------------------|
/// | `http(s)://…`     | as-is                        |
/// | `www…`            | `https://` + input           |
/// | `10.…` (a DOI)    | `https://doi.org/` + input   |
/// | anything else     | no link                      |
pub fn reference_url(url_or_doi: &str) -> Option<String> {
    let url = url_or_doi.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Some(url.to_owned())
    } else if url.starts_with("www") {
        Some(format!("https://{url}"))
    } else if url.starts_with("10.") {
        Some(format!("https://doi.org/{url}"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(url_or_doi: &str) -> Reference {
        Reference {
            number: 2,
            authors: "Unknown".into(),
            year: "2019".into(),
            title: "Pollen & asthma".into(),
            journal: "Lancet".into(),
            url_or_doi: url_or_doi.into(),
        }
    }

    #[test]
    fn test_reference_url() {
        assert_eq!(
            reference_url("  https://a.org/x ").as_deref(),
            Some("https://a.org/x")
        );
        assert_eq!(
            reference_url("www.nhs.uk").as_deref(),
            Some("https://www.nhs.uk")
        );
        assert_eq!(
            reference_url("10.1000/xyz123").as_deref(),
            Some("https://doi.org/10.1000/xyz123")
        );
        assert_eq!(reference_url("pubmed 12345"), None);
        assert_eq!(reference_url(""), None);
    }

    #[test]
    fn test_reference_markup() {
        let mut out = String::new();
        references(&mut out, &[reference("10.1/abc")]);
        assert_eq!(
            out,
            "<div class='references'><ul>\
             <li id='ref-2' class='reference'><strong>2</strong>. Pollen &amp; asthma (2019) - \
             <a href='https://doi.org/10.1/abc' target='_blank'>Lancet</a></li>\
             </ul></div>"
        );
    }

    #[test]
    fn test_reference_without_link() {
        let mut out = String::new();
        references(&mut out, &[reference("see print edition")]);
        assert!(out.contains("(2019) - Lancet</li>"));
        assert!(!out.contains("<a "));
    }

    #[test]
    fn test_heading_escapes_text() {
        let mut out = String::new();
        heading(&mut out, HeadingLevel::H3, "a-b", "A <b> & B");
        assert_eq!(out, "<h3 id='a-b'>A &lt;b&gt; &amp; B</h3>");
    }

    #[test]
    fn test_key_facts_line_breaks() {
        let mut out = String::new();
        key_facts(&mut out, &["Onset: 2 days\nPeak: day 3".into()]);
        assert_eq!(
            out,
            "<ul class='key-facts'><li>Onset: 2 days<br>Peak: day 3</li></ul>"
        );
    }

    #[test]
    fn test_faq_markup() {
        let mut out = String::new();
        faqs(
            &mut out,
            &[FaqEntry {
                question: "Is it <contagious>?".into(),
                answer: "<em>No</em>.".into(),
            }],
        );
        assert_eq!(
            out,
            "<div class='faqs'><p><strong>Is it &lt;contagious&gt;?</strong></p><p><em>No</em>.</p></div>"
        );
    }
}
