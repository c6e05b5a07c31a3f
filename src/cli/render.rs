//! `render` command: print one article's HTML and table of contents.

use std::io::{self, Write};

use anyhow::Result;

use super::RenderFormat;
use super::common::{find_article, open_store};
use crate::config::KbConfig;
use crate::render::{Rendered, render};

/// Render the article `title` of `category` to stdout.
pub fn render_article(
    config: &KbConfig,
    category: &str,
    title: &str,
    format: RenderFormat,
) -> Result<()> {
    let repo = open_store(config)?;
    let article = find_article(&repo, category, title)?;
    crate::debug!("render"; "'{}' v{}, {} blocks", article.title(), article.version, article.body.len());

    let rendered = render(&article.body, &config.render);
    let output = format_rendered(&rendered, format)?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")?;
    Ok(())
}

fn format_rendered(rendered: &Rendered, format: RenderFormat) -> Result<String> {
    Ok(match format {
        RenderFormat::Json => serde_json::to_string_pretty(rendered)?,
        RenderFormat::Html => rendered.html.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{ArticleBody, Block, HeadingLevel};
    use crate::render::RenderOptions;

    #[test]
    fn test_format_rendered() {
        let body = ArticleBody::from(vec![Block::heading("Causes", HeadingLevel::H2)]);
        let rendered = render(&body, &RenderOptions::default());

        let json = format_rendered(&rendered, RenderFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["toc"][0]["id"], "causes");
        assert_eq!(value["toc"][0]["text"], "Causes");

        let html = format_rendered(&rendered, RenderFormat::Html).unwrap();
        assert_eq!(html, "<h2 id='causes'>Causes</h2>");
    }
}
