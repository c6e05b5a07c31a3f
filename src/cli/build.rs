//! `build` command: write every published article as a static HTML page.
//!
//! Pages land at `<output>/<index>/<category>/<article>/index.html`, the same
//! path the article is served under. Rendering runs in parallel; each page
//! is written by the worker that rendered it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::common::open_store;
use crate::config::KbConfig;
use crate::log;
use crate::logger::ProgressLine;
use crate::render::{Rendered, TocEntry, render};
use crate::repo::{Article, ContentRepository};
use crate::utils::html::{escape, escape_attr};
use crate::utils::plural_count;

/// Build the static site into `config.build.output`.
pub fn build_site(config: &KbConfig) -> Result<()> {
    let output = &config.build.output;
    prepare_output(output, config.build.clean)?;

    let repo = open_store(config)?;
    let articles: Vec<(Article, String)> = repo
        .articles(None)?
        .into_iter()
        .filter(Article::is_live)
        .map(|article| {
            let path = repo.article_path(&article)?;
            Ok::<_, anyhow::Error>((article, path))
        })
        .collect::<Result<_>>()?;

    if articles.is_empty() {
        log!("build"; "no published articles");
        return Ok(());
    }

    let progress = ProgressLine::new("build", &[("articles", articles.len())]);
    let failed = AtomicUsize::new(0);

    articles.par_iter().for_each(|(article, path)| {
        if let Err(e) = write_article(config, output, article, path) {
            log!("error"; "'{}': {:#}", article.title(), e);
            failed.fetch_add(1, Ordering::Relaxed);
        }
        progress.inc("articles");
    });
    progress.finish();

    let failed = failed.into_inner();
    if failed > 0 {
        anyhow::bail!("{} failed to build", plural_count(failed, "article"));
    }
    log!(
        "build"; "wrote {} to {}",
        plural_count(articles.len(), "page"),
        config.root_relative(output).display()
    );
    Ok(())
}

/// Create the output directory, emptying it first when `clean` is set.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output).with_context(|| {
            format!("Failed to clear output directory: {}", output.display())
        })?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

fn write_article(config: &KbConfig, output: &Path, article: &Article, path: &str) -> Result<()> {
    let rendered = render(&article.body, &config.render);
    let page = page_html(&config.site.name, article, &rendered);

    let file = page_file(output, path);
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file, page).with_context(|| format!("Failed to write {}", file.display()))
}

/// `<output>/<path>/index.html` for a site-relative page path.
fn page_file(output: &Path, path: &str) -> PathBuf {
    output
        .join(path.trim_matches('/'))
        .join("index.html")
}

/// Full HTML document for an article.
fn page_html(site_name: &str, article: &Article, rendered: &Rendered) -> String {
    let title = escape(article.title());
    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} - {}</title>\n",
        escape(site_name)
    );
    if !article.meta.keywords.is_empty() {
        html.push_str(&format!(
            "<meta name=\"keywords\" content=\"{}\">\n",
            escape_attr(&article.meta.keywords)
        ));
    }
    html.push_str("</head>\n<body>\n<article>\n");
    html.push_str(&format!("<h1>{title}</h1>\n"));
    if !article.meta.subtitle.is_empty() {
        html.push_str(&format!(
            "<p class='subtitle'>{}</p>\n",
            escape(&article.meta.subtitle)
        ));
    }
    if !rendered.toc.is_empty() {
        html.push_str("<nav class='toc'>");
        toc_list(&mut html, &rendered.toc);
        html.push_str("</nav>\n");
    }
    html.push_str(&rendered.html);
    html.push_str("\n</article>\n</body>\n</html>\n");
    html
}

fn toc_list(out: &mut String, entries: &[TocEntry]) {
    out.push_str("<ul>");
    for entry in entries {
        out.push_str(&format!(
            "<li><a href='#{}'>{}</a>",
            entry.anchor_id,
            escape(&entry.text)
        ));
        if !entry.children.is_empty() {
            toc_list(out, &entry.children);
        }
        out.push_str("</li>");
    }
    out.push_str("</ul>");
}
