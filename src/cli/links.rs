//! `links` command: CSV export of every published article's URLs.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};

use super::common::open_store;
use crate::config::{KbConfig, SiteConfig};
use crate::log;
use crate::repo::{Article, ContentRepository};
use crate::utils::plural_count;

const HEADER: [&str; 3] = ["Title", "Admin URL", "Live URL"];

/// Write `Title, Admin URL, Live URL` rows for every published article.
pub fn export_links(config: &KbConfig, output: &Path) -> Result<()> {
    let repo = open_store(config)?;

    let mut rows = Vec::new();
    for article in repo.articles(None)?.iter().filter(|a| a.is_live()) {
        let path = repo.article_path(article)?;
        rows.push(link_row(&config.site, article, &path)?);
    }

    let file = std::fs::File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    write_csv(file, &rows)?;

    log!(
        "links"; "wrote {} to {}",
        plural_count(rows.len(), "article"),
        output.display()
    );
    Ok(())
}

fn link_row(site: &SiteConfig, article: &Article, path: &str) -> Result<[String; 3]> {
    let admin = site
        .admin_url(article.id)
        .with_context(|| format!("Invalid admin URL for article {}", article.id))?;
    let live = site
        .live_url(path)
        .with_context(|| format!("Invalid live URL for `{path}`"))?;
    Ok([article.title().to_owned(), admin, live])
}

fn write_csv(writer: impl io::Write, rows: &[[String; 3]]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;
    for row in rows {
        csv.write_record(row)?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use crate::repo::ArticleMeta;

    fn article(id: u64, title: &str) -> Article {
        Article {
            id,
            category: 1,
            slug: String::new(),
            status: Default::default(),
            version: 1,
            meta: ArticleMeta {
                title: title.into(),
                ..ArticleMeta::default()
            },
            body: Default::default(),
            draft: None,
        }
    }

    #[test]
    fn test_link_row() {
        let config = test_parse_config("[site]\nbase_url = \"https://kb.example.org/health/\"");
        let row = link_row(
            &config.site,
            &article(7, "Hay Fever"),
            "/index/allergies/hay-fever/",
        )
        .unwrap();
        assert_eq!(
            row,
            [
                "Hay Fever".to_owned(),
                "https://kb.example.org/health/admin/pages/7/edit/".to_owned(),
                "https://kb.example.org/health/index/allergies/hay-fever/".to_owned(),
            ]
        );
    }

    #[test]
    fn test_write_csv_quotes_fields() {
        let mut out = Vec::new();
        let rows = [[
            "Allergy, seasonal".to_owned(),
            "https://a/1".to_owned(),
            "https://a/x/".to_owned(),
        ]];
        write_csv(&mut out, &rows).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Title,Admin URL,Live URL\n\"Allergy, seasonal\",https://a/1,https://a/x/\n"
        );
    }
}
