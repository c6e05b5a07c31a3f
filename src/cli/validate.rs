//! `validate` command: structural checks over stored article bodies.

use std::fmt;

use anyhow::{Context, Result};
use owo_colors::Style;

use super::common::open_store;
use crate::block::BlockIssue;
use crate::config::KbConfig;
use crate::log;
use crate::logger::paint;
use crate::repo::{Article, ContentRepository};
use crate::utils::{plural_count, plural_s};

/// Issues found in one article.
#[derive(Debug)]
struct ArticleReport {
    title: String,
    issues: Vec<BlockIssue>,
}

/// Validation results for all checked articles.
#[derive(Debug, Default)]
struct ValidationReport {
    checked: usize,
    articles: Vec<ArticleReport>,
}

impl ValidationReport {
    fn check(articles: &[Article]) -> Self {
        let mut report = Self {
            checked: articles.len(),
            articles: Vec::new(),
        };
        for article in articles {
            let issues = article.body.validate();
            if !issues.is_empty() {
                report.articles.push(ArticleReport {
                    title: article.title().to_owned(),
                    issues,
                });
            }
        }
        report
    }

    fn count(&self, errors: bool) -> usize {
        self.articles
            .iter()
            .flat_map(|a| &a.issues)
            .filter(|i| i.is_error() == errors)
            .count()
    }

    fn error_count(&self) -> usize {
        self.count(true)
    }

    fn warning_count(&self) -> usize {
        self.count(false)
    }

    /// Print every issue to stderr, grouped by article.
    fn print(&self) {
        for article in &self.articles {
            eprintln!();
            eprintln!(
                "{}{}{}",
                paint("[", Style::new().dimmed()),
                paint(&article.title, Style::new().cyan()),
                paint("]", Style::new().dimmed())
            );
            for issue in &article.issues {
                let arrow = if issue.is_error() {
                    Style::new().red()
                } else {
                    Style::new().yellow()
                };
                eprintln!("{} {}", paint("→", arrow), issue);
            }
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.error_count();
        let warnings = self.warning_count();

        if errors == 0 && warnings == 0 {
            return write!(f, "{}", paint("all checks passed", Style::new().green()));
        }
        let dim = Style::new().dimmed();
        write!(
            f,
            "{} {} {}, {} {}",
            paint("found", dim),
            paint(errors, Style::new().red().bold()),
            paint(format!("error{}", plural_s(errors)), dim),
            paint(warnings, Style::new().yellow().bold()),
            paint(format!("warning{}", plural_s(warnings)), dim)
        )
    }
}

/// Validate every live article, or only those of `category`.
pub fn validate_articles(config: &KbConfig, category: Option<&str>, warn_only: bool) -> Result<()> {
    let repo = open_store(config)?;
    let category = match category {
        Some(name) => Some(
            repo.find_category(name)?
                .with_context(|| format!("Category not found: {name}"))?,
        ),
        None => None,
    };

    let articles = repo.articles(category.as_ref())?;
    if articles.is_empty() {
        log!("validate"; "no articles found");
        return Ok(());
    }
    log!("validate"; "checking {}", plural_count(articles.len(), "article"));

    let report = ValidationReport::check(&articles);
    report.print();
    if !report.articles.is_empty() {
        eprintln!();
    }
    log!("validate"; "{}", report);

    let errors = report.error_count();
    if errors > 0 && !warn_only {
        anyhow::bail!(
            "validation failed: {} in {} of {}",
            plural_count(errors, "error"),
            report.articles.len(),
            plural_count(report.checked, "article")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{ArticleBody, Block, HeadingLevel};
    use crate::repo::ArticleMeta;

    fn article(title: &str, body: ArticleBody) -> Article {
        Article {
            id: 1,
            category: 1,
            slug: String::new(),
            status: Default::default(),
            version: 1,
            meta: ArticleMeta {
                title: title.into(),
                ..ArticleMeta::default()
            },
            body,
            draft: None,
        }
    }

    #[test]
    fn test_report_counts() {
        let articles = [
            article("Clean", ArticleBody::from(vec![Block::markdown("ok")])),
            article(
                "Broken",
                ArticleBody::from(vec![Block::heading(" ", HeadingLevel::H2)]),
            ),
        ];
        let report = ValidationReport::check(&articles);
        assert_eq!(report.checked, 2);
        assert_eq!(report.articles.len(), 1);
        assert_eq!(report.articles[0].title, "Broken");
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 0);
    }

    #[test]
    fn test_report_display_clean() {
        owo_colors::set_override(false);
        let report = ValidationReport::check(&[article("A", ArticleBody::new())]);
        assert_eq!(report.to_string(), "all checks passed");
    }

    #[test]
    fn test_report_display_counts_without_color() {
        owo_colors::set_override(false);
        let articles = [article(
            "Broken",
            ArticleBody::from(vec![Block::heading(" ", HeadingLevel::H2)]),
        )];
        let report = ValidationReport::check(&articles);
        assert_eq!(report.to_string(), "found 1 error, 0 warnings");
    }
}
