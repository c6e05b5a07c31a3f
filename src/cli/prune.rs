//! `prune` and `purge` commands.
//!
//! Both are destructive and ask for confirmation unless `--yes` is given.

use anyhow::Result;

use super::common::{open_store, prompt_confirm, save_store};
use crate::config::KbConfig;
use crate::log;
use crate::repo::{Category, ContentRepository};
use crate::utils::plural_count;

/// Delete every category without live articles.
pub fn prune(config: &KbConfig, yes: bool) -> Result<()> {
    let repo = open_store(config)?;
    let empty = empty_categories(&repo)?;
    if empty.is_empty() {
        log!("prune"; "no empty categories");
        return Ok(());
    }

    for category in &empty {
        log!("prune"; "empty: {}", category.name);
    }
    let prompt = format!("Delete {}?", plural_count(empty.len(), "empty category"));
    if !yes && !prompt_confirm(&prompt)? {
        log!("prune"; "aborted");
        return Ok(());
    }

    let deleted = delete_categories(&repo, &empty)?;
    save_store(&repo)?;
    log!("prune"; "deleted {}", plural_count(deleted, "category"));
    Ok(())
}

/// Delete every article, then every category left empty.
pub fn purge(config: &KbConfig, yes: bool) -> Result<()> {
    let repo = open_store(config)?;
    let articles = repo.articles(None)?;

    let prompt = format!(
        "Delete {} and all categories?",
        plural_count(articles.len(), "article")
    );
    if !yes && !prompt_confirm(&prompt)? {
        log!("purge"; "aborted");
        return Ok(());
    }

    let (articles, categories) = purge_all(&repo)?;
    save_store(&repo)?;
    log!(
        "purge"; "deleted {} and {}",
        plural_count(articles, "article"),
        plural_count(categories, "category")
    );
    Ok(())
}

fn empty_categories<R: ContentRepository + ?Sized>(repo: &R) -> Result<Vec<Category>> {
    let mut empty = Vec::new();
    for category in repo.categories()? {
        if repo.articles(Some(&category))?.is_empty() {
            empty.push(category);
        }
    }
    Ok(empty)
}

fn delete_categories<R: ContentRepository + ?Sized>(
    repo: &R,
    categories: &[Category],
) -> Result<usize> {
    for category in categories {
        repo.delete_category(category)?;
        crate::debug!("prune"; "deleted category '{}'", category.name);
    }
    Ok(categories.len())
}

/// Returns `(articles deleted, categories deleted)`.
fn purge_all<R: ContentRepository + ?Sized>(repo: &R) -> Result<(usize, usize)> {
    let articles = repo.articles(None)?;
    for article in &articles {
        repo.delete_article(article)?;
    }
    let categories = delete_categories(repo, &empty_categories(repo)?)?;
    Ok((articles.len(), categories))
}
