//! Common utilities shared across CLI commands.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jwalk::WalkDir;

use crate::config::KbConfig;
use crate::repo::{Article, ContentRepository, MemoryRepository};

/// Extension of topic files picked up from directories.
const TOPIC_EXTENSION: &str = "json";

/// Open the configured content store.
pub fn open_store(config: &KbConfig) -> Result<MemoryRepository> {
    let path = &config.store.path;
    MemoryRepository::open(path)
        .with_context(|| format!("Failed to open store: {}", config.root_relative(path).display()))
}

/// Persist the store after a write command.
pub fn save_store(repo: &MemoryRepository) -> Result<()> {
    repo.save().context("Failed to save store")
}

/// Collect topic files from CLI paths.
///
/// Files are taken as given; directories are walked recursively for `.json`
/// files. The result is sorted so imports run in a stable order.
pub fn collect_topic_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            files.extend(
                WalkDir::new(path)
                    .into_iter()
                    .filter_map(Result::ok)
                    .filter(|e| e.file_type().is_file())
                    .map(|e| e.path())
                    .filter(|p| is_topic_file(p)),
            );
        } else {
            anyhow::bail!("Path not found: {}", path.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn is_topic_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TOPIC_EXTENSION))
}

/// Look up a live article by category name and title.
pub fn find_article<R: ContentRepository + ?Sized>(
    repo: &R,
    category: &str,
    title: &str,
) -> Result<Article> {
    let found = repo
        .find_category(category)?
        .with_context(|| format!("Category not found: {category}"))?;
    repo.find_article_by_title(&found, title)?
        .with_context(|| format!("Article '{title}' not found in category '{}'", found.name))
}

/// Ask for confirmation before a destructive command.
///
/// Only an exact `yes` confirms.
pub fn prompt_confirm(action: &str) -> Result<bool> {
    eprint!("{action}\nType 'yes' to confirm: ");
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim() == "yes")
}
