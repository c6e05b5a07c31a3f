//! `import` and `keywords` commands.
//!
//! Import runs in two phases:
//! - **Convert** - topic files are read and converted in parallel
//! - **Write** - converted topics are written to the store one at a time
//!
//! A topic that fails to convert is reported and skipped; it never reaches
//! the write phase.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::common::{collect_topic_files, open_store, save_store};
use crate::config::KbConfig;
use crate::importer::{
    IngestAction, OnExisting, TopicImport, backfill_keywords, import_str, import_topic,
};
use crate::logger::ProgressLine;
use crate::repo::ContentRepository;
use crate::utils::plural_count;
use crate::{debug, log};

/// A topic file after the convert phase.
struct Converted {
    path: PathBuf,
    result: Result<TopicImport>,
}

/// Counters reported at the end of an import.
#[derive(Debug, Default, PartialEq, Eq)]
struct ImportSummary {
    created: usize,
    updated: usize,
    replaced: usize,
    archived: usize,
    failed: usize,
    warnings: usize,
}

impl ImportSummary {
    fn record(&mut self, action: IngestAction) {
        match action {
            IngestAction::Created => self.created += 1,
            IngestAction::Updated => self.updated += 1,
            IngestAction::Replaced => self.replaced += 1,
            IngestAction::Archived => self.archived += 1,
        }
    }

    fn written(&self) -> usize {
        self.created + self.updated + self.replaced + self.archived
    }
}

/// Import topic files into `category`.
pub fn import_topics(
    config: &KbConfig,
    category: &str,
    paths: &[PathBuf],
    dry_run: bool,
) -> Result<()> {
    let files = collect_topic_files(paths)?;
    if files.is_empty() {
        log!("import"; "no topic files found");
        return Ok(());
    }
    log!("import"; "converting {}", plural_count(files.len(), "topic"));

    let converted = convert_files(&files);

    if dry_run {
        let summary = report_conversions(&converted);
        log!(
            "import"; "dry run: {} convertible, {} failed, {}",
            converted.len() - summary.failed,
            summary.failed,
            plural_count(summary.warnings, "warning")
        );
        return Ok(());
    }

    let repo = open_store(config)?;
    let summary = write_topics(
        &repo,
        &config.import.index_title,
        category,
        config.import.on_existing,
        converted,
    );
    if summary.written() > 0 {
        save_store(&repo)?;
    }

    log!(
        "import"; "{} created, {} updated, {} replaced, {} archived",
        summary.created, summary.updated, summary.replaced, summary.archived
    );
    if summary.failed > 0 {
        anyhow::bail!("{} failed to import", plural_count(summary.failed, "topic"));
    }
    Ok(())
}

/// Read and convert every file in parallel, keeping input order.
fn convert_files(files: &[PathBuf]) -> Vec<Converted> {
    files
        .par_iter()
        .map(|path| Converted {
            path: path.clone(),
            result: convert_file(path),
        })
        .collect()
}

fn convert_file(path: &Path) -> Result<TopicImport> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(import_str(&source)?)
}

/// Log conversion errors and warnings without writing anything.
fn report_conversions(converted: &[Converted]) -> ImportSummary {
    let mut summary = ImportSummary::default();
    for item in converted {
        match &item.result {
            Ok(topic) => {
                log_warnings(&item.path, topic);
                summary.warnings += topic.warnings.len();
            }
            Err(e) => {
                log!("error"; "{}: {:#}", item.path.display(), e);
                summary.failed += 1;
            }
        }
    }
    summary
}

/// Write converted topics sequentially.
fn write_topics<R: ContentRepository + ?Sized>(
    repo: &R,
    index_title: &str,
    category: &str,
    on_existing: OnExisting,
    converted: Vec<Converted>,
) -> ImportSummary {
    let mut summary = ImportSummary::default();
    let progress = ProgressLine::new("import", &[("topics", converted.len())]);

    for Converted { path, result } in converted {
        progress.inc("topics");

        let topic = match result {
            Ok(topic) => topic,
            Err(e) => {
                log!("error"; "{}: {:#}", path.display(), e);
                summary.failed += 1;
                continue;
            }
        };
        log_warnings(&path, &topic);
        summary.warnings += topic.warnings.len();

        match import_topic(repo, index_title, category, topic, on_existing) {
            Ok(outcome) => {
                debug!("import"; "{}: {} '{}'", path.display(), outcome.action.as_str(), outcome.article.title());
                summary.record(outcome.action);
            }
            Err(e) => {
                log!("error"; "{}: {}", path.display(), e);
                summary.failed += 1;
            }
        }
    }

    progress.finish();
    summary
}

fn log_warnings(path: &Path, topic: &TopicImport) {
    for warning in &topic.warnings {
        log!("warning"; "{}: {}", path.display(), warning);
    }
}

// ============================================================================
// keywords
// ============================================================================

/// Fill in an article's empty keywords from a topic file.
pub fn backfill(config: &KbConfig, category: &str, path: &Path) -> Result<()> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let repo = open_store(config)?;
    let outcome = backfill_keywords(&repo, category, &source)?;

    if outcome.published_draft {
        log!("keywords"; "published pending draft of '{}'", outcome.article.title());
    }
    if outcome.updated {
        log!(
            "keywords"; "set keywords of '{}': {}",
            outcome.article.title(), outcome.article.meta.keywords
        );
    } else {
        log!("keywords"; "'{}' already has keywords, left unchanged", outcome.article.title());
    }

    if outcome.published_draft || outcome.updated {
        save_store(&repo)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::MemoryRepository;

    fn topic_dir(files: &[(&str, &str)]) -> (tempfile::TempDir, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        let paths = files
            .iter()
            .map(|(name, content)| {
                let path = dir.path().join(name);
                fs::write(&path, content).unwrap();
                path
            })
            .collect();
        (dir, paths)
    }

    #[test]
    fn test_convert_keeps_order_and_errors() {
        let (_dir, paths) = topic_dir(&[
            ("a.json", r#"{"title": "A"}"#),
            ("b.json", "{broken"),
            ("c.json", r#"{"title": "C"}"#),
        ]);
        let converted = convert_files(&paths);
        assert_eq!(converted.len(), 3);
        assert!(converted[0].result.is_ok());
        assert!(converted[1].result.is_err());
        assert_eq!(converted[2].path, paths[2]);

        let summary = report_conversions(&converted);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_write_topics_skips_failures() {
        let (_dir, paths) = topic_dir(&[
            ("a.json", r#"{"title": "Asthma"}"#),
            ("b.json", r#"{"subtitle": "no title"}"#),
            ("c.json", r#"{"title": "Hay Fever"}"#),
        ]);
        let repo = MemoryRepository::new();
        let summary = write_topics(
            &repo,
            "Index",
            "Allergies",
            OnExisting::Update,
            convert_files(&paths),
        );
        assert_eq!(summary.created, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(repo.articles(None).unwrap().len(), 2);

        let again = write_topics(
            &repo,
            "Index",
            "Allergies",
            OnExisting::Update,
            convert_files(&paths[..1]),
        );
        assert_eq!(again.updated, 1);
        assert_eq!(again.written(), 1);
    }
}
