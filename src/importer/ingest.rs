//! Writing imported topics into a [`ContentRepository`].
//!
//! Conversion always completes before the first repository call, so a
//! malformed document never leaves a partial write behind.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::{ImportError, ImportWarning, TopicImport, extract_meta, import_str, kind_name};
use crate::repo::{Article, ContentRepository, RepoError};

/// What to do when the category already holds an article with the same title.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OnExisting {
    /// Publish the new content as the next version of the existing article.
    #[default]
    Update,
    /// Delete the existing article and create a fresh one.
    Replace,
    /// Archive the existing article and create a fresh one.
    Archive,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error("category '{0}' not found")]
    CategoryNotFound(String),

    #[error("article '{title}' not found in category '{category}'")]
    ArticleNotFound { category: String, title: String },
}

/// Which repository operation an ingestion performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestAction {
    Created,
    Updated,
    Replaced,
    Archived,
}

impl IngestAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Replaced => "replaced",
            Self::Archived => "archived old version of",
        }
    }
}

#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub action: IngestAction,
    /// The live article after the write.
    pub article: Article,
    pub warnings: Vec<ImportWarning>,
}

/// Write an already converted topic into `category`.
///
/// The index page and the category are created on first use.
pub fn import_topic<R: ContentRepository + ?Sized>(
    repo: &R,
    index_title: &str,
    category: &str,
    topic: TopicImport,
    on_existing: OnExisting,
) -> Result<IngestOutcome, IngestError> {
    let TopicImport {
        meta,
        body,
        warnings,
    } = topic;

    let index = repo.find_or_create_index(index_title)?;
    let category = repo.find_or_create_category(&index, category)?;
    let existing = repo.find_article_by_title(&category, &meta.title)?;

    let (action, article) = match (existing, on_existing) {
        (None, _) => (
            IngestAction::Created,
            repo.create_article(&category, meta, body)?,
        ),
        (Some(old), OnExisting::Update) => (
            IngestAction::Updated,
            repo.update_article(&old, meta, body)?,
        ),
        (Some(old), OnExisting::Replace) => {
            repo.delete_article(&old)?;
            (
                IngestAction::Replaced,
                repo.create_article(&category, meta, body)?,
            )
        }
        (Some(old), OnExisting::Archive) => {
            repo.archive_article(&old)?;
            (
                IngestAction::Archived,
                repo.create_article(&category, meta, body)?,
            )
        }
    };

    crate::debug!(
        "import"; "{} '{}' (id {}, v{})",
        action.as_str(), article.title(), article.id, article.version
    );
    Ok(IngestOutcome {
        action,
        article,
        warnings,
    })
}

/// Parse, convert and write one topic document.
pub fn ingest_str<R: ContentRepository + ?Sized>(
    repo: &R,
    index_title: &str,
    category: &str,
    source: &str,
    on_existing: OnExisting,
) -> Result<IngestOutcome, IngestError> {
    let topic = import_str(source)?;
    import_topic(repo, index_title, category, topic, on_existing)
}

// ============================================================================
// Keyword backfill
// ============================================================================

#[derive(Debug, Clone)]
pub struct KeywordsOutcome {
    pub article: Article,
    /// A pending draft was published before the keywords were touched.
    pub published_draft: bool,
    /// `false` when the article already had keywords.
    pub updated: bool,
}

/// Fill in an existing article's keywords from a topic document.
///
/// The document needs `title` and `keywords`; sections are ignored. Keywords
/// that are already set are left alone.
pub fn backfill_keywords<R: ContentRepository + ?Sized>(
    repo: &R,
    category: &str,
    source: &str,
) -> Result<KeywordsOutcome, IngestError> {
    let document: Value = serde_json::from_str(source).map_err(ImportError::from)?;
    let Value::Object(document) = &document else {
        return Err(ImportError::NotAnObject(kind_name(&document)).into());
    };
    let meta = extract_meta(document)?;
    if document.get("keywords").is_none_or(Value::is_null) {
        return Err(ImportError::MissingField("keywords").into());
    }

    let found = repo
        .find_category(category)?
        .ok_or_else(|| IngestError::CategoryNotFound(category.to_owned()))?;
    let mut article = repo
        .find_article_by_title(&found, &meta.title)?
        .ok_or_else(|| IngestError::ArticleNotFound {
            category: found.name.clone(),
            title: meta.title.clone(),
        })?;

    let published_draft = article.has_unpublished_changes();
    if published_draft {
        article = repo.publish_latest_draft(&article)?;
        crate::debug!("keywords"; "published pending draft of '{}'", article.title());
    }

    let updated = article.meta.keywords.is_empty();
    if updated {
        article = repo.set_keywords(&article, &meta.keywords)?;
    }

    Ok(KeywordsOutcome {
        article,
        published_draft,
        updated,
    })
}

// ============================================================================
// Tests
// ============================================================================
