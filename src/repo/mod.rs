//! Content repository: the page tree articles live in.
//!
//! The tree is fixed at three levels, `Index → Category → Article`. The
//! importer, keyword backfill and CLI only talk to it through
//! [`ContentRepository`]; [`MemoryRepository`] is the bundled implementation.
//!
//! # Page States
//!
//! | Status      | Meaning                                               |
//! |-------------|-------------------------------------------------------|
//! | `Draft`     | never published; only the draft revision exists       |
//! | `Published` | live; may also carry an unpublished draft revision    |
//! | `Archived`  | moved out of its category; not found by title lookup  |

mod memory;

pub use memory::MemoryRepository;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::block::ArticleBody;

pub type PageId = u64;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: PageId },

    #[error("category '{0}' still has articles")]
    CategoryNotEmpty(String),

    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },

    #[error("IO error on store `{path}`")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt store `{path}`")]
    Corrupt {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type RepoResult<T> = Result<T, RepoError>;

// ============================================================================
// Pages
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Draft,
    #[default]
    Published,
    Archived,
}

/// Root of the page tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub id: PageId,
    pub title: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: PageId,
    pub index: PageId,
    pub name: String,
    pub slug: String,
}

/// Article fields besides the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleMeta {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    /// Comma-separated keyword list.
    #[serde(default)]
    pub keywords: String,
    /// Opaque image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_image: Option<String>,
}

/// An unpublished revision of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub meta: ArticleMeta,
    pub body: ArticleBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: PageId,
    pub category: PageId,
    pub slug: String,
    #[serde(default)]
    pub status: PageStatus,
    /// Published revision count; 0 for never-published drafts.
    #[serde(default)]
    pub version: u32,
    #[serde(flatten)]
    pub meta: ArticleMeta,
    #[serde(default)]
    pub body: ArticleBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<Revision>,
}

impl Article {
    #[inline]
    pub fn title(&self) -> &str {
        &self.meta.title
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.status == PageStatus::Published
    }

    /// Whether a saved draft differs from (or was never) published.
    #[inline]
    pub fn has_unpublished_changes(&self) -> bool {
        self.draft.is_some()
    }
}

// ============================================================================
// Repository
// ============================================================================

/// Storage capability used by ingestion and the CLI.
///
/// Methods take `&self`; implementations synchronize internally. Passing a
/// stale `Article` is fine: only its `id` is used to locate the page.
pub trait ContentRepository {
    /// The single index page, created on first use.
    fn find_or_create_index(&self, title: &str) -> RepoResult<Index>;

    /// Category with `name`'s slug under `index`, created if missing.
    fn find_or_create_category(&self, index: &Index, name: &str) -> RepoResult<Category>;

    /// Category looked up by name (matched by slug).
    fn find_category(&self, name: &str) -> RepoResult<Option<Category>>;

    /// All categories in creation order.
    fn categories(&self) -> RepoResult<Vec<Category>>;

    /// Articles of `category` (all categories if `None`), archived excluded.
    fn articles(&self, category: Option<&Category>) -> RepoResult<Vec<Article>>;

    /// Non-archived article in `category` with exactly this title.
    fn find_article_by_title(&self, category: &Category, title: &str)
    -> RepoResult<Option<Article>>;

    /// Create and publish a new article (version 1).
    fn create_article(
        &self,
        category: &Category,
        meta: ArticleMeta,
        body: ArticleBody,
    ) -> RepoResult<Article>;

    /// Replace meta and body and publish them as a new version. Discards any
    /// pending draft.
    fn update_article(
        &self,
        article: &Article,
        meta: ArticleMeta,
        body: ArticleBody,
    ) -> RepoResult<Article>;

    /// Save an unpublished revision without touching the live content.
    fn save_draft(
        &self,
        article: &Article,
        meta: ArticleMeta,
        body: ArticleBody,
    ) -> RepoResult<Article>;

    /// Publish the pending draft, if any. Returns the article unchanged
    /// otherwise.
    fn publish_latest_draft(&self, article: &Article) -> RepoResult<Article>;

    /// Set live keywords in place, without creating a new version.
    fn set_keywords(&self, article: &Article, keywords: &str) -> RepoResult<Article>;

    /// Move the article out of its category.
    fn archive_article(&self, article: &Article) -> RepoResult<Article>;

    fn delete_article(&self, article: &Article) -> RepoResult<()>;

    /// Delete a category along with its archived articles. Fails while it
    /// still holds non-archived ones.
    fn delete_category(&self, category: &Category) -> RepoResult<()>;

    /// Site-relative URL path of a live article.
    fn article_path(&self, article: &Article) -> RepoResult<String>;
}
