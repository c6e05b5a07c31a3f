//! In-memory page tree persisted as a single JSON snapshot.
//!
//! All state sits behind one `RwLock`: lookups share a read lock, every
//! mutation holds the write lock for its whole duration. Nothing touches
//! disk until [`MemoryRepository::save`].

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::{
    Article, ArticleMeta, Category, ContentRepository, Index, PageId, PageStatus, RepoError,
    RepoResult, Revision,
};
use crate::block::ArticleBody;
use crate::render::slugify;

/// Serialized store contents.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    /// Last id handed out.
    #[serde(default)]
    last_id: PageId,
    #[serde(default)]
    index: Option<Index>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    articles: Vec<Article>,
}

impl Snapshot {
    fn next_id(&mut self) -> PageId {
        self.last_id += 1;
        self.last_id
    }

    fn article_mut(&mut self, id: PageId) -> RepoResult<&mut Article> {
        self.articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(RepoError::NotFound {
                kind: "article",
                id,
            })
    }

    fn category(&self, id: PageId) -> RepoResult<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or(RepoError::NotFound {
                kind: "category",
                id,
            })
    }

    /// Slug for a new article, unique among the category's live siblings.
    fn unique_article_slug(&self, category: PageId, title: &str, except: Option<PageId>) -> String {
        let mut base = slugify(title);
        if base.is_empty() {
            base = "article".to_owned();
        }
        let taken = |slug: &str| {
            self.articles.iter().any(|a| {
                a.category == category
                    && a.status != PageStatus::Archived
                    && Some(a.id) != except
                    && a.slug == slug
            })
        };

        let mut slug = base.clone();
        let mut counter = 1;
        while taken(&slug) {
            slug = format!("{base}-{counter}");
            counter += 1;
        }
        slug
    }
}

/// Thread-safe in-memory [`ContentRepository`].
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<Snapshot>,
    /// Snapshot file, `None` for purely in-memory stores.
    path: Option<PathBuf>,
}

impl MemoryRepository {
    /// Empty store that is never persisted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the snapshot at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> RepoResult<Self> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| RepoError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Snapshot::default(),
            Err(source) => return Err(RepoError::Io { path, source }),
        };

        crate::debug!("store"; "opened {}", path.display());
        Ok(Self {
            state: RwLock::new(state),
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the snapshot back to disk (no-op for unpersisted stores).
    ///
    /// The file is replaced atomically via a sibling temp file.
    pub fn save(&self) -> RepoResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| RepoError::Io {
            path: path.clone(),
            source,
        };

        let json = {
            let state = self.state.read();
            serde_json::to_string_pretty(&*state).map_err(|source| RepoError::Corrupt {
                path: path.clone(),
                source,
            })?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;

        crate::debug!("store"; "saved {}", path.display());
        Ok(())
    }
}

impl ContentRepository for MemoryRepository {
    fn find_or_create_index(&self, title: &str) -> RepoResult<Index> {
        let mut state = self.state.write();
        if let Some(index) = &state.index {
            return Ok(index.clone());
        }

        let slug = slugify(title);
        if slug.is_empty() {
            return Err(RepoError::Invalid {
                field: "index title",
                reason: format!("'{title}' has no usable characters"),
            });
        }
        let index = Index {
            id: state.next_id(),
            title: title.to_owned(),
            slug,
        };
        state.index = Some(index.clone());
        crate::log!("store"; "created index page '{}'", title);
        Ok(index)
    }

    fn find_or_create_category(&self, index: &Index, name: &str) -> RepoResult<Category> {
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(RepoError::Invalid {
                field: "category name",
                reason: format!("'{name}' has no usable characters"),
            });
        }

        let mut state = self.state.write();
        if let Some(category) = state
            .categories
            .iter()
            .find(|c| c.index == index.id && c.slug == slug)
        {
            return Ok(category.clone());
        }

        let category = Category {
            id: state.next_id(),
            index: index.id,
            name: name.to_owned(),
            slug,
        };
        state.categories.push(category.clone());
        crate::log!("store"; "created category '{}'", name);
        Ok(category)
    }

    fn find_category(&self, name: &str) -> RepoResult<Option<Category>> {
        let slug = slugify(name);
        let state = self.state.read();
        Ok(state.categories.iter().find(|c| c.slug == slug).cloned())
    }

    fn categories(&self) -> RepoResult<Vec<Category>> {
        Ok(self.state.read().categories.clone())
    }

    fn articles(&self, category: Option<&Category>) -> RepoResult<Vec<Article>> {
        let state = self.state.read();
        Ok(state
            .articles
            .iter()
            .filter(|a| a.status != PageStatus::Archived)
            .filter(|a| category.is_none_or(|c| a.category == c.id))
            .cloned()
            .collect())
    }

    fn find_article_by_title(
        &self,
        category: &Category,
        title: &str,
    ) -> RepoResult<Option<Article>> {
        let state = self.state.read();
        Ok(state
            .articles
            .iter()
            .find(|a| {
                a.category == category.id
                    && a.status != PageStatus::Archived
                    && a.meta.title == title
            })
            .cloned())
    }

    fn create_article(
        &self,
        category: &Category,
        meta: ArticleMeta,
        body: ArticleBody,
    ) -> RepoResult<Article> {
        let mut state = self.state.write();
        state.category(category.id)?;

        let slug = state.unique_article_slug(category.id, &meta.title, None);
        let article = Article {
            id: state.next_id(),
            category: category.id,
            slug,
            status: PageStatus::Published,
            version: 1,
            meta,
            body,
            draft: None,
        };
        state.articles.push(article.clone());
        Ok(article)
    }

    fn update_article(
        &self,
        article: &Article,
        meta: ArticleMeta,
        body: ArticleBody,
    ) -> RepoResult<Article> {
        let mut state = self.state.write();
        let stored = state.article_mut(article.id)?;
        stored.meta = meta;
        stored.body = body;
        stored.draft = None;
        stored.status = PageStatus::Published;
        stored.version += 1;
        Ok(stored.clone())
    }

    fn save_draft(
        &self,
        article: &Article,
        meta: ArticleMeta,
        body: ArticleBody,
    ) -> RepoResult<Article> {
        let mut state = self.state.write();
        let stored = state.article_mut(article.id)?;
        stored.draft = Some(Revision { meta, body });
        Ok(stored.clone())
    }

    fn publish_latest_draft(&self, article: &Article) -> RepoResult<Article> {
        let mut state = self.state.write();
        let stored = state.article_mut(article.id)?;
        if let Some(draft) = stored.draft.take() {
            stored.meta = draft.meta;
            stored.body = draft.body;
            stored.status = PageStatus::Published;
            stored.version += 1;
        }
        Ok(stored.clone())
    }

    fn set_keywords(&self, article: &Article, keywords: &str) -> RepoResult<Article> {
        let mut state = self.state.write();
        let stored = state.article_mut(article.id)?;
        stored.meta.keywords = keywords.to_owned();
        Ok(stored.clone())
    }

    fn archive_article(&self, article: &Article) -> RepoResult<Article> {
        let mut state = self.state.write();
        let stored = state.article_mut(article.id)?;
        stored.status = PageStatus::Archived;
        Ok(stored.clone())
    }

    fn delete_article(&self, article: &Article) -> RepoResult<()> {
        let mut state = self.state.write();
        let before = state.articles.len();
        state.articles.retain(|a| a.id != article.id);
        if state.articles.len() == before {
            return Err(RepoError::NotFound {
                kind: "article",
                id: article.id,
            });
        }
        Ok(())
    }

    fn delete_category(&self, category: &Category) -> RepoResult<()> {
        let mut state = self.state.write();
        state.category(category.id)?;

        let occupied = state
            .articles
            .iter()
            .any(|a| a.category == category.id && a.status != PageStatus::Archived);
        if occupied {
            return Err(RepoError::CategoryNotEmpty(category.name.clone()));
        }

        // archived articles go with their category
        state.articles.retain(|a| a.category != category.id);
        state.categories.retain(|c| c.id != category.id);
        Ok(())
    }

    fn article_path(&self, article: &Article) -> RepoResult<String> {
        let state = self.state.read();
        let category = state.category(article.category)?;
        let index_slug = state.index.as_ref().map_or("index", |i| i.slug.as_str());
        Ok(format!(
            "/{index_slug}/{}/{}/",
            category.slug, article.slug
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Block, HeadingLevel};

    fn meta(title: &str) -> ArticleMeta {
        ArticleMeta {
            title: title.into(),
            ..ArticleMeta::default()
        }
    }

    fn setup() -> (MemoryRepository, Category) {
        let repo = MemoryRepository::new();
        let index = repo.find_or_create_index("Index").unwrap();
        let category = repo.find_or_create_category(&index, "Allergies").unwrap();
        (repo, category)
    }

    #[test]
    fn test_find_or_create_is_idempotent() {
        let (repo, category) = setup();
        let index = repo.find_or_create_index("Index").unwrap();
        let again = repo.find_or_create_category(&index, "allergies").unwrap();
        assert_eq!(again, category);
        assert_eq!(repo.categories().unwrap().len(), 1);
        assert_eq!(repo.find_category("ALLERGIES").unwrap(), Some(category));
    }

    #[test]
    fn test_invalid_category_name() {
        let repo = MemoryRepository::new();
        let index = repo.find_or_create_index("Index").unwrap();
        assert!(matches!(
            repo.find_or_create_category(&index, "!!!"),
            Err(RepoError::Invalid { .. })
        ));
    }

    #[test]
    fn test_create_and_update() {
        let (repo, category) = setup();
        let article = repo
            .create_article(&category, meta("Hay Fever"), ArticleBody::new())
            .unwrap();
        assert_eq!(article.version, 1);
        assert_eq!(article.slug, "hay-fever");
        assert!(article.is_live());

        let body = ArticleBody::from(vec![Block::heading("Symptoms", HeadingLevel::H2)]);
        let updated = repo
            .update_article(&article, meta("Hay Fever"), body.clone())
            .unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.body, body);

        let found = repo
            .find_article_by_title(&category, "Hay Fever")
            .unwrap()
            .unwrap();
        assert_eq!(found, updated);
    }

    #[test]
    fn test_slug_collision() {
        let (repo, category) = setup();
        let first = repo
            .create_article(&category, meta("Hay Fever"), ArticleBody::new())
            .unwrap();
        let second = repo
            .create_article(&category, meta("Hay fever!"), ArticleBody::new())
            .unwrap();
        assert_eq!(first.slug, "hay-fever");
        assert_eq!(second.slug, "hay-fever-1");
        assert_eq!(
            repo.article_path(&second).unwrap(),
            "/index/allergies/hay-fever-1/"
        );
    }

    #[test]
    fn test_draft_lifecycle() {
        let (repo, category) = setup();
        let article = repo
            .create_article(&category, meta("Asthma"), ArticleBody::new())
            .unwrap();

        let drafted = repo
            .save_draft(&article, meta("Asthma"), ArticleBody::from(vec![Block::markdown("new")]))
            .unwrap();
        assert!(drafted.has_unpublished_changes());
        assert!(drafted.body.is_empty());

        let published = repo.publish_latest_draft(&drafted).unwrap();
        assert!(!published.has_unpublished_changes());
        assert_eq!(published.body.len(), 1);
        assert_eq!(published.version, 2);

        // nothing pending: unchanged
        assert_eq!(repo.publish_latest_draft(&published).unwrap(), published);
    }

    #[test]
    fn test_archive_hides_article() {
        let (repo, category) = setup();
        let article = repo
            .create_article(&category, meta("Eczema"), ArticleBody::new())
            .unwrap();
        repo.archive_article(&article).unwrap();

        assert!(
            repo.find_article_by_title(&category, "Eczema")
                .unwrap()
                .is_none()
        );
        assert!(repo.articles(Some(&category)).unwrap().is_empty());

        // the slug is free again
        let replacement = repo
            .create_article(&category, meta("Eczema"), ArticleBody::new())
            .unwrap();
        assert_eq!(replacement.slug, "eczema");
        repo.delete_category(&category).unwrap_err();

        repo.delete_article(&replacement).unwrap();
        repo.delete_category(&category).unwrap();
        assert!(repo.state.read().articles.is_empty());
    }

    #[test]
    fn test_delete() {
        let (repo, category) = setup();
        let article = repo
            .create_article(&category, meta("Rhinitis"), ArticleBody::new())
            .unwrap();

        assert!(matches!(
            repo.delete_category(&category),
            Err(RepoError::CategoryNotEmpty(_))
        ));
        repo.delete_article(&article).unwrap();
        assert!(matches!(
            repo.delete_article(&article),
            Err(RepoError::NotFound { .. })
        ));
        repo.delete_category(&category).unwrap();
        assert!(repo.categories().unwrap().is_empty());
    }

    #[test]
    fn test_set_keywords_keeps_version() {
        let (repo, category) = setup();
        let article = repo
            .create_article(&category, meta("Hives"), ArticleBody::new())
            .unwrap();
        let updated = repo.set_keywords(&article, "itch, rash").unwrap();
        assert_eq!(updated.meta.keywords, "itch, rash");
        assert_eq!(updated.version, 1);
    }

    #[test]
    fn test_snapshot_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("kb.json");

        let repo = MemoryRepository::open(&path).unwrap();
        let index = repo.find_or_create_index("Index").unwrap();
        let category = repo.find_or_create_category(&index, "Allergies").unwrap();
        let body = ArticleBody::from(vec![Block::markdown("text")]);
        repo.create_article(&category, meta("Hay Fever"), body.clone())
            .unwrap();
        repo.save().unwrap();

        let reopened = MemoryRepository::open(&path).unwrap();
        let article = reopened
            .find_article_by_title(&category, "Hay Fever")
            .unwrap()
            .unwrap();
        assert_eq!(article.body, body);

        // ids keep counting after reload
        let other = reopened
            .create_article(&category, meta("Asthma"), ArticleBody::new())
            .unwrap();
        assert!(other.id > article.id);
    }

    #[test]
    fn test_corrupt_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            MemoryRepository::open(&path),
            Err(RepoError::Corrupt { .. })
        ));
    }
}
