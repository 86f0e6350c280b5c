//! Repository ports for articles, blog categories and static pages.

use crate::content::domain::{
    Article, ArticleCategory, ArticleCategoryId, ArticleId, ArticleStatus, PageId, StaticPage,
};
use crate::pagination::{Page, PageRequest};
use crate::persistence::PersistenceFailure;
use crate::slug::Slug;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for content repository operations.
pub type ContentRepositoryResult<T> = Result<T, ContentRepositoryError>;

/// Admin article list filter. `None` fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    /// Restrict to one status.
    pub status: Option<ArticleStatus>,
    /// Restrict to one category.
    pub category: Option<ArticleCategoryId>,
}

impl ArticleFilter {
    /// Creates a filter matching every article.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: None,
            category: None,
        }
    }

    /// Restricts the filter to `status`.
    #[must_use]
    pub const fn with_status(mut self, status: ArticleStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the filter to `category`.
    #[must_use]
    pub const fn with_category(mut self, category: ArticleCategoryId) -> Self {
        self.category = Some(category);
        self
    }

    /// Returns `true` when `article` passes the filter.
    #[must_use]
    pub fn matches(&self, article: &Article) -> bool {
        self.status.is_none_or(|status| article.status() == status)
            && self
                .category
                .is_none_or(|category| article.category_id() == category)
    }
}

/// Blog category persistence contract.
#[async_trait]
pub trait ArticleCategoryRepository: Send + Sync {
    /// Stores a new category.
    ///
    /// # Errors
    ///
    /// Returns [`ContentRepositoryError::DuplicateSlug`] when the slug is
    /// taken.
    async fn store_category(&self, category: &ArticleCategory) -> ContentRepositoryResult<()>;

    /// Replaces a stored category.
    ///
    /// # Errors
    ///
    /// Returns [`ContentRepositoryError::CategoryNotFound`] or
    /// [`ContentRepositoryError::DuplicateSlug`].
    async fn update_category(&self, category: &ArticleCategory) -> ContentRepositoryResult<()>;

    /// Deletes a category.
    ///
    /// # Errors
    ///
    /// Returns [`ContentRepositoryError::CategoryNotFound`] for unknown ids.
    async fn delete_category(&self, id: ArticleCategoryId) -> ContentRepositoryResult<()>;

    /// Finds a category by id.
    async fn find_category(
        &self,
        id: ArticleCategoryId,
    ) -> ContentRepositoryResult<Option<ArticleCategory>>;

    /// Finds a category by slug.
    async fn find_category_by_slug(
        &self,
        slug: &Slug,
    ) -> ContentRepositoryResult<Option<ArticleCategory>>;

    /// Returns every category ordered by name.
    async fn list_categories(&self) -> ContentRepositoryResult<Vec<ArticleCategory>>;
}

/// Article persistence contract.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Stores a new article.
    ///
    /// # Errors
    ///
    /// Returns [`ContentRepositoryError::DuplicateSlug`] when the slug is
    /// taken.
    async fn store_article(&self, article: &Article) -> ContentRepositoryResult<()>;

    /// Replaces a stored article.
    ///
    /// # Errors
    ///
    /// Returns [`ContentRepositoryError::ArticleNotFound`] or
    /// [`ContentRepositoryError::DuplicateSlug`].
    async fn update_article(&self, article: &Article) -> ContentRepositoryResult<()>;

    /// Deletes an article.
    ///
    /// # Errors
    ///
    /// Returns [`ContentRepositoryError::ArticleNotFound`] for unknown ids.
    async fn delete_article(&self, id: ArticleId) -> ContentRepositoryResult<()>;

    /// Finds an article by id.
    async fn find_article(&self, id: ArticleId) -> ContentRepositoryResult<Option<Article>>;

    /// Finds a published article by slug.
    async fn find_published_by_slug(&self, slug: &Slug)
    -> ContentRepositoryResult<Option<Article>>;

    /// Returns `true` when an article other than `except` uses `slug`.
    async fn article_slug_taken(
        &self,
        slug: &Slug,
        except: Option<ArticleId>,
    ) -> ContentRepositoryResult<bool>;

    /// Pages through articles matching `filter`, most recently updated first.
    async fn list_articles(
        &self,
        filter: ArticleFilter,
        page: PageRequest,
    ) -> ContentRepositoryResult<Page<Article>>;

    /// Pages through published articles, newest publication first.
    async fn list_published(
        &self,
        category: Option<ArticleCategoryId>,
        page: PageRequest,
    ) -> ContentRepositoryResult<Page<Article>>;

    /// Returns up to `limit` other published articles in `article`'s
    /// category, newest publication first.
    async fn related_articles(
        &self,
        article: &Article,
        limit: u32,
    ) -> ContentRepositoryResult<Vec<Article>>;

    /// Adds one to an article's view counter and returns the new count.
    ///
    /// # Errors
    ///
    /// Returns [`ContentRepositoryError::ArticleNotFound`] for unknown ids.
    async fn increment_views(&self, id: ArticleId) -> ContentRepositoryResult<u64>;
}

/// Static page persistence contract.
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Stores a new page.
    ///
    /// # Errors
    ///
    /// Returns [`ContentRepositoryError::DuplicateSlug`] when the slug is
    /// taken.
    async fn store_page(&self, page: &StaticPage) -> ContentRepositoryResult<()>;

    /// Replaces a stored page.
    ///
    /// # Errors
    ///
    /// Returns [`ContentRepositoryError::PageNotFound`] or
    /// [`ContentRepositoryError::DuplicateSlug`].
    async fn update_page(&self, page: &StaticPage) -> ContentRepositoryResult<()>;

    /// Deletes a page.
    ///
    /// # Errors
    ///
    /// Returns [`ContentRepositoryError::PageNotFound`] for unknown ids.
    async fn delete_page(&self, id: PageId) -> ContentRepositoryResult<()>;

    /// Finds a page by id.
    async fn find_page(&self, id: PageId) -> ContentRepositoryResult<Option<StaticPage>>;

    /// Finds a page by slug.
    async fn find_page_by_slug(&self, slug: &Slug) -> ContentRepositoryResult<Option<StaticPage>>;

    /// Returns `true` when a page other than `except` uses `slug`.
    async fn page_slug_taken(
        &self,
        slug: &Slug,
        except: Option<PageId>,
    ) -> ContentRepositoryResult<bool>;

    /// Pages through every page, most recently updated first.
    async fn list_pages(&self, page: PageRequest) -> ContentRepositoryResult<Page<StaticPage>>;
}

/// Errors returned by content repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ContentRepositoryError {
    /// An article with the same identifier already exists.
    #[error("duplicate article identifier: {0}")]
    DuplicateArticle(ArticleId),

    /// A category with the same identifier already exists.
    #[error("duplicate article category identifier: {0}")]
    DuplicateCategory(ArticleCategoryId),

    /// A page with the same identifier already exists.
    #[error("duplicate page identifier: {0}")]
    DuplicatePage(PageId),

    /// The slug is already used by another record of the same kind.
    #[error("slug '{0}' is already taken")]
    DuplicateSlug(Slug),

    /// The article does not exist.
    #[error("article not found: {0}")]
    ArticleNotFound(ArticleId),

    /// The category does not exist.
    #[error("article category not found: {0}")]
    CategoryNotFound(ArticleCategoryId),

    /// The page does not exist.
    #[error("page not found: {0}")]
    PageNotFound(PageId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ContentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for ContentRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for ContentRepositoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}
