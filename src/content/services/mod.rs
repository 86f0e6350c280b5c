//! Orchestration services for the blog and static pages.

mod article;
mod category;
mod page;

pub use article::{ArticleService, ArticleView, PublishedArticles};
pub use category::{ArticleCategoryInput, ArticleCategoryService};
pub use page::PageService;

use crate::content::{
    domain::{ArticleCategoryId, ArticleId, ContentDomainError, PageId},
    ports::ContentRepositoryError,
};
use thiserror::Error;

/// Service-level errors for content operations.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ContentDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ContentRepositoryError),

    /// The article does not exist.
    #[error("article not found: {0}")]
    ArticleNotFound(ArticleId),

    /// No published article has the slug.
    #[error("no published article at '{0}'")]
    ArticleSlugNotFound(String),

    /// The blog category does not exist.
    #[error("article category not found: {0}")]
    CategoryNotFound(ArticleCategoryId),

    /// The page does not exist.
    #[error("page not found: {0}")]
    PageNotFound(PageId),

    /// No page has the slug.
    #[error("no page at '{0}'")]
    PageSlugNotFound(String),
}

/// Result type for content service operations.
pub type ContentResult<T> = Result<T, ContentError>;
