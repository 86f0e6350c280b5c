//! Port contracts for content persistence.

mod repository;

pub use repository::{
    ArticleCategoryRepository, ArticleFilter, ArticleRepository, ContentRepositoryError,
    ContentRepositoryResult, PageRepository,
};
