//! Identifier types for the content domain.

use crate::ids::uuid_id;

uuid_id! {
    /// Unique identifier for a blog article.
    ArticleId
}

uuid_id! {
    /// Unique identifier for a blog category.
    ArticleCategoryId
}

uuid_id! {
    /// Unique identifier for a static page.
    PageId
}
