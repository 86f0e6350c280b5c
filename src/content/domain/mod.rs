//! Domain model for articles, article categories and static pages.

mod article;
mod category;
mod error;
mod ids;
mod page;
mod seo;
mod status;
mod text;

pub use article::{Article, ArticleDraft, PersistedArticleData};
pub use category::{ArticleCategory, PersistedArticleCategoryData};
pub use error::{ContentDomainError, ParseArticleStatusError};
pub use ids::{ArticleCategoryId, ArticleId, PageId};
pub use page::{PageDraft, PersistedPageData, StaticPage};
pub use seo::{SeoInput, SeoMeta};
pub use status::ArticleStatus;
pub use text::{EXCERPT_LENGTH, derive_excerpt, strip_html_tags, truncate_with_ellipsis};
