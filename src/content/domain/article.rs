//! Blog articles.

use super::text::{derive_excerpt, optional, required};
use super::{ArticleCategoryId, ArticleId, ArticleStatus, ContentDomainError, SeoInput, SeoMeta};
use crate::slug::{Slug, Slugifier};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Article form values as submitted by an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    /// Headline.
    pub title: String,
    /// HTML body.
    pub content: String,
    /// Teaser; derived from the body when blank.
    pub excerpt: Option<String>,
    /// Path of the uploaded cover image.
    pub image: Option<String>,
    /// Blog category.
    pub category_id: ArticleCategoryId,
    /// Requested publication status.
    pub status: ArticleStatus,
    /// Search-engine metadata.
    pub seo: SeoInput,
}

impl ArticleDraft {
    /// Creates a draft with no excerpt, image or metadata.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category_id: ArticleCategoryId,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            excerpt: None,
            image: None,
            category_id,
            status: ArticleStatus::Draft,
            seo: SeoInput::default(),
        }
    }

    /// Sets an explicit excerpt.
    #[must_use]
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    /// Sets the cover image path.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Sets the requested status.
    #[must_use]
    pub const fn with_status(mut self, status: ArticleStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the metadata.
    #[must_use]
    pub fn with_seo(mut self, seo: SeoInput) -> Self {
        self.seo = seo;
        self
    }

    /// Returns the slug the title asks for before de-duplication.
    ///
    /// # Errors
    ///
    /// Returns [`ContentDomainError::EmptyField`] for a blank title or
    /// [`ContentDomainError::Slug`] when it has nothing to slugify.
    pub fn base_slug(&self, slugifier: &dyn Slugifier) -> Result<Slug, ContentDomainError> {
        let title = required("title", &self.title, Some(Article::TITLE_MAX))?;
        Ok(Slug::generate(slugifier, &title)?)
    }
}

/// Validated draft fields shared by creation and revision.
struct ArticleFields {
    title: String,
    content: String,
    excerpt: String,
    image: Option<String>,
    seo: SeoMeta,
}

impl ArticleFields {
    fn validate(draft: &ArticleDraft) -> Result<Self, ContentDomainError> {
        let title = required("title", &draft.title, Some(Article::TITLE_MAX))?;
        let content = required("content", &draft.content, None)?;
        let excerpt = optional("excerpt", draft.excerpt.as_deref(), Article::EXCERPT_MAX)?
            .unwrap_or_else(|| derive_excerpt(&content));
        let image = optional("image", draft.image.as_deref(), Article::IMAGE_MAX)?;
        let seo = SeoMeta::resolve(&draft.seo, &title)?;
        Ok(Self {
            title,
            content,
            excerpt,
            image,
            seo,
        })
    }
}

/// A blog article.
///
/// `published_at` records the first publication and survives unpublishing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    id: ArticleId,
    title: String,
    slug: Slug,
    content: String,
    excerpt: String,
    image: Option<String>,
    category_id: ArticleCategoryId,
    status: ArticleStatus,
    seo: SeoMeta,
    views_count: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    published_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedArticleData {
    /// Persisted identifier.
    pub id: ArticleId,
    /// Persisted title.
    pub title: String,
    /// Persisted slug.
    pub slug: Slug,
    /// Persisted HTML body.
    pub content: String,
    /// Persisted excerpt.
    pub excerpt: String,
    /// Persisted cover image path.
    pub image: Option<String>,
    /// Persisted category.
    pub category_id: ArticleCategoryId,
    /// Persisted status.
    pub status: ArticleStatus,
    /// Persisted metadata.
    pub seo: SeoMeta,
    /// Persisted view counter.
    pub views_count: u64,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted first publication timestamp.
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Maximum title length in characters.
    pub const TITLE_MAX: usize = 200;
    /// Maximum explicit excerpt length in characters.
    pub const EXCERPT_MAX: usize = 500;
    /// Maximum image path length in characters.
    pub const IMAGE_MAX: usize = 255;

    /// Creates an article under an already de-duplicated slug.
    ///
    /// # Errors
    ///
    /// Returns [`ContentDomainError`] when a field is blank or too long.
    pub fn new(
        draft: &ArticleDraft,
        slug: Slug,
        clock: &impl Clock,
    ) -> Result<Self, ContentDomainError> {
        let fields = ArticleFields::validate(draft)?;
        let timestamp = clock.utc();
        let mut article = Self {
            id: ArticleId::new(),
            title: fields.title,
            slug,
            content: fields.content,
            excerpt: fields.excerpt,
            image: fields.image,
            category_id: draft.category_id,
            status: ArticleStatus::Draft,
            seo: fields.seo,
            views_count: 0,
            created_at: timestamp,
            updated_at: timestamp,
            published_at: None,
        };
        article.set_status(draft.status, timestamp);
        Ok(article)
    }

    /// Reconstructs an article from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedArticleData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            slug: data.slug,
            content: data.content,
            excerpt: data.excerpt,
            image: data.image,
            category_id: data.category_id,
            status: data.status,
            seo: data.seo,
            views_count: data.views_count,
            created_at: data.created_at,
            updated_at: data.updated_at,
            published_at: data.published_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> ArticleId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the slug.
    #[must_use]
    pub const fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Returns the HTML body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the excerpt.
    #[must_use]
    pub fn excerpt(&self) -> &str {
        &self.excerpt
    }

    /// Returns the cover image path.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Returns the category.
    #[must_use]
    pub const fn category_id(&self) -> ArticleCategoryId {
        self.category_id
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> ArticleStatus {
        self.status
    }

    /// Returns `true` for published articles.
    #[must_use]
    pub const fn is_published(&self) -> bool {
        matches!(self.status, ArticleStatus::Published)
    }

    /// Returns the metadata.
    #[must_use]
    pub const fn seo(&self) -> &SeoMeta {
        &self.seo
    }

    /// Returns the view counter.
    #[must_use]
    pub const fn views_count(&self) -> u64 {
        self.views_count
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the first publication timestamp.
    #[must_use]
    pub const fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Returns `true` when `title` would need a new slug.
    #[must_use]
    pub fn title_changes(&self, title: &str) -> bool {
        self.title != title.trim()
    }

    /// Replaces every editable field. `slug` is `Some` when the title
    /// changed and a fresh slug was reserved.
    ///
    /// # Errors
    ///
    /// Returns [`ContentDomainError`] when a field is blank or too long; the
    /// article is left untouched.
    pub fn revise(
        &mut self,
        draft: &ArticleDraft,
        slug: Option<Slug>,
        clock: &impl Clock,
    ) -> Result<(), ContentDomainError> {
        let fields = ArticleFields::validate(draft)?;
        let timestamp = clock.utc();
        self.title = fields.title;
        self.content = fields.content;
        self.excerpt = fields.excerpt;
        if fields.image.is_some() {
            self.image = fields.image;
        }
        self.category_id = draft.category_id;
        self.seo = fields.seo;
        if let Some(fresh) = slug {
            self.slug = fresh;
        }
        self.set_status(draft.status, timestamp);
        self.updated_at = timestamp;
        Ok(())
    }

    /// Publishes the article.
    pub fn publish(&mut self, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.set_status(ArticleStatus::Published, timestamp);
        self.updated_at = timestamp;
    }

    /// Returns the article to draft. The first publication date is kept.
    pub fn unpublish(&mut self, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.set_status(ArticleStatus::Draft, timestamp);
        self.updated_at = timestamp;
    }

    /// Flips between draft and published.
    pub fn toggle_publication(&mut self, clock: &impl Clock) {
        if self.is_published() {
            self.unpublish(clock);
        } else {
            self.publish(clock);
        }
    }

    /// Counts one read.
    pub const fn record_view(&mut self) {
        self.views_count = self.views_count.saturating_add(1);
    }

    fn set_status(&mut self, status: ArticleStatus, timestamp: DateTime<Utc>) {
        self.status = status;
        if status == ArticleStatus::Published && self.published_at.is_none() {
            self.published_at = Some(timestamp);
        }
    }
}
