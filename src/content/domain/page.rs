//! Static pages such as terms of service or the help centre.

use super::text::required;
use super::{ContentDomainError, PageId, SeoInput, SeoMeta};
use crate::slug::{Slug, Slugifier};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Page form values as submitted by an administrator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageDraft {
    /// Page heading.
    pub title: String,
    /// HTML body.
    pub content: String,
    /// Explicit slug; generated from the title when blank.
    pub slug: Option<String>,
    /// Search-engine metadata.
    pub seo: SeoInput,
}

impl PageDraft {
    /// Creates a draft with a generated slug and no metadata.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Requests an explicit slug.
    #[must_use]
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Sets the metadata.
    #[must_use]
    pub fn with_seo(mut self, seo: SeoInput) -> Self {
        self.seo = seo;
        self
    }

    /// Returns the slug this draft asks for before de-duplication.
    ///
    /// # Errors
    ///
    /// Returns [`ContentDomainError::EmptyField`] for a blank title when no
    /// slug was given, or [`ContentDomainError::Slug`] when neither yields a
    /// valid slug.
    pub fn base_slug(&self, slugifier: &dyn Slugifier) -> Result<Slug, ContentDomainError> {
        let explicit = self
            .slug
            .as_deref()
            .map(str::trim)
            .filter(|slug| !slug.is_empty());
        let slug = match explicit {
            Some(value) => Slug::new(value)?,
            None => Slug::generate(slugifier, &required("title", &self.title, None)?)?,
        };
        Ok(slug)
    }
}

/// A static page addressed by slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticPage {
    id: PageId,
    title: String,
    slug: Slug,
    content: String,
    seo: SeoMeta,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPageData {
    /// Persisted identifier.
    pub id: PageId,
    /// Persisted title.
    pub title: String,
    /// Persisted slug.
    pub slug: Slug,
    /// Persisted HTML body.
    pub content: String,
    /// Persisted metadata.
    pub seo: SeoMeta,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl StaticPage {
    /// Maximum title length in characters.
    pub const TITLE_MAX: usize = 200;

    /// Creates a page under an already de-duplicated slug.
    ///
    /// # Errors
    ///
    /// Returns [`ContentDomainError`] when a field is blank or too long.
    pub fn new(
        draft: &PageDraft,
        slug: Slug,
        clock: &impl Clock,
    ) -> Result<Self, ContentDomainError> {
        let title = required("title", &draft.title, Some(Self::TITLE_MAX))?;
        let content = required("content", &draft.content, None)?;
        let seo = SeoMeta::resolve(&draft.seo, &title)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: PageId::new(),
            title,
            slug,
            content,
            seo,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a page from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedPageData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            slug: data.slug,
            content: data.content,
            seo: data.seo,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> PageId {
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

    /// Returns the metadata.
    #[must_use]
    pub const fn seo(&self) -> &SeoMeta {
        &self.seo
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

    /// Replaces every editable field and the slug.
    ///
    /// # Errors
    ///
    /// Returns [`ContentDomainError`] when a field is blank or too long; the
    /// page is left untouched.
    pub fn revise(
        &mut self,
        draft: &PageDraft,
        slug: Slug,
        clock: &impl Clock,
    ) -> Result<(), ContentDomainError> {
        let title = required("title", &draft.title, Some(Self::TITLE_MAX))?;
        let content = required("content", &draft.content, None)?;
        self.seo = SeoMeta::resolve(&draft.seo, &title)?;
        self.title = title;
        self.content = content;
        self.slug = slug;
        self.updated_at = clock.utc();
        Ok(())
    }
}
