//! Blog categories.

use super::text::{optional, required};
use super::{ArticleCategoryId, ContentDomainError};
use crate::slug::{Slug, Slugifier};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A blog category addressed by a slug derived from its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleCategory {
    id: ArticleCategoryId,
    name: String,
    slug: Slug,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedArticleCategoryData {
    /// Persisted identifier.
    pub id: ArticleCategoryId,
    /// Persisted name.
    pub name: String,
    /// Persisted slug.
    pub slug: Slug,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ArticleCategory {
    /// Maximum description length in characters.
    pub const DESCRIPTION_MAX: usize = 500;

    /// Creates a category, deriving its slug from `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentDomainError`] for a blank name, an over-long
    /// description, or a name with nothing to slugify.
    pub fn new(
        name: &str,
        description: Option<&str>,
        slugifier: &dyn Slugifier,
        clock: &impl Clock,
    ) -> Result<Self, ContentDomainError> {
        let category_name = required("name", name, None)?;
        let slug = Slug::generate(slugifier, &category_name)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: ArticleCategoryId::new(),
            name: category_name,
            slug,
            description: optional("description", description, Self::DESCRIPTION_MAX)?,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a category from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedArticleCategoryData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            slug: data.slug,
            description: data.description,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> ArticleCategoryId {
        self.id
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the slug.
    #[must_use]
    pub const fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
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

    /// Replaces name and description; a new name regenerates the slug.
    ///
    /// # Errors
    ///
    /// Same as [`ArticleCategory::new`]; the category is left untouched on
    /// failure.
    pub fn update(
        &mut self,
        name: &str,
        description: Option<&str>,
        slugifier: &dyn Slugifier,
        clock: &impl Clock,
    ) -> Result<(), ContentDomainError> {
        let category_name = required("name", name, None)?;
        let new_description = optional("description", description, Self::DESCRIPTION_MAX)?;
        if category_name != self.name {
            self.slug = Slug::generate(slugifier, &category_name)?;
            self.name = category_name;
        }
        self.description = new_description;
        self.updated_at = clock.utc();
        Ok(())
    }
}
