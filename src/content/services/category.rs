//! Blog category administration.

use super::{ContentError, ContentResult};
use crate::access::AdminActor;
use crate::content::{
    domain::{ArticleCategory, ArticleCategoryId},
    ports::ArticleCategoryRepository,
};
use crate::slug::{BasicSlugifier, Slugifier};
use mockable::Clock;
use std::sync::Arc;

/// Form values for creating or editing a blog category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCategoryInput {
    /// Display name.
    pub name: String,
    /// Optional blurb.
    pub description: Option<String>,
}

impl ArticleCategoryInput {
    /// Creates form values without a description.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// CRUD over blog categories.
#[derive(Clone)]
pub struct ArticleCategoryService<R, C>
where
    R: ArticleCategoryRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    slugifier: Arc<dyn Slugifier>,
    clock: Arc<C>,
}

impl<R, C> ArticleCategoryService<R, C>
where
    R: ArticleCategoryRepository,
    C: Clock + Send + Sync,
{
    /// Creates a category service using [`BasicSlugifier`].
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            slugifier: Arc::new(BasicSlugifier),
            clock,
        }
    }

    /// Replaces the slugifier.
    #[must_use]
    pub fn with_slugifier(mut self, slugifier: Arc<dyn Slugifier>) -> Self {
        self.slugifier = slugifier;
        self
    }

    /// Returns every category ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Repository`] when the lookup fails.
    pub async fn list(&self) -> ContentResult<Vec<ArticleCategory>> {
        Ok(self.repository.list_categories().await?)
    }

    /// Loads one category.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::CategoryNotFound`] for unknown ids.
    pub async fn get(&self, id: ArticleCategoryId) -> ContentResult<ArticleCategory> {
        self.repository
            .find_category(id)
            .await?
            .ok_or(ContentError::CategoryNotFound(id))
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Domain`] for invalid input or
    /// [`ContentError::Repository`] when the slug is taken.
    pub async fn create(
        &self,
        admin: &AdminActor,
        input: &ArticleCategoryInput,
    ) -> ContentResult<ArticleCategory> {
        let category = ArticleCategory::new(
            &input.name,
            input.description.as_deref(),
            &*self.slugifier,
            &*self.clock,
        )?;
        self.repository.store_category(&category).await?;
        tracing::info!(
            category_id = %category.id(),
            admin_id = %admin.user_id(),
            "article category created"
        );
        Ok(category)
    }

    /// Replaces a category's name and description.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::CategoryNotFound`], or the errors of
    /// [`create`](Self::create).
    pub async fn update(
        &self,
        admin: &AdminActor,
        id: ArticleCategoryId,
        input: &ArticleCategoryInput,
    ) -> ContentResult<ArticleCategory> {
        let mut category = self.get(id).await?;
        category.update(
            &input.name,
            input.description.as_deref(),
            &*self.slugifier,
            &*self.clock,
        )?;
        self.repository.update_category(&category).await?;
        tracing::info!(category_id = %id, admin_id = %admin.user_id(), "article category updated");
        Ok(category)
    }

    /// Deletes a category. Its articles keep the dangling reference.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Repository`] for unknown ids.
    pub async fn delete(&self, admin: &AdminActor, id: ArticleCategoryId) -> ContentResult<()> {
        self.repository.delete_category(id).await?;
        tracing::info!(category_id = %id, admin_id = %admin.user_id(), "article category deleted");
        Ok(())
    }
}
