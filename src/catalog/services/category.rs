//! Category administration.

use super::{CatalogError, CatalogResult};
use crate::access::AdminActor;
use crate::catalog::{
    domain::{Category, CategoryId},
    ports::CategoryRepository,
};
use mockable::Clock;
use std::sync::Arc;

/// Form values for creating or editing a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    /// Display name.
    pub name: String,
    /// Icon path or CSS class.
    pub icon: String,
}

impl CategoryInput {
    /// Creates category form values.
    #[must_use]
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
        }
    }
}

/// Lists categories for everyone and lets administrators curate them.
#[derive(Clone)]
pub struct CategoryService<R, C>
where
    R: CategoryRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> CategoryService<R, C>
where
    R: CategoryRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new category service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns every category, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Repository`] when the lookup fails.
    pub async fn list(&self) -> CatalogResult<Vec<Category>> {
        Ok(self.repository.list_categories().await?)
    }

    /// Loads one category.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::CategoryNotFound`] for unknown ids.
    pub async fn get(&self, id: CategoryId) -> CatalogResult<Category> {
        tracing::debug!(category_id = %id, "loading category");
        self.repository
            .find_category(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Domain`] for blank values.
    pub async fn create(
        &self,
        admin: &AdminActor,
        input: &CategoryInput,
    ) -> CatalogResult<Category> {
        let category = Category::new(&input.name, &input.icon, &*self.clock)?;
        self.repository.store_category(&category).await?;
        tracing::info!(
            category_id = %category.id(),
            admin_id = %admin.user_id(),
            "category created"
        );
        Ok(category)
    }

    /// Replaces a category's name and icon.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::CategoryNotFound`] or [`CatalogError::Domain`].
    pub async fn update(
        &self,
        admin: &AdminActor,
        id: CategoryId,
        input: &CategoryInput,
    ) -> CatalogResult<Category> {
        let mut category = self.get(id).await?;
        category.update(&input.name, &input.icon)?;
        self.repository.update_category(&category).await?;
        tracing::info!(category_id = %id, admin_id = %admin.user_id(), "category updated");
        Ok(category)
    }

    /// Deletes a category. Tasks keep their dangling reference.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Repository`] with
    /// [`CatalogRepositoryError::CategoryNotFound`](crate::catalog::ports::CatalogRepositoryError::CategoryNotFound)
    /// for unknown ids.
    pub async fn delete(&self, admin: &AdminActor, id: CategoryId) -> CatalogResult<()> {
        self.repository.delete_category(id).await?;
        tracing::info!(category_id = %id, admin_id = %admin.user_id(), "category deleted");
        Ok(())
    }
}
