//! Repository ports for categories and cities.

use crate::catalog::domain::{Category, CategoryId, City, CityId};
use crate::persistence::PersistenceFailure;
use crate::slug::Slug;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for catalog repository operations.
pub type CatalogRepositoryResult<T> = Result<T, CatalogRepositoryError>;

/// Category persistence contract.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Stores a new category.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::DuplicateCategory`] when the id
    /// already exists.
    async fn store_category(&self, category: &Category) -> CatalogRepositoryResult<()>;

    /// Replaces a stored category.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::CategoryNotFound`] for unknown ids.
    async fn update_category(&self, category: &Category) -> CatalogRepositoryResult<()>;

    /// Deletes a category.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::CategoryNotFound`] for unknown ids.
    async fn delete_category(&self, id: CategoryId) -> CatalogRepositoryResult<()>;

    /// Finds a category by id.
    async fn find_category(&self, id: CategoryId) -> CatalogRepositoryResult<Option<Category>>;

    /// Returns every category, oldest first.
    async fn list_categories(&self) -> CatalogRepositoryResult<Vec<Category>>;
}

/// City persistence contract.
#[async_trait]
pub trait CityRepository: Send + Sync {
    /// Stores a new city.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::DuplicateSlug`] when another city
    /// already uses the slug.
    async fn store_city(&self, city: &City) -> CatalogRepositoryResult<()>;

    /// Replaces a stored city.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::CityNotFound`] or
    /// [`CatalogRepositoryError::DuplicateSlug`].
    async fn update_city(&self, city: &City) -> CatalogRepositoryResult<()>;

    /// Deletes a city.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::CityNotFound`] for unknown ids.
    async fn delete_city(&self, id: CityId) -> CatalogRepositoryResult<()>;

    /// Finds a city by id.
    async fn find_city(&self, id: CityId) -> CatalogRepositoryResult<Option<City>>;

    /// Finds a city by slug.
    async fn find_city_by_slug(&self, slug: &Slug) -> CatalogRepositoryResult<Option<City>>;

    /// Returns the cities of `region`, ordered by name.
    async fn list_cities_in_region(&self, region: &str) -> CatalogRepositoryResult<Vec<City>>;
}

/// Errors returned by catalog repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CatalogRepositoryError {
    /// A category with the same identifier already exists.
    #[error("duplicate category identifier: {0}")]
    DuplicateCategory(CategoryId),

    /// A city with the same identifier already exists.
    #[error("duplicate city identifier: {0}")]
    DuplicateCity(CityId),

    /// Another city already uses the slug.
    #[error("a city with slug '{0}' already exists")]
    DuplicateSlug(Slug),

    /// The category does not exist.
    #[error("category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// The city does not exist.
    #[error("city not found: {0}")]
    CityNotFound(CityId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CatalogRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for CatalogRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for CatalogRepositoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}
