//! In-memory category and city store for tests and local tooling.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::catalog::{
    domain::{Category, CategoryId, City, CityId},
    ports::{CatalogRepositoryError, CatalogRepositoryResult, CategoryRepository, CityRepository},
};
use crate::slug::Slug;

/// Thread-safe in-memory repository implementing both catalog ports.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogRepository {
    categories: Arc<RwLock<HashMap<CategoryId, Category>>>,
    cities: Arc<RwLock<HashMap<CityId, City>>>,
}

impl InMemoryCatalogRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> CatalogRepositoryError {
    CatalogRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn ensure_slug_free(cities: &HashMap<CityId, City>, city: &City) -> CatalogRepositoryResult<()> {
    if cities
        .values()
        .any(|other| other.id() != city.id() && other.slug() == city.slug())
    {
        return Err(CatalogRepositoryError::DuplicateSlug(city.slug().clone()));
    }
    Ok(())
}

#[async_trait]
impl CategoryRepository for InMemoryCatalogRepository {
    async fn store_category(&self, category: &Category) -> CatalogRepositoryResult<()> {
        let mut categories = self.categories.write().map_err(lock_error)?;
        if categories.contains_key(&category.id()) {
            return Err(CatalogRepositoryError::DuplicateCategory(category.id()));
        }
        categories.insert(category.id(), category.clone());
        Ok(())
    }

    async fn update_category(&self, category: &Category) -> CatalogRepositoryResult<()> {
        let mut categories = self.categories.write().map_err(lock_error)?;
        let slot = categories
            .get_mut(&category.id())
            .ok_or(CatalogRepositoryError::CategoryNotFound(category.id()))?;
        *slot = category.clone();
        Ok(())
    }

    async fn delete_category(&self, id: CategoryId) -> CatalogRepositoryResult<()> {
        let mut categories = self.categories.write().map_err(lock_error)?;
        categories
            .remove(&id)
            .map(drop)
            .ok_or(CatalogRepositoryError::CategoryNotFound(id))
    }

    async fn find_category(&self, id: CategoryId) -> CatalogRepositoryResult<Option<Category>> {
        let categories = self.categories.read().map_err(lock_error)?;
        Ok(categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> CatalogRepositoryResult<Vec<Category>> {
        let categories = self.categories.read().map_err(lock_error)?;
        let mut all: Vec<Category> = categories.values().cloned().collect();
        all.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(all)
    }
}

#[async_trait]
impl CityRepository for InMemoryCatalogRepository {
    async fn store_city(&self, city: &City) -> CatalogRepositoryResult<()> {
        let mut cities = self.cities.write().map_err(lock_error)?;
        if cities.contains_key(&city.id()) {
            return Err(CatalogRepositoryError::DuplicateCity(city.id()));
        }
        ensure_slug_free(&cities, city)?;
        cities.insert(city.id(), city.clone());
        Ok(())
    }

    async fn update_city(&self, city: &City) -> CatalogRepositoryResult<()> {
        let mut cities = self.cities.write().map_err(lock_error)?;
        if !cities.contains_key(&city.id()) {
            return Err(CatalogRepositoryError::CityNotFound(city.id()));
        }
        ensure_slug_free(&cities, city)?;
        cities.insert(city.id(), city.clone());
        Ok(())
    }

    async fn delete_city(&self, id: CityId) -> CatalogRepositoryResult<()> {
        let mut cities = self.cities.write().map_err(lock_error)?;
        cities
            .remove(&id)
            .map(drop)
            .ok_or(CatalogRepositoryError::CityNotFound(id))
    }

    async fn find_city(&self, id: CityId) -> CatalogRepositoryResult<Option<City>> {
        let cities = self.cities.read().map_err(lock_error)?;
        Ok(cities.get(&id).cloned())
    }

    async fn find_city_by_slug(&self, slug: &Slug) -> CatalogRepositoryResult<Option<City>> {
        let cities = self.cities.read().map_err(lock_error)?;
        Ok(cities.values().find(|city| city.slug() == slug).cloned())
    }

    async fn list_cities_in_region(&self, region: &str) -> CatalogRepositoryResult<Vec<City>> {
        let cities = self.cities.read().map_err(lock_error)?;
        let mut matching: Vec<City> = cities
            .values()
            .filter(|city| city.region().as_str() == region)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(&b.id())));
        Ok(matching)
    }
}
