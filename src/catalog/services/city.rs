//! City administration within the region catalog.

use super::{CatalogError, CatalogResult};
use crate::access::AdminActor;
use crate::catalog::{
    domain::{City, CityId, RegionCatalog},
    ports::CityRepository,
};
use crate::slug::{BasicSlugifier, Slugifier};
use mockable::Clock;
use std::sync::Arc;

/// Form values for creating or editing a city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityInput {
    /// City name.
    pub name: String,
    /// Region name, which must be in the catalog.
    pub region: String,
}

impl CityInput {
    /// Creates city form values.
    #[must_use]
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
        }
    }
}

/// Browses cities by region and lets administrators curate them.
#[derive(Clone)]
pub struct CityService<R, C>
where
    R: CityRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    regions: Arc<RegionCatalog>,
    slugifier: Arc<dyn Slugifier>,
    clock: Arc<C>,
}

impl<R, C> CityService<R, C>
where
    R: CityRepository,
    C: Clock + Send + Sync,
{
    /// Creates a city service using [`BasicSlugifier`].
    #[must_use]
    pub fn new(repository: Arc<R>, regions: Arc<RegionCatalog>, clock: Arc<C>) -> Self {
        Self {
            repository,
            regions,
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

    /// Returns the region names in catalog order.
    #[must_use]
    pub fn regions(&self) -> &[String] {
        self.regions.names()
    }

    /// Returns the cities of `region`, ordered by name.
    ///
    /// Regions outside the catalog simply have no cities.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Repository`] when the lookup fails.
    pub async fn cities_in_region(&self, region: &str) -> CatalogResult<Vec<City>> {
        Ok(self.repository.list_cities_in_region(region.trim()).await?)
    }

    /// Loads one city.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::CityNotFound`] for unknown ids.
    pub async fn get(&self, id: CityId) -> CatalogResult<City> {
        tracing::debug!(city_id = %id, "loading city");
        self.repository
            .find_city(id)
            .await?
            .ok_or(CatalogError::CityNotFound(id))
    }

    /// Creates a city.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Domain`] for a blank name or unknown region,
    /// or [`CatalogError::Repository`] when the slug is taken.
    pub async fn create(&self, admin: &AdminActor, input: &CityInput) -> CatalogResult<City> {
        let region = self.regions.resolve(&input.region)?;
        let city = City::new(&input.name, region, &*self.slugifier, &*self.clock)?;
        self.repository.store_city(&city).await?;
        tracing::info!(city_id = %city.id(), admin_id = %admin.user_id(), "city created");
        Ok(city)
    }

    /// Renames or moves a city.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::CityNotFound`], or the errors of
    /// [`create`](Self::create).
    pub async fn update(
        &self,
        admin: &AdminActor,
        id: CityId,
        input: &CityInput,
    ) -> CatalogResult<City> {
        let region = self.regions.resolve(&input.region)?;
        let mut city = self.get(id).await?;
        city.update(&input.name, region, &*self.slugifier, &*self.clock)?;
        self.repository.update_city(&city).await?;
        tracing::info!(city_id = %id, admin_id = %admin.user_id(), "city updated");
        Ok(city)
    }

    /// Deletes a city. Tasks keep their dangling reference.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Repository`] for unknown ids.
    pub async fn delete(&self, admin: &AdminActor, id: CityId) -> CatalogResult<()> {
        self.repository.delete_city(id).await?;
        tracing::info!(city_id = %id, admin_id = %admin.user_id(), "city deleted");
        Ok(())
    }
}
