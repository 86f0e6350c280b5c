//! Cities tasks can be located in.

use super::{CatalogDomainError, CityId, Region, required_text};
use crate::slug::{Slug, Slugifier};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A city within a catalogued region.
///
/// The slug always mirrors the current name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    id: CityId,
    name: String,
    slug: Slug,
    region: Region,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCityData {
    /// Persisted identifier.
    pub id: CityId,
    /// Persisted name.
    pub name: String,
    /// Persisted slug.
    pub slug: Slug,
    /// Persisted region.
    pub region: Region,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl City {
    /// Creates a city, deriving its slug from `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyField`] for a blank name or
    /// [`CatalogDomainError::Slug`] when the name has nothing to slugify.
    pub fn new(
        name: &str,
        region: Region,
        slugifier: &dyn Slugifier,
        clock: &impl Clock,
    ) -> Result<Self, CatalogDomainError> {
        let city_name = required_text("name", name)?;
        let slug = Slug::generate(slugifier, &city_name)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: CityId::new(),
            name: city_name,
            slug,
            region,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a city from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCityData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            slug: data.slug,
            region: data.region,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> CityId {
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

    /// Returns the region.
    #[must_use]
    pub const fn region(&self) -> &Region {
        &self.region
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

    /// Renames and/or moves the city. A new name regenerates the slug.
    ///
    /// # Errors
    ///
    /// Same as [`City::new`]; the city is left untouched on failure.
    pub fn update(
        &mut self,
        name: &str,
        region: Region,
        slugifier: &dyn Slugifier,
        clock: &impl Clock,
    ) -> Result<(), CatalogDomainError> {
        let city_name = required_text("name", name)?;
        if city_name != self.name {
            self.slug = Slug::generate(slugifier, &city_name)?;
            self.name = city_name;
        }
        self.region = region;
        self.updated_at = clock.utc();
        Ok(())
    }
}
