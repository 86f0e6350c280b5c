//! Domain model for task categories, cities and regions.

mod category;
mod city;
mod error;
mod ids;
mod regions;

pub use category::{Category, PersistedCategoryData};
pub use city::{City, PersistedCityData};
pub use error::CatalogDomainError;
pub use ids::{CategoryId, CityId};
pub use regions::{DEFAULT_REGIONS_PATH, FALLBACK_REGION, Region, RegionCatalog, RegionCatalogError};

fn required_text(field: &'static str, value: &str) -> Result<String, CatalogDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogDomainError::EmptyField { field });
    }
    Ok(trimmed.to_owned())
}
