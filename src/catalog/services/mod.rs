//! Orchestration services for catalog administration.

mod category;
mod city;

pub use category::{CategoryInput, CategoryService};
pub use city::{CityInput, CityService};

use crate::catalog::{
    domain::{CatalogDomainError, CategoryId, CityId},
    ports::CatalogRepositoryError,
};
use thiserror::Error;

/// Service-level errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] CatalogDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] CatalogRepositoryError),

    /// The category does not exist.
    #[error("category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// The city does not exist.
    #[error("city not found: {0}")]
    CityNotFound(CityId),
}

/// Result type for catalog service operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
