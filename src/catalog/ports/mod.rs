//! Port contracts for catalog persistence.

mod repository;

pub use repository::{
    CatalogRepositoryError, CatalogRepositoryResult, CategoryRepository, CityRepository,
};
