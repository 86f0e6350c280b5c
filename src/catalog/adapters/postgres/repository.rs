//! `PostgreSQL` repository implementation for the catalog.

use super::schema::{categories, cities};
use crate::catalog::{
    domain::{
        Category, CategoryId, City, CityId, PersistedCategoryData, PersistedCityData, Region,
    },
    ports::{CatalogRepositoryError, CatalogRepositoryResult, CategoryRepository, CityRepository},
};
use crate::persistence::{PgPool, run_blocking, violates};
use crate::slug::Slug;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

const CITY_SLUG_CONSTRAINT: &str = "cities_slug_key";

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct CategoryRow {
    id: uuid::Uuid,
    name: String,
    icon: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = cities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct CityRow {
    id: uuid::Uuid,
    name: String,
    slug: String,
    region: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// `PostgreSQL`-backed repository implementing both catalog ports.
#[derive(Debug, Clone)]
pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCatalogRepository {
    async fn store_category(&self, category: &Category) -> CatalogRepositoryResult<()> {
        let row = to_category_row(category);
        let category_id = category.id();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(categories::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        CatalogRepositoryError::DuplicateCategory(category_id)
                    }
                    _ => CatalogRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_category(&self, category: &Category) -> CatalogRepositoryResult<()> {
        let row = to_category_row(category);
        let category_id = category.id();
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(categories::table.find(row.id))
                .set(&row)
                .execute(connection)
                .map_err(CatalogRepositoryError::persistence)?;
            if affected == 0 {
                return Err(CatalogRepositoryError::CategoryNotFound(category_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_category(&self, id: CategoryId) -> CatalogRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::delete(categories::table.find(id.into_inner()))
                .execute(connection)
                .map_err(CatalogRepositoryError::persistence)?;
            if affected == 0 {
                return Err(CatalogRepositoryError::CategoryNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_category(&self, id: CategoryId) -> CatalogRepositoryResult<Option<Category>> {
        run_blocking(&self.pool, move |connection| {
            Ok(categories::table
                .find(id.into_inner())
                .select(CategoryRow::as_select())
                .first::<CategoryRow>(connection)
                .optional()
                .map_err(CatalogRepositoryError::persistence)?
                .map(row_to_category))
        })
        .await
    }

    async fn list_categories(&self) -> CatalogRepositoryResult<Vec<Category>> {
        run_blocking(&self.pool, move |connection| {
            let rows = categories::table
                .order((categories::created_at.asc(), categories::id.asc()))
                .select(CategoryRow::as_select())
                .load::<CategoryRow>(connection)
                .map_err(CatalogRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_category).collect())
        })
        .await
    }
}

#[async_trait]
impl CityRepository for PostgresCatalogRepository {
    async fn store_city(&self, city: &City) -> CatalogRepositoryResult<()> {
        let row = to_city_row(city);
        let city_id = city.id();
        let slug = city.slug().clone();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(cities::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_city_write_error(err, city_id, slug))?;
            Ok(())
        })
        .await
    }

    async fn update_city(&self, city: &City) -> CatalogRepositoryResult<()> {
        let row = to_city_row(city);
        let city_id = city.id();
        let slug = city.slug().clone();
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(cities::table.find(row.id))
                .set(&row)
                .execute(connection)
                .map_err(|err| map_city_write_error(err, city_id, slug))?;
            if affected == 0 {
                return Err(CatalogRepositoryError::CityNotFound(city_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_city(&self, id: CityId) -> CatalogRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::delete(cities::table.find(id.into_inner()))
                .execute(connection)
                .map_err(CatalogRepositoryError::persistence)?;
            if affected == 0 {
                return Err(CatalogRepositoryError::CityNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_city(&self, id: CityId) -> CatalogRepositoryResult<Option<City>> {
        run_blocking(&self.pool, move |connection| {
            cities::table
                .find(id.into_inner())
                .select(CityRow::as_select())
                .first::<CityRow>(connection)
                .optional()
                .map_err(CatalogRepositoryError::persistence)?
                .map(row_to_city)
                .transpose()
        })
        .await
    }

    async fn find_city_by_slug(&self, slug: &Slug) -> CatalogRepositoryResult<Option<City>> {
        let slug_value = slug.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            cities::table
                .filter(cities::slug.eq(slug_value))
                .select(CityRow::as_select())
                .first::<CityRow>(connection)
                .optional()
                .map_err(CatalogRepositoryError::persistence)?
                .map(row_to_city)
                .transpose()
        })
        .await
    }

    async fn list_cities_in_region(&self, region: &str) -> CatalogRepositoryResult<Vec<City>> {
        let region_name = region.to_owned();
        run_blocking(&self.pool, move |connection| {
            let rows = cities::table
                .filter(cities::region.eq(region_name))
                .order((cities::name.asc(), cities::id.asc()))
                .select(CityRow::as_select())
                .load::<CityRow>(connection)
                .map_err(CatalogRepositoryError::persistence)?;
            rows.into_iter().map(row_to_city).collect()
        })
        .await
    }
}

fn map_city_write_error(err: DieselError, city_id: CityId, slug: Slug) -> CatalogRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if violates(info.as_ref(), CITY_SLUG_CONSTRAINT) =>
        {
            CatalogRepositoryError::DuplicateSlug(slug)
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            CatalogRepositoryError::DuplicateCity(city_id)
        }
        _ => CatalogRepositoryError::persistence(err),
    }
}

fn to_category_row(category: &Category) -> CategoryRow {
    CategoryRow {
        id: category.id().into_inner(),
        name: category.name().to_owned(),
        icon: category.icon().to_owned(),
        created_at: category.created_at(),
    }
}

fn row_to_category(row: CategoryRow) -> Category {
    Category::from_persisted(PersistedCategoryData {
        id: CategoryId::from_uuid(row.id),
        name: row.name,
        icon: row.icon,
        created_at: row.created_at,
    })
}

fn to_city_row(city: &City) -> CityRow {
    CityRow {
        id: city.id().into_inner(),
        name: city.name().to_owned(),
        slug: city.slug().as_str().to_owned(),
        region: city.region().as_str().to_owned(),
        created_at: city.created_at(),
        updated_at: city.updated_at(),
    }
}

fn row_to_city(row: CityRow) -> CatalogRepositoryResult<City> {
    Ok(City::from_persisted(PersistedCityData {
        id: CityId::from_uuid(row.id),
        name: row.name,
        slug: Slug::new(row.slug).map_err(CatalogRepositoryError::persistence)?,
        region: Region::from_persisted(row.region),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::{row_to_category, row_to_city, to_category_row, to_city_row};
    use crate::catalog::domain::{Category, City, RegionCatalog};
    use crate::slug::BasicSlugifier;
    use mockable::DefaultClock;
    use rstest::rstest;

    #[rstest]
    fn category_survives_row_conversion() {
        let category = Category::new("Ремонт", "fa-wrench", &DefaultClock).expect("valid category");
        assert_eq!(row_to_category(to_category_row(&category)), category);
    }

    #[rstest]
    fn city_survives_row_conversion() {
        let region = RegionCatalog::fallback()
            .resolve("Республика Крым")
            .expect("fallback region");
        let city =
            City::new("Симферополь", region, &BasicSlugifier, &DefaultClock).expect("valid city");
        let row = to_city_row(&city);
        assert_eq!(row.slug, "simferopol");
        assert_eq!(row_to_city(row).expect("row converts"), city);
    }

    #[rstest]
    fn corrupt_city_slug_is_rejected() {
        let region = RegionCatalog::fallback()
            .resolve("Республика Крым")
            .expect("fallback region");
        let city = City::new("Ялта", region, &BasicSlugifier, &DefaultClock).expect("valid city");
        let mut row = to_city_row(&city);
        row.slug = "Not A Slug".to_owned();
        assert!(row_to_city(row).is_err());
    }
}
