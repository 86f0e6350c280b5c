//! `PostgreSQL` repository implementation for editorial content.

use super::models::{
    ArticleCategoryRow, ArticleRow, PageRow, row_to_article, row_to_category, row_to_page,
    to_article_row, to_category_row, to_page_row,
};
use super::schema::{article_categories, articles, pages};
use crate::content::{
    domain::{Article, ArticleCategory, ArticleCategoryId, ArticleId, ArticleStatus, PageId, StaticPage},
    ports::{
        ArticleCategoryRepository, ArticleFilter, ArticleRepository, ContentRepositoryError,
        ContentRepositoryResult, PageRepository,
    },
};
use crate::pagination::{Page, PageRequest};
use crate::persistence::{PgPool, from_sql_count, run_blocking, to_sql_count, violates};
use crate::slug::Slug;
use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

const CATEGORY_SLUG_CONSTRAINT: &str = "article_categories_slug_key";
const ARTICLE_SLUG_CONSTRAINT: &str = "articles_slug_key";
const PAGE_SLUG_CONSTRAINT: &str = "pages_slug_key";

/// `PostgreSQL`-backed repository implementing every content port.
#[derive(Debug, Clone)]
pub struct PostgresContentRepository {
    pool: PgPool,
}

impl PostgresContentRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_article_page(
        &self,
        scope: ArticleScope,
        page: PageRequest,
    ) -> ContentRepositoryResult<Page<Article>> {
        run_blocking(&self.pool, move |connection| {
            let total = scoped(scope)
                .count()
                .get_result::<i64>(connection)
                .map_err(ContentRepositoryError::persistence)?;
            let ordered = match scope {
                ArticleScope::Admin(_) => scoped(scope).order((articles::updated_at.desc(), articles::id.asc())),
                ArticleScope::Published(_) => scoped(scope).order((
                    articles::published_at.desc().nulls_last(),
                    articles::id.asc(),
                )),
            };
            let rows = ordered
                .limit(i64::from(page.size()))
                .offset(to_sql_count(page.offset()))
                .select(ArticleRow::as_select())
                .load::<ArticleRow>(connection)
                .map_err(ContentRepositoryError::persistence)?;
            let items = rows
                .into_iter()
                .map(row_to_article)
                .collect::<ContentRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, page, from_sql_count(total)))
        })
        .await
    }
}

#[derive(Debug, Clone, Copy)]
enum ArticleScope {
    Admin(ArticleFilter),
    Published(Option<uuid::Uuid>),
}

fn scoped(scope: ArticleScope) -> articles::BoxedQuery<'static, Pg> {
    let mut query = articles::table.into_boxed::<Pg>();
    match scope {
        ArticleScope::Admin(filter) => {
            if let Some(status) = filter.status {
                query = query.filter(articles::status.eq(status.as_str()));
            }
            if let Some(category) = filter.category {
                query = query.filter(articles::category_id.eq(category.into_inner()));
            }
        }
        ArticleScope::Published(category) => {
            query = query.filter(articles::status.eq(ArticleStatus::Published.as_str()));
            if let Some(id) = category {
                query = query.filter(articles::category_id.eq(id));
            }
        }
    }
    query
}

/// Maps a write failure, naming `slug` when its unique constraint fired.
fn write_error(
    err: DieselError,
    slug_constraint: &str,
    slug: Slug,
    duplicate_id: ContentRepositoryError,
) -> ContentRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if violates(info.as_ref(), slug_constraint) =>
        {
            ContentRepositoryError::DuplicateSlug(slug)
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => duplicate_id,
        _ => ContentRepositoryError::persistence(err),
    }
}

#[async_trait]
impl ArticleCategoryRepository for PostgresContentRepository {
    async fn store_category(&self, category: &ArticleCategory) -> ContentRepositoryResult<()> {
        let row = to_category_row(category);
        let duplicate = ContentRepositoryError::DuplicateCategory(category.id());
        let slug = category.slug().clone();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(article_categories::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| write_error(err, CATEGORY_SLUG_CONSTRAINT, slug, duplicate))?;
            Ok(())
        })
        .await
    }

    async fn update_category(&self, category: &ArticleCategory) -> ContentRepositoryResult<()> {
        let row = to_category_row(category);
        let category_id = category.id();
        let slug = category.slug().clone();
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(article_categories::table.find(row.id))
                .set(&row)
                .execute(connection)
                .map_err(|err| {
                    write_error(
                        err,
                        CATEGORY_SLUG_CONSTRAINT,
                        slug,
                        ContentRepositoryError::DuplicateCategory(category_id),
                    )
                })?;
            if affected == 0 {
                return Err(ContentRepositoryError::CategoryNotFound(category_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_category(&self, id: ArticleCategoryId) -> ContentRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::delete(article_categories::table.find(id.into_inner()))
                .execute(connection)
                .map_err(ContentRepositoryError::persistence)?;
            if affected == 0 {
                return Err(ContentRepositoryError::CategoryNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_category(
        &self,
        id: ArticleCategoryId,
    ) -> ContentRepositoryResult<Option<ArticleCategory>> {
        run_blocking(&self.pool, move |connection| {
            article_categories::table
                .find(id.into_inner())
                .select(ArticleCategoryRow::as_select())
                .first::<ArticleCategoryRow>(connection)
                .optional()
                .map_err(ContentRepositoryError::persistence)?
                .map(row_to_category)
                .transpose()
        })
        .await
    }

    async fn find_category_by_slug(
        &self,
        slug: &Slug,
    ) -> ContentRepositoryResult<Option<ArticleCategory>> {
        let slug_value = slug.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            article_categories::table
                .filter(article_categories::slug.eq(slug_value))
                .select(ArticleCategoryRow::as_select())
                .first::<ArticleCategoryRow>(connection)
                .optional()
                .map_err(ContentRepositoryError::persistence)?
                .map(row_to_category)
                .transpose()
        })
        .await
    }

    async fn list_categories(&self) -> ContentRepositoryResult<Vec<ArticleCategory>> {
        run_blocking(&self.pool, move |connection| {
            let rows = article_categories::table
                .order((article_categories::name.asc(), article_categories::id.asc()))
                .select(ArticleCategoryRow::as_select())
                .load::<ArticleCategoryRow>(connection)
                .map_err(ContentRepositoryError::persistence)?;
            rows.into_iter().map(row_to_category).collect()
        })
        .await
    }
}

#[async_trait]
impl ArticleRepository for PostgresContentRepository {
    async fn store_article(&self, article: &Article) -> ContentRepositoryResult<()> {
        let row = to_article_row(article);
        let duplicate = ContentRepositoryError::DuplicateArticle(article.id());
        let slug = article.slug().clone();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(articles::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| write_error(err, ARTICLE_SLUG_CONSTRAINT, slug, duplicate))?;
            Ok(())
        })
        .await
    }

    async fn update_article(&self, article: &Article) -> ContentRepositoryResult<()> {
        let row = to_article_row(article);
        let article_id = article.id();
        let slug = article.slug().clone();
        run_blocking(&self.pool, move |connection| {
            // The counter is owned by `increment_views`; never overwrite it.
            let affected = diesel::update(articles::table.find(row.id))
                .set((
                    articles::title.eq(&row.title),
                    articles::slug.eq(&row.slug),
                    articles::content.eq(&row.content),
                    articles::excerpt.eq(&row.excerpt),
                    articles::image.eq(&row.image),
                    articles::category_id.eq(row.category_id),
                    articles::status.eq(&row.status),
                    articles::meta_title.eq(&row.meta_title),
                    articles::meta_description.eq(&row.meta_description),
                    articles::meta_keywords.eq(&row.meta_keywords),
                    articles::updated_at.eq(row.updated_at),
                    articles::published_at.eq(row.published_at),
                ))
                .execute(connection)
                .map_err(|err| {
                    write_error(
                        err,
                        ARTICLE_SLUG_CONSTRAINT,
                        slug,
                        ContentRepositoryError::DuplicateArticle(article_id),
                    )
                })?;
            if affected == 0 {
                return Err(ContentRepositoryError::ArticleNotFound(article_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_article(&self, id: ArticleId) -> ContentRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::delete(articles::table.find(id.into_inner()))
                .execute(connection)
                .map_err(ContentRepositoryError::persistence)?;
            if affected == 0 {
                return Err(ContentRepositoryError::ArticleNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_article(&self, id: ArticleId) -> ContentRepositoryResult<Option<Article>> {
        run_blocking(&self.pool, move |connection| {
            articles::table
                .find(id.into_inner())
                .select(ArticleRow::as_select())
                .first::<ArticleRow>(connection)
                .optional()
                .map_err(ContentRepositoryError::persistence)?
                .map(row_to_article)
                .transpose()
        })
        .await
    }

    async fn find_published_by_slug(
        &self,
        slug: &Slug,
    ) -> ContentRepositoryResult<Option<Article>> {
        let slug_value = slug.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            articles::table
                .filter(articles::slug.eq(slug_value))
                .filter(articles::status.eq(ArticleStatus::Published.as_str()))
                .select(ArticleRow::as_select())
                .first::<ArticleRow>(connection)
                .optional()
                .map_err(ContentRepositoryError::persistence)?
                .map(row_to_article)
                .transpose()
        })
        .await
    }

    async fn article_slug_taken(
        &self,
        slug: &Slug,
        except: Option<ArticleId>,
    ) -> ContentRepositoryResult<bool> {
        let slug_value = slug.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let mut query = articles::table
                .filter(articles::slug.eq(slug_value))
                .into_boxed::<Pg>();
            if let Some(id) = except {
                query = query.filter(articles::id.ne(id.into_inner()));
            }
            let count = query
                .count()
                .get_result::<i64>(connection)
                .map_err(ContentRepositoryError::persistence)?;
            Ok(count > 0)
        })
        .await
    }

    async fn list_articles(
        &self,
        filter: ArticleFilter,
        page: PageRequest,
    ) -> ContentRepositoryResult<Page<Article>> {
        self.load_article_page(ArticleScope::Admin(filter), page).await
    }

    async fn list_published(
        &self,
        category: Option<ArticleCategoryId>,
        page: PageRequest,
    ) -> ContentRepositoryResult<Page<Article>> {
        self.load_article_page(
            ArticleScope::Published(category.map(ArticleCategoryId::into_inner)),
            page,
        )
        .await
    }

    async fn related_articles(
        &self,
        article: &Article,
        limit: u32,
    ) -> ContentRepositoryResult<Vec<Article>> {
        let article_id = article.id().into_inner();
        let category_id = article.category_id().into_inner();
        run_blocking(&self.pool, move |connection| {
            let rows = scoped(ArticleScope::Published(Some(category_id)))
                .filter(articles::id.ne(article_id))
                .order((articles::published_at.desc().nulls_last(), articles::id.asc()))
                .limit(i64::from(limit))
                .select(ArticleRow::as_select())
                .load::<ArticleRow>(connection)
                .map_err(ContentRepositoryError::persistence)?;
            rows.into_iter().map(row_to_article).collect()
        })
        .await
    }

    async fn increment_views(&self, id: ArticleId) -> ContentRepositoryResult<u64> {
        run_blocking(&self.pool, move |connection| {
            diesel::update(articles::table.find(id.into_inner()))
                .set(articles::views_count.eq(articles::views_count + 1))
                .returning(articles::views_count)
                .get_result::<i64>(connection)
                .optional()
                .map_err(ContentRepositoryError::persistence)?
                .map(from_sql_count)
                .ok_or(ContentRepositoryError::ArticleNotFound(id))
        })
        .await
    }
}

#[async_trait]
impl PageRepository for PostgresContentRepository {
    async fn store_page(&self, page: &StaticPage) -> ContentRepositoryResult<()> {
        let row = to_page_row(page);
        let duplicate = ContentRepositoryError::DuplicatePage(page.id());
        let slug = page.slug().clone();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(pages::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| write_error(err, PAGE_SLUG_CONSTRAINT, slug, duplicate))?;
            Ok(())
        })
        .await
    }

    async fn update_page(&self, page: &StaticPage) -> ContentRepositoryResult<()> {
        let row = to_page_row(page);
        let page_id = page.id();
        let slug = page.slug().clone();
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(pages::table.find(row.id))
                .set(&row)
                .execute(connection)
                .map_err(|err| {
                    write_error(
                        err,
                        PAGE_SLUG_CONSTRAINT,
                        slug,
                        ContentRepositoryError::DuplicatePage(page_id),
                    )
                })?;
            if affected == 0 {
                return Err(ContentRepositoryError::PageNotFound(page_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_page(&self, id: PageId) -> ContentRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::delete(pages::table.find(id.into_inner()))
                .execute(connection)
                .map_err(ContentRepositoryError::persistence)?;
            if affected == 0 {
                return Err(ContentRepositoryError::PageNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_page(&self, id: PageId) -> ContentRepositoryResult<Option<StaticPage>> {
        run_blocking(&self.pool, move |connection| {
            pages::table
                .find(id.into_inner())
                .select(PageRow::as_select())
                .first::<PageRow>(connection)
                .optional()
                .map_err(ContentRepositoryError::persistence)?
                .map(row_to_page)
                .transpose()
        })
        .await
    }

    async fn find_page_by_slug(&self, slug: &Slug) -> ContentRepositoryResult<Option<StaticPage>> {
        let slug_value = slug.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            pages::table
                .filter(pages::slug.eq(slug_value))
                .select(PageRow::as_select())
                .first::<PageRow>(connection)
                .optional()
                .map_err(ContentRepositoryError::persistence)?
                .map(row_to_page)
                .transpose()
        })
        .await
    }

    async fn page_slug_taken(
        &self,
        slug: &Slug,
        except: Option<PageId>,
    ) -> ContentRepositoryResult<bool> {
        let slug_value = slug.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let mut query = pages::table.filter(pages::slug.eq(slug_value)).into_boxed::<Pg>();
            if let Some(id) = except {
                query = query.filter(pages::id.ne(id.into_inner()));
            }
            let count = query
                .count()
                .get_result::<i64>(connection)
                .map_err(ContentRepositoryError::persistence)?;
            Ok(count > 0)
        })
        .await
    }

    async fn list_pages(&self, page: PageRequest) -> ContentRepositoryResult<Page<StaticPage>> {
        run_blocking(&self.pool, move |connection| {
            let total = pages::table
                .count()
                .get_result::<i64>(connection)
                .map_err(ContentRepositoryError::persistence)?;
            let rows = pages::table
                .order((pages::updated_at.desc(), pages::id.asc()))
                .limit(i64::from(page.size()))
                .offset(to_sql_count(page.offset()))
                .select(PageRow::as_select())
                .load::<PageRow>(connection)
                .map_err(ContentRepositoryError::persistence)?;
            let items = rows
                .into_iter()
                .map(row_to_page)
                .collect::<ContentRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, page, from_sql_count(total)))
        })
        .await
    }
}
