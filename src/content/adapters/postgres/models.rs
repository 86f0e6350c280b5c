//! Diesel row models and domain conversions for content tables.

use super::schema::{article_categories, articles, pages};
use crate::content::{
    domain::{
        Article, ArticleCategory, ArticleCategoryId, ArticleId, ArticleStatus, PageId,
        PersistedArticleCategoryData, PersistedArticleData, PersistedPageData, SeoMeta,
        StaticPage,
    },
    ports::{ContentRepositoryError, ContentRepositoryResult},
};
use crate::persistence::{from_sql_count, to_sql_count};
use crate::slug::Slug;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query, insert and update row for blog categories.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = article_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(super) struct ArticleCategoryRow {
    pub id: uuid::Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query, insert and update row for articles.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(super) struct ArticleRow {
    pub id: uuid::Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub image: Option<String>,
    pub category_id: uuid::Uuid,
    pub status: String,
    pub meta_title: String,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub views_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Query, insert and update row for static pages.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = pages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(super) struct PageRow {
    pub id: uuid::Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub meta_title: String,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn stored_slug(value: String) -> ContentRepositoryResult<Slug> {
    Slug::new(value).map_err(ContentRepositoryError::persistence)
}

pub(super) fn to_category_row(category: &ArticleCategory) -> ArticleCategoryRow {
    ArticleCategoryRow {
        id: category.id().into_inner(),
        name: category.name().to_owned(),
        slug: category.slug().as_str().to_owned(),
        description: category.description().map(str::to_owned),
        created_at: category.created_at(),
        updated_at: category.updated_at(),
    }
}

pub(super) fn row_to_category(row: ArticleCategoryRow) -> ContentRepositoryResult<ArticleCategory> {
    Ok(ArticleCategory::from_persisted(PersistedArticleCategoryData {
        id: ArticleCategoryId::from_uuid(row.id),
        name: row.name,
        slug: stored_slug(row.slug)?,
        description: row.description,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

pub(super) fn to_article_row(article: &Article) -> ArticleRow {
    ArticleRow {
        id: article.id().into_inner(),
        title: article.title().to_owned(),
        slug: article.slug().as_str().to_owned(),
        content: article.content().to_owned(),
        excerpt: article.excerpt().to_owned(),
        image: article.image().map(str::to_owned),
        category_id: article.category_id().into_inner(),
        status: article.status().as_str().to_owned(),
        meta_title: article.seo().title().to_owned(),
        meta_description: article.seo().description().map(str::to_owned),
        meta_keywords: article.seo().keywords().map(str::to_owned),
        views_count: to_sql_count(article.views_count()),
        created_at: article.created_at(),
        updated_at: article.updated_at(),
        published_at: article.published_at(),
    }
}

pub(super) fn row_to_article(row: ArticleRow) -> ContentRepositoryResult<Article> {
    let status = ArticleStatus::try_from(row.status.as_str())
        .map_err(ContentRepositoryError::persistence)?;
    Ok(Article::from_persisted(PersistedArticleData {
        id: ArticleId::from_uuid(row.id),
        title: row.title,
        slug: stored_slug(row.slug)?,
        content: row.content,
        excerpt: row.excerpt,
        image: row.image,
        category_id: ArticleCategoryId::from_uuid(row.category_id),
        status,
        seo: SeoMeta::from_persisted(row.meta_title, row.meta_description, row.meta_keywords),
        views_count: from_sql_count(row.views_count),
        created_at: row.created_at,
        updated_at: row.updated_at,
        published_at: row.published_at,
    }))
}

pub(super) fn to_page_row(page: &StaticPage) -> PageRow {
    PageRow {
        id: page.id().into_inner(),
        title: page.title().to_owned(),
        slug: page.slug().as_str().to_owned(),
        content: page.content().to_owned(),
        meta_title: page.seo().title().to_owned(),
        meta_description: page.seo().description().map(str::to_owned),
        meta_keywords: page.seo().keywords().map(str::to_owned),
        created_at: page.created_at(),
        updated_at: page.updated_at(),
    }
}

pub(super) fn row_to_page(row: PageRow) -> ContentRepositoryResult<StaticPage> {
    Ok(StaticPage::from_persisted(PersistedPageData {
        id: PageId::from_uuid(row.id),
        title: row.title,
        slug: stored_slug(row.slug)?,
        content: row.content,
        seo: SeoMeta::from_persisted(row.meta_title, row.meta_description, row.meta_keywords),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::{row_to_article, row_to_page, to_article_row, to_page_row};
    use crate::content::domain::{
        Article, ArticleCategoryId, ArticleDraft, ArticleStatus, PageDraft, SeoInput, StaticPage,
    };
    use crate::slug::Slug;
    use mockable::DefaultClock;
    use rstest::rstest;

    fn published_article() -> Article {
        let draft = ArticleDraft::new("Как выбрать мастера", "<p>Советы</p>", ArticleCategoryId::new())
            .with_status(ArticleStatus::Published)
            .with_image("/img/articles/cover.png");
        Article::new(&draft, Slug::new("kak-vybrat-mastera").expect("valid slug"), &DefaultClock)
            .expect("valid article")
    }

    #[rstest]
    fn article_survives_row_conversion() {
        let article = published_article();
        let row = to_article_row(&article);
        assert_eq!(row.status, "published");
        assert!(row.published_at.is_some());
        assert_eq!(row_to_article(row).expect("row converts"), article);
    }

    #[rstest]
    fn unknown_article_status_is_rejected() {
        let mut row = to_article_row(&published_article());
        row.status = "archived".to_owned();
        assert!(row_to_article(row).is_err());
    }

    #[rstest]
    fn page_survives_row_conversion() {
        let draft = PageDraft::new("Правила", "<p>Текст</p>").with_seo(SeoInput {
            description: Some("Правила сервиса".to_owned()),
            ..SeoInput::default()
        });
        let page = StaticPage::new(&draft, Slug::new("rules").expect("valid slug"), &DefaultClock)
            .expect("valid page");
        let row = to_page_row(&page);
        assert_eq!(row.meta_title, "Правила");
        assert_eq!(row_to_page(row).expect("row converts"), page);
    }
}
