//! In-memory article, category and page store for tests and local tooling.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::content::{
    domain::{Article, ArticleCategory, ArticleCategoryId, ArticleId, PageId, StaticPage},
    ports::{
        ArticleCategoryRepository, ArticleFilter, ArticleRepository, ContentRepositoryError,
        ContentRepositoryResult, PageRepository,
    },
};
use crate::pagination::{Page, PageRequest};
use crate::slug::Slug;

/// Thread-safe in-memory repository implementing every content port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContentRepository {
    categories: Arc<RwLock<HashMap<ArticleCategoryId, ArticleCategory>>>,
    articles: Arc<RwLock<HashMap<ArticleId, Article>>>,
    pages: Arc<RwLock<HashMap<PageId, StaticPage>>>,
}

impl InMemoryContentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted_articles(
        &self,
        keep: impl Fn(&Article) -> bool,
        key: impl Fn(&Article) -> Option<DateTime<Utc>>,
    ) -> ContentRepositoryResult<Vec<Article>> {
        let articles = self.articles.read().map_err(lock_error)?;
        let mut matching: Vec<Article> = articles.values().filter(|a| keep(a)).cloned().collect();
        matching.sort_by(|a, b| newest_first(key(a), key(b)).then_with(|| a.id().cmp(&b.id())));
        Ok(matching)
    }
}

fn lock_error(err: impl std::fmt::Display) -> ContentRepositoryError {
    ContentRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Descending order with missing timestamps last.
fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    Reverse(a).cmp(&Reverse(b))
}

#[async_trait]
impl ArticleCategoryRepository for InMemoryContentRepository {
    async fn store_category(&self, category: &ArticleCategory) -> ContentRepositoryResult<()> {
        let mut categories = self.categories.write().map_err(lock_error)?;
        if categories.contains_key(&category.id()) {
            return Err(ContentRepositoryError::DuplicateCategory(category.id()));
        }
        if categories.values().any(|other| other.slug() == category.slug()) {
            return Err(ContentRepositoryError::DuplicateSlug(category.slug().clone()));
        }
        categories.insert(category.id(), category.clone());
        Ok(())
    }

    async fn update_category(&self, category: &ArticleCategory) -> ContentRepositoryResult<()> {
        let mut categories = self.categories.write().map_err(lock_error)?;
        if !categories.contains_key(&category.id()) {
            return Err(ContentRepositoryError::CategoryNotFound(category.id()));
        }
        if categories
            .values()
            .any(|other| other.id() != category.id() && other.slug() == category.slug())
        {
            return Err(ContentRepositoryError::DuplicateSlug(category.slug().clone()));
        }
        categories.insert(category.id(), category.clone());
        Ok(())
    }

    async fn delete_category(&self, id: ArticleCategoryId) -> ContentRepositoryResult<()> {
        let mut categories = self.categories.write().map_err(lock_error)?;
        categories
            .remove(&id)
            .map(drop)
            .ok_or(ContentRepositoryError::CategoryNotFound(id))
    }

    async fn find_category(
        &self,
        id: ArticleCategoryId,
    ) -> ContentRepositoryResult<Option<ArticleCategory>> {
        let categories = self.categories.read().map_err(lock_error)?;
        Ok(categories.get(&id).cloned())
    }

    async fn find_category_by_slug(
        &self,
        slug: &Slug,
    ) -> ContentRepositoryResult<Option<ArticleCategory>> {
        let categories = self.categories.read().map_err(lock_error)?;
        Ok(categories
            .values()
            .find(|category| category.slug() == slug)
            .cloned())
    }

    async fn list_categories(&self) -> ContentRepositoryResult<Vec<ArticleCategory>> {
        let categories = self.categories.read().map_err(lock_error)?;
        let mut all: Vec<ArticleCategory> = categories.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(&b.id())));
        Ok(all)
    }
}

#[async_trait]
impl ArticleRepository for InMemoryContentRepository {
    async fn store_article(&self, article: &Article) -> ContentRepositoryResult<()> {
        let mut articles = self.articles.write().map_err(lock_error)?;
        if articles.contains_key(&article.id()) {
            return Err(ContentRepositoryError::DuplicateArticle(article.id()));
        }
        if articles.values().any(|other| other.slug() == article.slug()) {
            return Err(ContentRepositoryError::DuplicateSlug(article.slug().clone()));
        }
        articles.insert(article.id(), article.clone());
        Ok(())
    }

    async fn update_article(&self, article: &Article) -> ContentRepositoryResult<()> {
        let mut articles = self.articles.write().map_err(lock_error)?;
        if !articles.contains_key(&article.id()) {
            return Err(ContentRepositoryError::ArticleNotFound(article.id()));
        }
        if articles
            .values()
            .any(|other| other.id() != article.id() && other.slug() == article.slug())
        {
            return Err(ContentRepositoryError::DuplicateSlug(article.slug().clone()));
        }
        articles.insert(article.id(), article.clone());
        Ok(())
    }

    async fn delete_article(&self, id: ArticleId) -> ContentRepositoryResult<()> {
        let mut articles = self.articles.write().map_err(lock_error)?;
        articles
            .remove(&id)
            .map(drop)
            .ok_or(ContentRepositoryError::ArticleNotFound(id))
    }

    async fn find_article(&self, id: ArticleId) -> ContentRepositoryResult<Option<Article>> {
        let articles = self.articles.read().map_err(lock_error)?;
        Ok(articles.get(&id).cloned())
    }

    async fn find_published_by_slug(
        &self,
        slug: &Slug,
    ) -> ContentRepositoryResult<Option<Article>> {
        let articles = self.articles.read().map_err(lock_error)?;
        Ok(articles
            .values()
            .find(|article| article.is_published() && article.slug() == slug)
            .cloned())
    }

    async fn article_slug_taken(
        &self,
        slug: &Slug,
        except: Option<ArticleId>,
    ) -> ContentRepositoryResult<bool> {
        let articles = self.articles.read().map_err(lock_error)?;
        Ok(articles
            .values()
            .any(|article| Some(article.id()) != except && article.slug() == slug))
    }

    async fn list_articles(
        &self,
        filter: ArticleFilter,
        page: PageRequest,
    ) -> ContentRepositoryResult<Page<Article>> {
        let matching = self.sorted_articles(
            |article| filter.matches(article),
            |article| Some(article.updated_at()),
        )?;
        Ok(page.slice(matching))
    }

    async fn list_published(
        &self,
        category: Option<ArticleCategoryId>,
        page: PageRequest,
    ) -> ContentRepositoryResult<Page<Article>> {
        let matching = self.sorted_articles(
            |article| {
                article.is_published()
                    && category.is_none_or(|wanted| article.category_id() == wanted)
            },
            Article::published_at,
        )?;
        Ok(page.slice(matching))
    }

    async fn related_articles(
        &self,
        article: &Article,
        limit: u32,
    ) -> ContentRepositoryResult<Vec<Article>> {
        let mut related = self.sorted_articles(
            |other| {
                other.is_published()
                    && other.id() != article.id()
                    && other.category_id() == article.category_id()
            },
            Article::published_at,
        )?;
        related.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(related)
    }

    async fn increment_views(&self, id: ArticleId) -> ContentRepositoryResult<u64> {
        let mut articles = self.articles.write().map_err(lock_error)?;
        let article = articles
            .get_mut(&id)
            .ok_or(ContentRepositoryError::ArticleNotFound(id))?;
        article.record_view();
        Ok(article.views_count())
    }
}

#[async_trait]
impl PageRepository for InMemoryContentRepository {
    async fn store_page(&self, page: &StaticPage) -> ContentRepositoryResult<()> {
        let mut pages = self.pages.write().map_err(lock_error)?;
        if pages.contains_key(&page.id()) {
            return Err(ContentRepositoryError::DuplicatePage(page.id()));
        }
        if pages.values().any(|other| other.slug() == page.slug()) {
            return Err(ContentRepositoryError::DuplicateSlug(page.slug().clone()));
        }
        pages.insert(page.id(), page.clone());
        Ok(())
    }

    async fn update_page(&self, page: &StaticPage) -> ContentRepositoryResult<()> {
        let mut pages = self.pages.write().map_err(lock_error)?;
        if !pages.contains_key(&page.id()) {
            return Err(ContentRepositoryError::PageNotFound(page.id()));
        }
        if pages
            .values()
            .any(|other| other.id() != page.id() && other.slug() == page.slug())
        {
            return Err(ContentRepositoryError::DuplicateSlug(page.slug().clone()));
        }
        pages.insert(page.id(), page.clone());
        Ok(())
    }

    async fn delete_page(&self, id: PageId) -> ContentRepositoryResult<()> {
        let mut pages = self.pages.write().map_err(lock_error)?;
        pages
            .remove(&id)
            .map(drop)
            .ok_or(ContentRepositoryError::PageNotFound(id))
    }

    async fn find_page(&self, id: PageId) -> ContentRepositoryResult<Option<StaticPage>> {
        let pages = self.pages.read().map_err(lock_error)?;
        Ok(pages.get(&id).cloned())
    }

    async fn find_page_by_slug(&self, slug: &Slug) -> ContentRepositoryResult<Option<StaticPage>> {
        let pages = self.pages.read().map_err(lock_error)?;
        Ok(pages.values().find(|page| page.slug() == slug).cloned())
    }

    async fn page_slug_taken(
        &self,
        slug: &Slug,
        except: Option<PageId>,
    ) -> ContentRepositoryResult<bool> {
        let pages = self.pages.read().map_err(lock_error)?;
        Ok(pages
            .values()
            .any(|page| Some(page.id()) != except && page.slug() == slug))
    }

    async fn list_pages(&self, page: PageRequest) -> ContentRepositoryResult<Page<StaticPage>> {
        let pages = self.pages.read().map_err(lock_error)?;
        let mut all: Vec<StaticPage> = pages.values().cloned().collect();
        all.sort_by(|a, b| {
            b.updated_at()
                .cmp(&a.updated_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(page.slice(all))
    }
}
