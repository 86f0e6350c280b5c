//! Blog authoring and the public article listing.

use super::{ContentError, ContentResult};
use crate::access::AdminActor;
use crate::config::ListingConfig;
use crate::content::{
    domain::{Article, ArticleCategory, ArticleCategoryId, ArticleDraft, ArticleId},
    ports::{ArticleCategoryRepository, ArticleFilter, ArticleRepository, ContentRepositoryError},
};
use crate::pagination::{Page, PageRequest};
use crate::slug::{BasicSlugifier, Slug, SlugCandidates, Slugifier};
use mockable::Clock;
use std::sync::Arc;

/// One page of the public blog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedArticles {
    /// Category the listing is filtered by, if the slug matched one.
    pub category: Option<ArticleCategory>,
    /// Published articles, newest publication first.
    pub articles: Page<Article>,
}

/// A published article as a reader sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleView {
    /// The article, view already counted.
    pub article: Article,
    /// Its category, unless it was deleted.
    pub category: Option<ArticleCategory>,
    /// Other published articles from the same category.
    pub related: Vec<Article>,
}

/// Authoring, publication and reading of blog articles.
#[derive(Clone)]
pub struct ArticleService<R, C>
where
    R: ArticleRepository + ArticleCategoryRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    slugifier: Arc<dyn Slugifier>,
    clock: Arc<C>,
    related_limit: u32,
}

impl<R, C> ArticleService<R, C>
where
    R: ArticleRepository + ArticleCategoryRepository,
    C: Clock + Send + Sync,
{
    /// Creates an article service using [`BasicSlugifier`].
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            slugifier: Arc::new(BasicSlugifier),
            clock,
            related_limit: ListingConfig::DEFAULT.related_articles_limit,
        }
    }

    /// Replaces the slugifier.
    #[must_use]
    pub fn with_slugifier(mut self, slugifier: Arc<dyn Slugifier>) -> Self {
        self.slugifier = slugifier;
        self
    }

    /// Applies the configured related-article limit.
    #[must_use]
    pub const fn with_listing(mut self, listing: &ListingConfig) -> Self {
        self.related_limit = listing.related_articles_limit;
        self
    }

    /// Pages through every article matching `filter`, most recently
    /// updated first.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Repository`] when the lookup fails.
    pub async fn admin_list(
        &self,
        _admin: &AdminActor,
        filter: ArticleFilter,
        page: PageRequest,
    ) -> ContentResult<Page<Article>> {
        Ok(self.repository.list_articles(filter, page).await?)
    }

    /// Loads an article in any status.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::ArticleNotFound`] for unknown ids.
    pub async fn get(&self, _admin: &AdminActor, id: ArticleId) -> ContentResult<Article> {
        self.load(id).await
    }

    /// Creates an article under a unique slug derived from its title.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Domain`] for invalid fields or
    /// [`ContentError::CategoryNotFound`] for an unknown category.
    pub async fn create(&self, admin: &AdminActor, draft: &ArticleDraft) -> ContentResult<Article> {
        let base = draft.base_slug(&*self.slugifier)?;
        self.ensure_category(draft.category_id).await?;
        let slug = self.reserve_slug(base, None).await?;
        let article = Article::new(draft, slug, &*self.clock)?;
        self.repository.store_article(&article).await?;
        tracing::info!(
            article_id = %article.id(),
            admin_id = %admin.user_id(),
            status = %article.status(),
            "article created"
        );
        Ok(article)
    }

    /// Replaces an article's fields. A changed title regenerates the slug.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::ArticleNotFound`], or the errors of
    /// [`create`](Self::create).
    pub async fn update(
        &self,
        admin: &AdminActor,
        id: ArticleId,
        draft: &ArticleDraft,
    ) -> ContentResult<Article> {
        let mut article = self.load(id).await?;
        self.ensure_category(draft.category_id).await?;
        let slug = if article.title_changes(&draft.title) {
            let base = draft.base_slug(&*self.slugifier)?;
            Some(self.reserve_slug(base, Some(id)).await?)
        } else {
            None
        };
        article.revise(draft, slug, &*self.clock)?;
        self.repository.update_article(&article).await?;
        tracing::info!(article_id = %id, admin_id = %admin.user_id(), "article updated");
        Ok(article)
    }

    /// Deletes an article.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Repository`] for unknown ids.
    pub async fn delete(&self, admin: &AdminActor, id: ArticleId) -> ContentResult<()> {
        self.repository.delete_article(id).await?;
        tracing::info!(article_id = %id, admin_id = %admin.user_id(), "article deleted");
        Ok(())
    }

    /// Publishes a draft or withdraws a published article.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::ArticleNotFound`] for unknown ids.
    pub async fn toggle_publication(
        &self,
        admin: &AdminActor,
        id: ArticleId,
    ) -> ContentResult<Article> {
        let mut article = self.load(id).await?;
        article.toggle_publication(&*self.clock);
        self.save_status(admin, &article).await?;
        Ok(article)
    }

    /// Publishes an article. Publishing twice keeps the first date.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::ArticleNotFound`] for unknown ids.
    pub async fn publish(&self, admin: &AdminActor, id: ArticleId) -> ContentResult<Article> {
        let mut article = self.load(id).await?;
        article.publish(&*self.clock);
        self.save_status(admin, &article).await?;
        Ok(article)
    }

    /// Returns an article to draft.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::ArticleNotFound`] for unknown ids.
    pub async fn unpublish(&self, admin: &AdminActor, id: ArticleId) -> ContentResult<Article> {
        let mut article = self.load(id).await?;
        article.unpublish(&*self.clock);
        self.save_status(admin, &article).await?;
        Ok(article)
    }

    /// Pages through the public blog, optionally narrowed to the category
    /// with `category_slug`. An unknown slug lists every category.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Repository`] when the lookup fails.
    pub async fn published(
        &self,
        category_slug: Option<&str>,
        page: PageRequest,
    ) -> ContentResult<PublishedArticles> {
        let category = match category_slug.and_then(|raw| Slug::new(raw).ok()) {
            Some(slug) => self.repository.find_category_by_slug(&slug).await?,
            None => None,
        };
        let articles = self
            .repository
            .list_published(category.as_ref().map(ArticleCategory::id), page)
            .await?;
        Ok(PublishedArticles { category, articles })
    }

    /// Opens a published article, counting the view.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::ArticleSlugNotFound`] for drafts and unknown
    /// slugs.
    pub async fn read_published(&self, slug: &str) -> ContentResult<ArticleView> {
        let not_found = || ContentError::ArticleSlugNotFound(slug.to_owned());
        let parsed = Slug::new(slug).map_err(|_| not_found())?;
        let mut article = self
            .repository
            .find_published_by_slug(&parsed)
            .await?
            .ok_or_else(not_found)?;

        self.repository.increment_views(article.id()).await?;
        article.record_view();
        tracing::debug!(article_id = %article.id(), views = article.views_count(), "article read");

        let category = self.repository.find_category(article.category_id()).await?;
        let related = self
            .repository
            .related_articles(&article, self.related_limit)
            .await?;
        Ok(ArticleView {
            article,
            category,
            related,
        })
    }

    async fn load(&self, id: ArticleId) -> ContentResult<Article> {
        self.repository
            .find_article(id)
            .await?
            .ok_or(ContentError::ArticleNotFound(id))
    }

    async fn ensure_category(&self, id: ArticleCategoryId) -> ContentResult<()> {
        match self.repository.find_category(id).await? {
            Some(_) => Ok(()),
            None => Err(ContentError::CategoryNotFound(id)),
        }
    }

    async fn reserve_slug(&self, base: Slug, except: Option<ArticleId>) -> ContentResult<Slug> {
        for candidate in SlugCandidates::new(base.clone()) {
            if !self
                .repository
                .article_slug_taken(&candidate, except)
                .await?
            {
                return Ok(candidate);
            }
        }
        Err(ContentRepositoryError::DuplicateSlug(base).into())
    }

    async fn save_status(&self, admin: &AdminActor, article: &Article) -> ContentResult<()> {
        self.repository.update_article(article).await?;
        tracing::info!(
            article_id = %article.id(),
            admin_id = %admin.user_id(),
            status = %article.status(),
            "article publication changed"
        );
        Ok(())
    }
}
