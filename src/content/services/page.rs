//! Static page administration and lookup.

use super::{ContentError, ContentResult};
use crate::access::AdminActor;
use crate::content::{
    domain::{PageDraft, PageId, StaticPage},
    ports::{ContentRepositoryError, PageRepository},
};
use crate::pagination::{Page, PageRequest};
use crate::slug::{BasicSlugifier, Slug, SlugCandidates, Slugifier};
use mockable::Clock;
use std::sync::Arc;

/// CRUD over static pages plus public lookup by slug.
#[derive(Clone)]
pub struct PageService<R, C>
where
    R: PageRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    slugifier: Arc<dyn Slugifier>,
    clock: Arc<C>,
}

impl<R, C> PageService<R, C>
where
    R: PageRepository,
    C: Clock + Send + Sync,
{
    /// Creates a page service using [`BasicSlugifier`].
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
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

    /// Pages through every page, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Repository`] when the lookup fails.
    pub async fn admin_list(
        &self,
        _admin: &AdminActor,
        page: PageRequest,
    ) -> ContentResult<Page<StaticPage>> {
        Ok(self.repository.list_pages(page).await?)
    }

    /// Loads a page for editing.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::PageNotFound`] for unknown ids.
    pub async fn get(&self, _admin: &AdminActor, id: PageId) -> ContentResult<StaticPage> {
        self.load(id).await
    }

    /// Creates a page under the explicit or generated slug, made unique.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Domain`] for invalid fields.
    pub async fn create(&self, admin: &AdminActor, draft: &PageDraft) -> ContentResult<StaticPage> {
        let base = draft.base_slug(&*self.slugifier)?;
        let slug = self.reserve_slug(base, None).await?;
        let page = StaticPage::new(draft, slug, &*self.clock)?;
        self.repository.store_page(&page).await?;
        tracing::info!(page_id = %page.id(), admin_id = %admin.user_id(), "page created");
        Ok(page)
    }

    /// Replaces a page's fields and re-resolves its slug.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::PageNotFound`] or [`ContentError::Domain`].
    pub async fn update(
        &self,
        admin: &AdminActor,
        id: PageId,
        draft: &PageDraft,
    ) -> ContentResult<StaticPage> {
        let mut page = self.load(id).await?;
        let base = draft.base_slug(&*self.slugifier)?;
        let slug = self.reserve_slug(base, Some(id)).await?;
        page.revise(draft, slug, &*self.clock)?;
        self.repository.update_page(&page).await?;
        tracing::info!(page_id = %id, admin_id = %admin.user_id(), "page updated");
        Ok(page)
    }

    /// Deletes a page.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Repository`] for unknown ids.
    pub async fn delete(&self, admin: &AdminActor, id: PageId) -> ContentResult<()> {
        self.repository.delete_page(id).await?;
        tracing::info!(page_id = %id, admin_id = %admin.user_id(), "page deleted");
        Ok(())
    }

    /// Looks a page up by its public slug.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::PageSlugNotFound`] when no page matches.
    pub async fn find_by_slug(&self, slug: &str) -> ContentResult<StaticPage> {
        let not_found = || ContentError::PageSlugNotFound(slug.to_owned());
        let parsed = Slug::new(slug).map_err(|_| not_found())?;
        tracing::debug!(slug = %parsed, "loading page");
        self.repository
            .find_page_by_slug(&parsed)
            .await?
            .ok_or_else(not_found)
    }

    async fn load(&self, id: PageId) -> ContentResult<StaticPage> {
        self.repository
            .find_page(id)
            .await?
            .ok_or(ContentError::PageNotFound(id))
    }

    async fn reserve_slug(&self, base: Slug, except: Option<PageId>) -> ContentResult<Slug> {
        for candidate in SlugCandidates::new(base.clone()) {
            if !self.repository.page_slug_taken(&candidate, except).await? {
                return Ok(candidate);
            }
        }
        Err(ContentRepositoryError::DuplicateSlug(base).into())
    }
}
