//! Article and blog category service tests.

use std::sync::Arc;

use crate::access::AdminActor;
use crate::account::domain::UserId;
use crate::content::{
    adapters::memory::InMemoryContentRepository,
    domain::{Article, ArticleCategory, ArticleCategoryId, ArticleDraft, ArticleStatus},
    ports::{ArticleFilter, ContentRepositoryError},
    services::{
        ArticleCategoryInput, ArticleCategoryService, ArticleService, ContentError,
    },
};
use crate::pagination::PageRequest;
use crate::test_support::FixedClock;
use chrono::Duration;
use rstest::{fixture, rstest};

struct Harness {
    admin: AdminActor,
    clock: Arc<FixedClock>,
    articles: ArticleService<InMemoryContentRepository, FixedClock>,
    categories: ArticleCategoryService<InMemoryContentRepository, FixedClock>,
}

#[fixture]
fn harness() -> Harness {
    let repository = Arc::new(InMemoryContentRepository::new());
    let clock = Arc::new(FixedClock::new());
    Harness {
        admin: AdminActor::for_tests(UserId::new()),
        articles: ArticleService::new(Arc::clone(&repository), Arc::clone(&clock)),
        categories: ArticleCategoryService::new(repository, Arc::clone(&clock)),
        clock,
    }
}

impl Harness {
    async fn category(&self, name: &str) -> ArticleCategory {
        self.categories
            .create(&self.admin, &ArticleCategoryInput::new(name))
            .await
            .expect("category created")
    }

    async fn published(&self, title: &str, category: ArticleCategoryId) -> Article {
        self.clock.advance(Duration::minutes(1));
        self.articles
            .create(
                &self.admin,
                &ArticleDraft::new(title, "<p>Текст</p>", category)
                    .with_status(ArticleStatus::Published),
            )
            .await
            .expect("article created")
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn colliding_titles_get_numbered_slugs(harness: Harness) {
    let tips = harness.category("Советы").await;
    let first = harness.published("Ремонт ванной", tips.id()).await;
    let second = harness.published("Ремонт ванной", tips.id()).await;
    let third = harness.published("Ремонт  ванной!", tips.id()).await;

    assert_eq!(first.slug().as_str(), "remont-vannoy");
    assert_eq!(second.slug().as_str(), "remont-vannoy-1");
    assert_eq!(third.slug().as_str(), "remont-vannoy-2");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_category_is_rejected(harness: Harness) {
    let missing = ArticleCategoryId::new();
    let result = harness
        .articles
        .create(&harness.admin, &ArticleDraft::new("Заголовок", "Текст", missing))
        .await;
    assert!(matches!(result, Err(ContentError::CategoryNotFound(id)) if id == missing));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retitling_regenerates_slug_but_other_edits_do_not(harness: Harness) {
    let tips = harness.category("Советы").await;
    let article = harness.published("Старый заголовок", tips.id()).await;

    let same_title = ArticleDraft::new("Старый заголовок", "<p>Новый текст</p>", tips.id())
        .with_status(ArticleStatus::Published);
    let edited = harness
        .articles
        .update(&harness.admin, article.id(), &same_title)
        .await
        .expect("article updated");
    assert_eq!(edited.slug(), article.slug());
    assert_eq!(edited.excerpt(), "Новый текст");

    let retitled = ArticleDraft::new("Новый заголовок", "<p>Текст</p>", tips.id());
    let renamed = harness
        .articles
        .update(&harness.admin, article.id(), &retitled)
        .await
        .expect("article retitled");
    assert_eq!(renamed.slug().as_str(), "novyy-zagolovok");
    assert_eq!(renamed.status(), ArticleStatus::Draft);
    assert_eq!(renamed.published_at(), article.published_at());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn public_listing_filters_by_known_category_only(harness: Harness) {
    let tips = harness.category("Советы").await;
    let news = harness.category("Новости").await;
    let older = harness.published("Первая", tips.id()).await;
    let newer = harness.published("Вторая", news.id()).await;
    harness
        .articles
        .create(&harness.admin, &ArticleDraft::new("Черновик", "Текст", tips.id()))
        .await
        .expect("draft created");

    let all = harness
        .articles
        .published(None, PageRequest::first(12))
        .await
        .expect("listing loads");
    assert!(all.category.is_none());
    assert_eq!(all.articles.into_items(), vec![newer, older.clone()]);

    let filtered = harness
        .articles
        .published(Some("sovety"), PageRequest::first(12))
        .await
        .expect("listing loads");
    assert_eq!(filtered.category.map(|c| c.id()), Some(tips.id()));
    assert_eq!(filtered.articles.into_items(), vec![older]);

    let unknown = harness
        .articles
        .published(Some("no-such-category"), PageRequest::first(12))
        .await
        .expect("listing loads");
    assert_eq!(unknown.articles.total_items(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reading_counts_views_and_lists_related(harness: Harness) {
    let tips = harness.category("Советы").await;
    let target = harness.published("Главная статья", tips.id()).await;
    for title in ["Раз", "Два", "Три", "Четыре"] {
        harness.published(title, tips.id()).await;
    }

    let view = harness
        .articles
        .read_published(target.slug().as_str())
        .await
        .expect("article readable");
    assert_eq!(view.article.views_count(), 1);
    assert_eq!(view.category.map(|c| c.id()), Some(tips.id()));
    let related: Vec<&str> = view.related.iter().map(|a| a.title()).collect();
    assert_eq!(related, ["Четыре", "Три", "Два"]);

    let again = harness
        .articles
        .read_published(target.slug().as_str())
        .await
        .expect("article readable");
    assert_eq!(again.article.views_count(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn drafts_are_not_readable(harness: Harness) {
    let tips = harness.category("Советы").await;
    let article = harness.published("Скоро", tips.id()).await;
    harness
        .articles
        .unpublish(&harness.admin, article.id())
        .await
        .expect("unpublished");
    let result = harness.articles.read_published(article.slug().as_str()).await;
    assert!(matches!(result, Err(ContentError::ArticleSlugNotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_list_filters_and_orders_by_update(harness: Harness) {
    let tips = harness.category("Советы").await;
    let first = harness.published("Первая", tips.id()).await;
    let second = harness.published("Вторая", tips.id()).await;
    harness.clock.advance(Duration::minutes(1));
    harness
        .articles
        .toggle_publication(&harness.admin, first.id())
        .await
        .expect("toggled");

    let everything = harness
        .articles
        .admin_list(&harness.admin, ArticleFilter::new(), PageRequest::first(10))
        .await
        .expect("list loads");
    let ids: Vec<_> = everything.items().iter().map(|a| a.id()).collect();
    assert_eq!(ids, vec![first.id(), second.id()]);

    let drafts = harness
        .articles
        .admin_list(
            &harness.admin,
            ArticleFilter::new().with_status(ArticleStatus::Draft),
            PageRequest::first(10),
        )
        .await
        .expect("list loads");
    assert_eq!(drafts.total_items(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_category_names_clash_on_slug(harness: Harness) {
    harness.category("Советы").await;
    let result = harness
        .categories
        .create(&harness.admin, &ArticleCategoryInput::new(" советы "))
        .await;
    assert!(matches!(
        result,
        Err(ContentError::Repository(ContentRepositoryError::DuplicateSlug(_)))
    ));
}
