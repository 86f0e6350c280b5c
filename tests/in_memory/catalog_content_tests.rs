//! In-memory integration tests for the catalog and editorial content.

use std::sync::Arc;

use crate::test_helpers::Marketplace;
use camino::Utf8PathBuf;
use eyre::ensure;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use taskboard::catalog::{
    adapters::memory::InMemoryCatalogRepository,
    domain::{FALLBACK_REGION, RegionCatalog},
    services::{CatalogError, CityInput, CityService},
};
use taskboard::content::{
    adapters::memory::InMemoryContentRepository,
    domain::{ArticleDraft, ArticleStatus, PageDraft},
    services::{ArticleCategoryInput, ArticleCategoryService, ArticleService, PageService},
};
use taskboard::config::{Listing, ListingConfig};

fn shipped_regions() -> eyre::Result<RegionCatalog> {
    let path = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/regions.json");
    Ok(RegionCatalog::load(&path)?)
}

struct Editorial {
    categories: ArticleCategoryService<InMemoryContentRepository, DefaultClock>,
    articles: ArticleService<InMemoryContentRepository, DefaultClock>,
    pages: PageService<InMemoryContentRepository, DefaultClock>,
}

fn editorial_with(listing: &ListingConfig) -> Editorial {
    let repository = Arc::new(InMemoryContentRepository::new());
    let clock = Arc::new(DefaultClock);
    Editorial {
        categories: ArticleCategoryService::new(Arc::clone(&repository), Arc::clone(&clock)),
        articles: ArticleService::new(Arc::clone(&repository), Arc::clone(&clock))
            .with_listing(listing),
        pages: PageService::new(repository, clock),
    }
}

#[fixture]
fn editorial() -> Editorial {
    editorial_with(&ListingConfig::DEFAULT)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cities_are_created_in_shipped_regions_only() -> eyre::Result<()> {
    let marketplace = Marketplace::new();
    let admin = marketplace.admin("moderator").await?;
    let regions = shipped_regions()?;
    ensure!(regions.contains(FALLBACK_REGION));
    let cities = CityService::new(
        Arc::new(InMemoryCatalogRepository::new()),
        Arc::new(regions),
        Arc::new(DefaultClock),
    );

    let yalta = cities
        .create(&admin, &CityInput::new("Ялта", FALLBACK_REGION))
        .await?;
    ensure!(yalta.slug().as_str() == "yalta");
    let unknown = cities
        .create(&admin, &CityInput::new("Атлантида", "Океания"))
        .await;
    ensure!(
        matches!(unknown, Err(CatalogError::Domain(_))),
        "expected an unknown region error, got {unknown:?}"
    );

    let listed = cities.cities_in_region(FALLBACK_REGION).await?;
    ensure!(listed.len() == 1);
    ensure!(cities.cities_in_region("Океания").await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn readers_see_published_articles_with_related_reading(
    editorial: Editorial,
) -> eyre::Result<()> {
    let marketplace = Marketplace::new();
    let admin = marketplace.admin("editor").await?;
    let tips = editorial
        .categories
        .create(&admin, &ArticleCategoryInput::new("Советы"))
        .await?;

    let first = editorial
        .articles
        .create(
            &admin,
            &ArticleDraft::new("Как выбрать мастера", "<p>Смотрите отзывы</p>", tips.id())
                .with_status(ArticleStatus::Published),
        )
        .await?;
    let second = editorial
        .articles
        .create(
            &admin,
            &ArticleDraft::new("Как составить задание", "<p>Пишите подробно</p>", tips.id())
                .with_status(ArticleStatus::Published),
        )
        .await?;
    let draft = editorial
        .articles
        .create(
            &admin,
            &ArticleDraft::new("Черновик", "<p>Позже</p>", tips.id()),
        )
        .await?;

    let listing = editorial
        .articles
        .published(
            Some(tips.slug().as_str()),
            ListingConfig::DEFAULT.page_request(Listing::Articles, None),
        )
        .await?;
    ensure!(listing.category.is_some());
    ensure!(listing.articles.total_items() == 2);
    ensure!(
        !listing
            .articles
            .items()
            .iter()
            .any(|article| article.id() == draft.id())
    );

    let view = editorial
        .articles
        .read_published(first.slug().as_str())
        .await?;
    ensure!(view.article.views_count() == 1);
    ensure!(view.related.iter().any(|related| related.id() == second.id()));
    let again = editorial
        .articles
        .read_published(first.slug().as_str())
        .await?;
    ensure!(again.article.views_count() == 2);
    ensure!(
        editorial
            .articles
            .read_published(draft.slug().as_str())
            .await
            .is_err()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn static_pages_resolve_by_slug(editorial: Editorial) -> eyre::Result<()> {
    let marketplace = Marketplace::new();
    let admin = marketplace.admin("editor").await?;

    let page = editorial
        .pages
        .create(
            &admin,
            &PageDraft::new("О проекте", "<p>Мы помогаем найти исполнителя</p>").with_slug("about"),
        )
        .await?;
    let found = editorial.pages.find_by_slug("about").await?;

    ensure!(found.id() == page.id());
    ensure!(found.seo().title() == "О проекте");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn long_titles_still_get_storable_unique_slugs(editorial: Editorial) -> eyre::Result<()> {
    let marketplace = Marketplace::new();
    let admin = marketplace.admin("editor").await?;
    let tips = editorial
        .categories
        .create(&admin, &ArticleCategoryInput::new("Советы"))
        .await?;

    let wordy = editorial
        .articles
        .create(
            &admin,
            &ArticleDraft::new("щ".repeat(200), "<p>Длинно</p>", tips.id()),
        )
        .await?;
    ensure!(wordy.slug().as_str().len() == 255);

    let title = format!("{}a", "ж".repeat(127));
    let first = editorial
        .articles
        .create(&admin, &ArticleDraft::new(title.as_str(), "<p>Раз</p>", tips.id()))
        .await?;
    let second = editorial
        .articles
        .create(&admin, &ArticleDraft::new(title.as_str(), "<p>Два</p>", tips.id()))
        .await?;
    ensure!(first.slug().as_str().len() == 255);
    ensure!(second.slug().as_str().len() <= 255);
    ensure!(second.slug().as_str().ends_with("-1"));
    ensure!(second.slug() != first.slug());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn related_reading_follows_the_configured_limit() -> eyre::Result<()> {
    let editorial = editorial_with(&ListingConfig {
        related_articles_limit: 1,
        ..ListingConfig::DEFAULT
    });
    let marketplace = Marketplace::new();
    let admin = marketplace.admin("editor").await?;
    let tips = editorial
        .categories
        .create(&admin, &ArticleCategoryInput::new("Советы"))
        .await?;

    let mut published = Vec::new();
    for title in ["Как выбрать мастера", "Как составить задание", "Как принять работу"] {
        let article = editorial
            .articles
            .create(
                &admin,
                &ArticleDraft::new(title, "<p>Текст</p>", tips.id())
                    .with_status(ArticleStatus::Published),
            )
            .await?;
        published.push(article);
    }

    let Some(first) = published.first() else {
        eyre::bail!("no article was published");
    };
    let view = editorial
        .articles
        .read_published(first.slug().as_str())
        .await?;
    ensure!(view.related.len() == 1);
    ensure!(view.related.iter().all(|related| related.id() != first.id()));
    Ok(())
}
