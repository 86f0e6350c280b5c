//! End-to-end marketplace flow over in-memory stores.

use crate::test_helpers::Marketplace;
use eyre::ensure;
use rstest::{fixture, rstest};
use taskboard::catalog::domain::CategoryId;
use taskboard::message::{domain::MessageSender, services::MessagingError};
use taskboard::config::{Listing, ListingConfig};
use taskboard::rating::{
    domain::RatingEligibility,
    services::{RateUserRequest, RatingError},
};
use taskboard::task::{
    domain::TaskStatus,
    services::{CreateTaskRequest, TaskLifecycleError},
};

#[fixture]
fn marketplace() -> Marketplace {
    Marketplace::new()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_travels_from_posting_to_mutual_ratings(
    marketplace: Marketplace,
) -> eyre::Result<()> {
    let admin = marketplace.admin("moderator").await?;
    let author = marketplace.register("alice").await?;
    let worker = marketplace.register("bob").await?;

    let task = marketplace
        .approved_task(&admin, author.id(), "Fix a leaking tap")
        .await?;
    let first_page = marketplace.listing.page_request(Listing::Tasks, None);
    let listed = marketplace.lifecycle.open_tasks(first_page).await?;
    ensure!(listed.items().iter().any(|open| open.id() == task.id()));

    let response = marketplace
        .lifecycle
        .respond(task.id(), worker.id(), "I have the tools")
        .await?;
    let started = marketplace
        .lifecycle
        .accept_response(task.id(), response.id(), author.id())
        .await?;
    ensure!(started.status() == TaskStatus::InProgress);
    ensure!(started.executor_id() == Some(worker.id()));

    marketplace
        .messaging
        .send(task.id(), worker.id(), "On my way")
        .await?;
    ensure!(marketplace.messaging.unread_count(task.id(), author.id()).await? == 1);
    let conversation = marketplace
        .messaging
        .conversation(task.id(), author.id())
        .await?;
    ensure!(conversation.is_author);
    ensure!(conversation.messages.len() == 1);
    ensure!(marketplace.messaging.unread_count(task.id(), author.id()).await? == 0);

    let closed = marketplace
        .lifecycle
        .close_task(task.id(), author.id())
        .await?;
    ensure!(closed.status() == TaskStatus::Closed);

    let eligibility = marketplace
        .ratings
        .eligibility(task.id(), Some(author.id()))
        .await?;
    ensure!(
        eligibility
            == RatingEligibility::Eligible {
                rated: worker.id(),
                rater_is_author: true,
            }
    );
    marketplace
        .ratings
        .rate(
            task.id(),
            author.id(),
            RateUserRequest::new(worker.id(), 5).with_comment("Quick and tidy"),
        )
        .await?;
    marketplace
        .ratings
        .rate(task.id(), worker.id(), RateUserRequest::new(author.id(), 4))
        .await?;

    let received = marketplace.ratings.user_ratings("bob").await?;
    ensure!(received.summary.total() == 1);
    ensure!(received.summary.average().map(|average| average.tenths()) == Some(50));
    ensure!(marketplace.ratings.task_ratings(task.id()).await?.len() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pending_task_is_hidden_from_everyone_but_its_author(
    marketplace: Marketplace,
) -> eyre::Result<()> {
    let author = marketplace.register("alice").await?;
    let stranger = marketplace.register("carol").await?;
    let request = CreateTaskRequest::new("Walk the dog", "Twice a day", CategoryId::new());
    let task = marketplace
        .lifecycle
        .create_task(author.id(), request)
        .await?;

    let own = marketplace
        .lifecycle
        .task_detail(task.id(), Some(author.id()))
        .await?;
    ensure!(own.is_author);

    for viewer in [None, Some(stranger.id())] {
        let hidden = marketplace.lifecycle.task_detail(task.id(), viewer).await;
        ensure!(
            matches!(hidden, Err(TaskLifecycleError::TaskNotFound(id)) if id == task.id()),
            "expected TaskNotFound, got {hidden:?}"
        );
    }
    ensure!(
        marketplace
            .lifecycle
            .open_tasks(marketplace.listing.page_request(Listing::Tasks, None))
            .await?
            .total_items()
            == 0
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_response_from_the_same_user_is_refused(
    marketplace: Marketplace,
) -> eyre::Result<()> {
    let admin = marketplace.admin("moderator").await?;
    let author = marketplace.register("alice").await?;
    let worker = marketplace.register("bob").await?;
    let task = marketplace
        .approved_task(&admin, author.id(), "Assemble a wardrobe")
        .await?;

    marketplace
        .lifecycle
        .respond(task.id(), worker.id(), "Done this many times")
        .await?;
    let repeated = marketplace
        .lifecycle
        .respond(task.id(), worker.id(), "Still keen")
        .await;

    ensure!(
        matches!(repeated, Err(TaskLifecycleError::AlreadyResponded(_))),
        "expected AlreadyResponded, got {repeated:?}"
    );
    let detail = marketplace
        .lifecycle
        .task_detail(task.id(), Some(worker.id()))
        .await?;
    ensure!(detail.has_responded);
    ensure!(detail.responses.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsiders_cannot_join_the_conversation(marketplace: Marketplace) -> eyre::Result<()> {
    let admin = marketplace.admin("moderator").await?;
    let author = marketplace.register("alice").await?;
    let worker = marketplace.register("bob").await?;
    let outsider = marketplace.register("mallory").await?;
    let (task, _) = marketplace
        .task_in_progress(&admin, author.id(), worker.id())
        .await?;

    let read = marketplace
        .messaging
        .conversation(task.id(), outsider.id())
        .await;
    ensure!(matches!(read, Err(MessagingError::Forbidden)));
    let sent = marketplace
        .messaging
        .send(task.id(), outsider.id(), "Hello?")
        .await;
    ensure!(matches!(sent, Err(MessagingError::Forbidden)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn system_notices_reach_both_participants(marketplace: Marketplace) -> eyre::Result<()> {
    let admin = marketplace.admin("moderator").await?;
    let author = marketplace.register("alice").await?;
    let worker = marketplace.register("bob").await?;
    let (task, _) = marketplace
        .task_in_progress(&admin, author.id(), worker.id())
        .await?;

    let notice = marketplace
        .messaging
        .post_system_notice(&admin, task.id(), "Please keep payments on the platform")
        .await?;

    ensure!(notice.sender() == MessageSender::System);
    ensure!(marketplace.messaging.unread_count(task.id(), author.id()).await? == 1);
    ensure!(marketplace.messaging.unread_count(task.id(), worker.id()).await? == 1);
    ensure!(
        marketplace
            .messaging
            .transcript(&admin, task.id())
            .await?
            .len()
            == 1
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ratings_wait_for_the_task_to_close(marketplace: Marketplace) -> eyre::Result<()> {
    let admin = marketplace.admin("moderator").await?;
    let author = marketplace.register("alice").await?;
    let worker = marketplace.register("bob").await?;
    let (task, _) = marketplace
        .task_in_progress(&admin, author.id(), worker.id())
        .await?;

    let early = marketplace
        .ratings
        .rate(task.id(), author.id(), RateUserRequest::new(worker.id(), 5))
        .await;
    ensure!(
        matches!(early, Err(RatingError::TaskNotClosed(id)) if id == task.id()),
        "expected TaskNotClosed, got {early:?}"
    );
    ensure!(
        !marketplace
            .ratings
            .eligibility(task.id(), Some(author.id()))
            .await?
            .is_eligible()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn profile_lists_newest_ratings_but_averages_all_of_them() -> eyre::Result<()> {
    let marketplace = Marketplace::with_listing(ListingConfig {
        user_ratings_limit: 2,
        ..ListingConfig::DEFAULT
    });
    let admin = marketplace.admin("moderator").await?;
    let worker = marketplace.register("bob").await?;

    for (client, score) in [("alice", 5), ("carol", 4), ("dave", 3)] {
        let author = marketplace.register(client).await?;
        let (task, _) = marketplace
            .task_in_progress(&admin, author.id(), worker.id())
            .await?;
        marketplace
            .lifecycle
            .close_task(task.id(), author.id())
            .await?;
        marketplace
            .ratings
            .rate(task.id(), author.id(), RateUserRequest::new(worker.id(), score))
            .await?;
    }

    let received = marketplace.ratings.user_ratings("bob").await?;
    ensure!(received.ratings.len() == 2);
    ensure!(received.summary.total() == 3);
    ensure!(received.summary.average().map(|average| average.tenths()) == Some(40));
    let profile = marketplace.accounts.profile(worker.id()).await?;
    ensure!(profile.rating().total() == 3);
    Ok(())
}
