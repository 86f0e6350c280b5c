//! In-memory integration tests for moderation of tasks and users.

use crate::test_helpers::{Marketplace, PASSWORD};
use eyre::ensure;
use rstest::{fixture, rstest};
use taskboard::access::AccessError;
use taskboard::account::{domain::BanStatus, services::AccountError};
use taskboard::catalog::domain::CategoryId;
use taskboard::config::Listing;
use taskboard::task::{
    domain::{ModerationStatus, TaskDomainError},
    ports::AdminTaskFilter,
    services::{CreateTaskRequest, TaskModerationError},
};

#[fixture]
fn marketplace() -> Marketplace {
    Marketplace::new()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn editing_an_approved_task_sends_it_back_to_the_queue(
    marketplace: Marketplace,
) -> eyre::Result<()> {
    let admin = marketplace.admin("moderator").await?;
    let author = marketplace.register("alice").await?;
    let task = marketplace
        .approved_task(&admin, author.id(), "Move a sofa")
        .await?;

    let edit = CreateTaskRequest::new("Move two sofas", "Third floor, no lift", CategoryId::new());
    let edited = marketplace
        .lifecycle
        .edit_task(author.id(), task.id(), edit)
        .await?;

    ensure!(edited.moderation().status == ModerationStatus::Pending);
    ensure!(
        marketplace
            .lifecycle
            .open_tasks(marketplace.listing.page_request(Listing::Tasks, None))
            .await?
            .total_items()
            == 0
    );
    let queue = marketplace
        .task_moderation
        .list(
            &admin,
            AdminTaskFilter::new().with_moderation(ModerationStatus::Pending),
            marketplace.listing.page_request(Listing::AdminTasks, None),
        )
        .await?;
    ensure!(queue.items().iter().any(|queued| queued.id() == task.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejection_needs_a_comment(marketplace: Marketplace) -> eyre::Result<()> {
    let admin = marketplace.admin("moderator").await?;
    let author = marketplace.register("alice").await?;
    let request = CreateTaskRequest::new("Sell my car", "Cash only", CategoryId::new());
    let task = marketplace.lifecycle.create_task(author.id(), request).await?;

    let blank = marketplace.task_moderation.reject(&admin, task.id(), "  ").await;
    ensure!(
        matches!(
            blank,
            Err(TaskModerationError::Domain(TaskDomainError::EmptyField { .. }))
        ),
        "expected EmptyField, got {blank:?}"
    );

    let rejected = marketplace
        .task_moderation
        .reject(&admin, task.id(), "Sales are not allowed")
        .await?;
    ensure!(rejected.moderation().status == ModerationStatus::Rejected);
    ensure!(
        marketplace
            .lifecycle
            .task_detail(task.id(), Some(author.id()))
            .await?
            .task
            .moderation()
            .status
            == ModerationStatus::Rejected
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ordinary_members_are_kept_out_of_the_admin_area(
    marketplace: Marketplace,
) -> eyre::Result<()> {
    let member = marketplace.register("alice").await?;

    let refused = marketplace.guard.require_admin(Some(member.id())).await;
    ensure!(matches!(refused, Err(AccessError::Forbidden)));
    let anonymous = marketplace.guard.require_member(None).await;
    ensure!(matches!(anonymous, Err(AccessError::Unauthenticated)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn temporary_ban_blocks_access_until_lifted(marketplace: Marketplace) -> eyre::Result<()> {
    let admin = marketplace.admin("moderator").await?;
    let member = marketplace.register("alice").await?;

    let banned = marketplace
        .user_moderation
        .ban_temporarily(&admin, member.id(), "Spam in responses", Some(3))
        .await?;
    ensure!(banned.ban_status() == BanStatus::Temporary);
    let blocked = marketplace.guard.require_member(Some(member.id())).await;
    ensure!(
        matches!(blocked, Err(AccessError::Banned { until: Some(_) })),
        "expected a temporary ban, got {blocked:?}"
    );

    marketplace.user_moderation.unban(&admin, member.id()).await?;
    let allowed = marketplace.guard.require_member(Some(member.id())).await?;
    ensure!(allowed.user_id() == member.id());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn warnings_accumulate_on_the_user_record(marketplace: Marketplace) -> eyre::Result<()> {
    let admin = marketplace.admin("moderator").await?;
    let member = marketplace.register("alice").await?;

    marketplace
        .user_moderation
        .issue_warning(&admin, member.id(), "Rude message")
        .await?;
    marketplace
        .user_moderation
        .issue_warning(&admin, member.id(), "Off-platform payment request")
        .await?;

    let detail = marketplace
        .user_moderation
        .user_detail(&admin, member.id())
        .await?;
    ensure!(detail.warnings().len() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn credentials_are_checked_on_sign_in(marketplace: Marketplace) -> eyre::Result<()> {
    let member = marketplace.register("alice").await?;

    let signed_in = marketplace
        .accounts
        .authenticate("alice@example.com", PASSWORD)
        .await?;
    ensure!(signed_in.id() == member.id());
    ensure!(signed_in.last_login_at().is_some());

    let wrong = marketplace
        .accounts
        .authenticate("alice@example.com", "guess")
        .await;
    ensure!(matches!(wrong, Err(AccountError::InvalidCredentials)));
    Ok(())
}
