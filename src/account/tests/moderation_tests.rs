//! User moderation service tests.

use std::sync::Arc;

use crate::access::AdminActor;
use crate::account::{
    adapters::memory::InMemoryUserRepository,
    domain::{
        AccountDomainError, BanStatus, EmailAddress, PasswordHash, Role, User, UserId,
        UserProfile, Username, WarningId,
    },
    ports::{UserFilter, UserRepository},
    services::{UserModerationError, UserModerationService},
};
use crate::pagination::PageRequest;
use crate::test_support::FixedClock;
use chrono::Duration;
use mockable::Clock;
use rstest::{fixture, rstest};

struct Harness {
    repository: Arc<InMemoryUserRepository>,
    clock: Arc<FixedClock>,
    service: UserModerationService<InMemoryUserRepository, FixedClock>,
    admin: AdminActor,
}

#[fixture]
fn harness() -> Harness {
    let repository = Arc::new(InMemoryUserRepository::new());
    let clock = Arc::new(FixedClock::new());
    let service = UserModerationService::new(Arc::clone(&repository), Arc::clone(&clock));
    Harness {
        repository,
        clock,
        service,
        admin: AdminActor::for_tests(UserId::new()),
    }
}

async fn seed(harness: &Harness, name: &str, first_name: Option<&str>) -> User {
    let mut user = User::register(
        Username::new(name).expect("valid username"),
        EmailAddress::new(format!("{name}@example.com")).expect("valid email"),
        PasswordHash::new("hash"),
        &*harness.clock,
    );
    let profile = UserProfile::new()
        .with_first_name(first_name.map(str::to_owned))
        .expect("valid profile");
    user.update_profile(profile, &*harness.clock);
    harness.repository.store(&user).await.expect("store user");
    harness.clock.advance(Duration::minutes(1));
    user
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_users_filters_by_search_and_ban_status(harness: Harness) {
    seed(&harness, "ivan", Some("Иван")).await;
    let petr = seed(&harness, "petr", Some("Пётр")).await;
    seed(&harness, "ivanova", None).await;

    let found = harness
        .service
        .list_users(
            &harness.admin,
            &UserFilter::new().with_search("IVAN"),
            PageRequest::first(20),
        )
        .await
        .expect("listing succeeds");
    let names: Vec<&str> = found
        .items()
        .iter()
        .map(|user| user.username().as_str())
        .collect();
    assert_eq!(names, ["ivanova", "ivan"]);

    let by_first_name = harness
        .service
        .list_users(
            &harness.admin,
            &UserFilter::new().with_search("пётр"),
            PageRequest::first(20),
        )
        .await
        .expect("listing succeeds");
    assert_eq!(by_first_name.total_items(), 1);

    harness
        .service
        .ban_permanently(&harness.admin, petr.id(), "fraud")
        .await
        .expect("ban applies");
    let banned = harness
        .service
        .list_users(
            &harness.admin,
            &UserFilter::new().with_ban_status(BanStatus::Permanent),
            PageRequest::first(20),
        )
        .await
        .expect("listing succeeds");
    assert_eq!(banned.items().len(), 1);
    assert_eq!(banned.items().first().map(User::id), Some(petr.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn warnings_are_issued_and_removed(harness: Harness) {
    let user = seed(&harness, "ivan", None).await;

    let warning = harness
        .service
        .issue_warning(&harness.admin, user.id(), "offensive language")
        .await
        .expect("warning issued");
    assert_eq!(warning.issued_by(), harness.admin.user_id());

    let missing = harness
        .service
        .remove_warning(&harness.admin, user.id(), WarningId::new())
        .await;
    assert!(matches!(
        missing,
        Err(UserModerationError::Domain(AccountDomainError::WarningNotFound(_)))
    ));

    let cleared = harness
        .service
        .remove_warning(&harness.admin, user.id(), warning.id())
        .await
        .expect("warning removed");
    assert!(cleared.warnings().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn temporary_ban_defaults_to_seven_days(harness: Harness) {
    let user = seed(&harness, "ivan", None).await;

    let banned = harness
        .service
        .ban_temporarily(&harness.admin, user.id(), "spam", None)
        .await
        .expect("ban applies");

    let until = banned.ban().and_then(|ban| ban.until());
    assert_eq!(until, Some(harness.clock.utc() + Duration::days(7)));
}

#[rstest]
#[case(0)]
#[case(400)]
#[tokio::test(flavor = "multi_thread")]
async fn temporary_ban_rejects_out_of_range_days(harness: Harness, #[case] days: i64) {
    let user = seed(&harness, "ivan", None).await;

    let result = harness
        .service
        .ban_temporarily(&harness.admin, user.id(), "spam", Some(days))
        .await;

    assert!(matches!(
        result,
        Err(UserModerationError::Domain(AccountDomainError::InvalidBanDays(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn administrators_cannot_be_banned(harness: Harness) {
    let mut target = seed(&harness, "boss", None).await;
    target.set_role(Role::Admin, &*harness.clock);
    harness.repository.update(&target).await.expect("update");

    let result = harness
        .service
        .ban_permanently(&harness.admin, target.id(), "coup")
        .await;

    assert!(matches!(
        result,
        Err(UserModerationError::Domain(AccountDomainError::CannotBanAdmin(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unban_restores_clean_state(harness: Harness) {
    let user = seed(&harness, "ivan", None).await;
    harness
        .service
        .ban_temporarily(&harness.admin, user.id(), "spam", Some(30))
        .await
        .expect("ban applies");

    let restored = harness
        .service
        .unban(&harness.admin, user.id())
        .await
        .expect("unban succeeds");

    assert_eq!(restored.ban_status(), BanStatus::None);
    let detail = harness
        .service
        .user_detail(&harness.admin, user.id())
        .await
        .expect("detail loads");
    assert!(detail.ban().is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_user_is_reported(harness: Harness) {
    let missing = UserId::new();
    let result = harness.service.unban(&harness.admin, missing).await;
    assert!(matches!(result, Err(UserModerationError::UserNotFound(id)) if id == missing));
}
