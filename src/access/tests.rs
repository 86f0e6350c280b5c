//! Tests for the member and administrator gates.

use std::sync::Arc;

use super::{AccessError, AccessGuard};
use crate::account::{
    adapters::memory::InMemoryUserRepository,
    domain::{BanDays, EmailAddress, PasswordHash, Role, User, UserId, Username},
    ports::UserRepository,
};
use crate::test_support::FixedClock;
use chrono::Duration;
use rstest::{fixture, rstest};

struct Harness {
    users: Arc<InMemoryUserRepository>,
    clock: Arc<FixedClock>,
    guard: AccessGuard<InMemoryUserRepository, FixedClock>,
}

#[fixture]
fn harness() -> Harness {
    let users = Arc::new(InMemoryUserRepository::new());
    let clock = Arc::new(FixedClock::new());
    let guard = AccessGuard::new(Arc::clone(&users), Arc::clone(&clock));
    Harness {
        users,
        clock,
        guard,
    }
}

async fn seed_user(harness: &Harness, name: &str, role: Role) -> User {
    let mut user = User::register(
        Username::new(name).expect("valid username"),
        EmailAddress::new(format!("{name}@example.com")).expect("valid email"),
        PasswordHash::new("hash"),
        &*harness.clock,
    );
    user.set_role(role, &*harness.clock);
    harness.users.store(&user).await.expect("store user");
    user
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn anonymous_session_is_rejected(harness: Harness) {
    let result = harness.guard.require_member(None).await;
    assert!(matches!(result, Err(AccessError::Unauthenticated)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_user_is_rejected(harness: Harness) {
    let missing = UserId::new();
    let result = harness.guard.require_member(Some(missing)).await;
    assert!(matches!(result, Err(AccessError::UnknownUser(id)) if id == missing));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn member_passes_but_admin_gate_forbids(harness: Harness) {
    let user = seed_user(&harness, "worker", Role::User).await;

    let member = harness
        .guard
        .require_member(Some(user.id()))
        .await
        .expect("member passes");
    assert_eq!(member.user_id(), user.id());
    assert_eq!(member.role(), Role::User);

    let admin = harness.guard.require_admin(Some(user.id())).await;
    assert!(matches!(admin, Err(AccessError::Forbidden)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_gate_returns_actor(harness: Harness) {
    let admin = seed_user(&harness, "moderator", Role::Admin).await;
    let actor = harness
        .guard
        .require_admin(Some(admin.id()))
        .await
        .expect("admin passes");
    assert_eq!(actor.user_id(), admin.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn temporary_ban_blocks_until_expiry(harness: Harness) {
    let mut user = seed_user(&harness, "spammer", Role::User).await;
    let days = BanDays::new(2).expect("valid ban length");
    user.ban_temporarily("spam", days, UserId::new(), &*harness.clock)
        .expect("ban applies");
    harness.users.update(&user).await.expect("update user");

    let blocked = harness.guard.require_member(Some(user.id())).await;
    assert!(matches!(blocked, Err(AccessError::Banned { until: Some(_) })));

    harness.clock.advance(Duration::days(2) + Duration::seconds(1));
    let allowed = harness.guard.require_member(Some(user.id())).await;
    assert!(allowed.is_ok());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn permanent_ban_always_blocks(harness: Harness) {
    let mut user = seed_user(&harness, "troll", Role::User).await;
    user.ban_permanently("abuse", UserId::new(), &*harness.clock)
        .expect("ban applies");
    harness.users.update(&user).await.expect("update user");

    harness.clock.advance(Duration::days(3650));
    let result = harness.guard.require_member(Some(user.id())).await;
    assert!(matches!(result, Err(AccessError::Banned { until: None })));
}
