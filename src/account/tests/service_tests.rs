//! Service orchestration tests for registration, login and profiles.

use std::sync::Arc;

use crate::account::{
    adapters::memory::InMemoryUserRepository,
    domain::{AccountDomainError, PasswordHash, RatingSummary, Role},
    ports::{MockPasswordHasher, PasswordHashError, UserRepository, UserRepositoryError},
    services::{
        AccountError, AccountService, RegisterUserRequest, RoleService, UpdateProfileRequest,
    },
};
use crate::test_support::FixedClock;
use chrono::Duration;
use mockable::Clock;
use rstest::{fixture, rstest};

type TestService = AccountService<InMemoryUserRepository, MockPasswordHasher, FixedClock>;

struct Harness {
    repository: Arc<InMemoryUserRepository>,
    clock: Arc<FixedClock>,
    service: TestService,
}

fn prefixing_hasher() -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|password| Ok(PasswordHash::new(format!("hashed:{password}"))));
    hasher
        .expect_verify()
        .returning(|password, hash| Ok(hash.as_str() == format!("hashed:{password}")));
    hasher
}

fn harness_with(hasher: MockPasswordHasher) -> Harness {
    let repository = Arc::new(InMemoryUserRepository::new());
    let clock = Arc::new(FixedClock::new());
    let service = AccountService::new(Arc::clone(&repository), Arc::new(hasher), Arc::clone(&clock));
    Harness {
        repository,
        clock,
        service,
    }
}

#[fixture]
fn harness() -> Harness {
    harness_with(prefixing_hasher())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_hashes_password_and_persists(harness: Harness) {
    let user = harness
        .service
        .register(RegisterUserRequest::new("Anna", "anna@example.com", "pw123"))
        .await
        .expect("registration succeeds");

    assert_eq!(user.password_hash().as_str(), "hashed:pw123");
    assert_eq!(user.role(), Role::User);
    let stored = harness
        .repository
        .find_by_id(user.id())
        .await
        .expect("lookup succeeds");
    assert_eq!(stored, Some(user));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_rejects_duplicate_username_and_email(harness: Harness) {
    harness
        .service
        .register(RegisterUserRequest::new("anna", "anna@example.com", "pw"))
        .await
        .expect("first registration succeeds");

    let same_name = harness
        .service
        .register(RegisterUserRequest::new("ANNA", "other@example.com", "pw"))
        .await;
    assert!(matches!(
        same_name,
        Err(AccountError::Repository(UserRepositoryError::DuplicateUsername(_)))
    ));

    let same_email = harness
        .service
        .register(RegisterUserRequest::new("anna2", "Anna@Example.com", "pw"))
        .await;
    assert!(matches!(
        same_email,
        Err(AccountError::Repository(UserRepositoryError::DuplicateEmail(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_rejects_empty_password_without_hashing() {
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().never();
    let harness = harness_with(hasher);

    let result = harness
        .service
        .register(RegisterUserRequest::new("anna", "anna@example.com", ""))
        .await;

    assert!(matches!(
        result,
        Err(AccountError::Domain(AccountDomainError::EmptyPassword))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hashing_failure_is_surfaced() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Err(PasswordHashError("backend down".to_owned())));
    let harness = harness_with(hasher);

    let result = harness
        .service
        .register(RegisterUserRequest::new("anna", "anna@example.com", "pw"))
        .await;

    assert!(matches!(result, Err(AccountError::Hashing(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn authenticate_stamps_last_login(harness: Harness) {
    harness
        .service
        .register(RegisterUserRequest::new("anna", "anna@example.com", "pw"))
        .await
        .expect("registration succeeds");

    harness.clock.advance(Duration::hours(1));
    let user = harness
        .service
        .authenticate("ANNA@example.com", "pw")
        .await
        .expect("login succeeds");

    assert_eq!(user.last_login_at(), Some(harness.clock.utc()));
}

#[rstest]
#[case("anna@example.com", "wrong")]
#[case("nobody@example.com", "pw")]
#[case("not-an-email", "pw")]
#[tokio::test(flavor = "multi_thread")]
async fn authenticate_rejects_bad_credentials(
    harness: Harness,
    #[case] email: &str,
    #[case] password: &str,
) {
    harness
        .service
        .register(RegisterUserRequest::new("anna", "anna@example.com", "pw"))
        .await
        .expect("registration succeeds");

    let result = harness.service.authenticate(email, password).await;
    assert!(matches!(result, Err(AccountError::InvalidCredentials)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn authenticate_rejects_banned_user(harness: Harness) {
    let mut user = harness
        .service
        .register(RegisterUserRequest::new("anna", "anna@example.com", "pw"))
        .await
        .expect("registration succeeds");
    user.ban_permanently("fraud", crate::account::domain::UserId::new(), &*harness.clock)
        .expect("ban applies");
    harness.repository.update(&user).await.expect("update");

    let result = harness.service.authenticate("anna@example.com", "pw").await;
    assert!(matches!(result, Err(AccountError::Banned { until: None })));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_profile_replaces_fields(harness: Harness) {
    let user = harness
        .service
        .register(RegisterUserRequest::new("anna", "anna@example.com", "pw"))
        .await
        .expect("registration succeeds");

    let updated = harness
        .service
        .update_profile(
            user.id(),
            UpdateProfileRequest::new()
                .with_first_name("Анна")
                .with_bio("Plumber from Simferopol"),
        )
        .await
        .expect("update succeeds");

    assert_eq!(updated.profile().first_name(), Some("Анна"));
    let public = harness
        .service
        .public_profile("Anna")
        .await
        .expect("public profile");
    assert_eq!(public.display_name(), "Анна");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn public_profile_of_unknown_user_fails(harness: Harness) {
    let result = harness.service.public_profile("ghost").await;
    assert!(matches!(result, Err(AccountError::UnknownUsername(name)) if name == "ghost"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn set_role_promotes_and_demotes(harness: Harness) {
    harness
        .service
        .register(RegisterUserRequest::new("anna", "anna@example.com", "pw"))
        .await
        .expect("registration succeeds");

    let roles = RoleService::new(Arc::clone(&harness.repository), Arc::clone(&harness.clock));
    let promoted = roles
        .set_role("anna", Role::Admin)
        .await
        .expect("promotion succeeds");
    assert!(promoted.is_admin());

    let demoted = roles
        .set_role("anna", Role::User)
        .await
        .expect("demotion succeeds");
    assert!(!demoted.is_admin());

    let unknown = roles.set_role("ghost", Role::Admin).await;
    assert!(matches!(unknown, Err(AccountError::UnknownUsername(name)) if name == "ghost"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn profile_edit_from_a_stale_read_keeps_login_and_rating(harness: Harness) {
    let stale = harness
        .service
        .register(RegisterUserRequest::new("anna", "anna@example.com", "pw"))
        .await
        .expect("registration succeeds");

    harness.clock.advance(Duration::hours(1));
    let signed_in = harness
        .service
        .authenticate("anna@example.com", "pw")
        .await
        .expect("login succeeds");
    harness
        .repository
        .store_rating_summary(stale.id(), RatingSummary::from_totals(9, 2), harness.clock.utc())
        .await
        .expect("summary stored");

    let mut edited = stale;
    edited.set_role(Role::Admin, &*harness.clock);
    harness.repository.update(&edited).await.expect("update");

    let current = harness
        .service
        .profile(edited.id())
        .await
        .expect("profile loads");
    assert_eq!(current.role(), Role::Admin);
    assert_eq!(current.last_login_at(), signed_in.last_login_at());
    assert_eq!(current.rating().total(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn older_rating_summary_does_not_replace_a_newer_one(harness: Harness) {
    let user = harness
        .service
        .register(RegisterUserRequest::new("anna", "anna@example.com", "pw"))
        .await
        .expect("registration succeeds");
    let at = harness.clock.utc();

    harness
        .repository
        .store_rating_summary(user.id(), RatingSummary::from_totals(9, 2), at)
        .await
        .expect("newer summary stored");
    harness
        .repository
        .store_rating_summary(user.id(), RatingSummary::from_totals(5, 1), at)
        .await
        .expect("older summary ignored");

    let current = harness
        .service
        .profile(user.id())
        .await
        .expect("profile loads");
    assert_eq!(current.rating(), RatingSummary::from_totals(9, 2));

    let missing = harness
        .repository
        .store_rating_summary(
            crate::account::domain::UserId::new(),
            RatingSummary::from_totals(5, 1),
            at,
        )
        .await;
    assert!(matches!(missing, Err(UserRepositoryError::NotFound(_))));
}
