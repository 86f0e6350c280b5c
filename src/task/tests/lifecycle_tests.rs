//! Service orchestration tests for posting, responding and accepting.

use std::sync::Arc;

use crate::account::domain::UserId;
use crate::catalog::domain::{CategoryId, CityId};
use crate::pagination::PageRequest;
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{
        ResponseStatus, Task, TaskContent, TaskDescription, TaskDomainError, TaskLocation,
        TaskStatus, TaskTitle,
    },
    ports::{ResponseRepository, TaskRepository, TaskRepositoryError, TaskRevision},
    services::{CreateTaskRequest, TaskLifecycleError, TaskLifecycleService},
};
use crate::test_support::FixedClock;
use chrono::Duration;
use rstest::{fixture, rstest};

struct Harness {
    repository: Arc<InMemoryTaskRepository>,
    clock: Arc<FixedClock>,
    service: TaskLifecycleService<InMemoryTaskRepository, FixedClock>,
    author: UserId,
}

#[fixture]
fn harness() -> Harness {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let clock = Arc::new(FixedClock::new());
    let service = TaskLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock));
    Harness {
        repository,
        clock,
        service,
        author: UserId::new(),
    }
}

fn request(title: &str) -> CreateTaskRequest {
    CreateTaskRequest::new(title, "Full description", CategoryId::new())
}

async fn approved(harness: &Harness, title: &str) -> Task {
    let mut task = harness
        .service
        .create_task(harness.author, request(title))
        .await
        .expect("task created");
    let revision = TaskRevision::of(&task);
    task.approve(UserId::new(), None, &*harness.clock);
    harness
        .repository
        .update(&task, revision)
        .await
        .expect("task approved");
    harness.clock.advance(Duration::minutes(1));
    task
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_validates_location(harness: Harness) {
    let missing_city = request("Tile the bathroom").with_location_type("city");
    let result = harness.service.create_task(harness.author, missing_city).await;
    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::CityRequired))
    ));

    let on_site = request("Tile the bathroom").in_city(CityId::new());
    let task = harness
        .service
        .create_task(harness.author, on_site)
        .await
        .expect("task created");
    assert!(task.location().city_id().is_some());
    assert_eq!(task.status(), TaskStatus::Open);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_tasks_lists_only_approved_open_tasks_newest_first(harness: Harness) {
    harness
        .service
        .create_task(harness.author, request("Pending task"))
        .await
        .expect("task created");
    let older = approved(&harness, "Older").await;
    let newer = approved(&harness, "Newer").await;

    let page = harness
        .service
        .open_tasks(PageRequest::first(10))
        .await
        .expect("listing succeeds");
    let ids: Vec<_> = page.items().iter().map(Task::id).collect();
    assert_eq!(ids, vec![newer.id(), older.id()]);

    let mine = harness
        .service
        .my_tasks(harness.author, PageRequest::first(10))
        .await
        .expect("listing succeeds");
    assert_eq!(mine.total_items(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hidden_task_detail_is_only_shown_to_its_author(harness: Harness) {
    let task = harness
        .service
        .create_task(harness.author, request("Secret"))
        .await
        .expect("task created");

    let stranger = harness.service.task_detail(task.id(), Some(UserId::new())).await;
    assert!(matches!(stranger, Err(TaskLifecycleError::TaskNotFound(id)) if id == task.id()));

    let detail = harness
        .service
        .task_detail(task.id(), Some(harness.author))
        .await
        .expect("author sees task");
    assert!(detail.is_author);
    assert!(!detail.has_responded);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_response_from_same_user_is_refused(harness: Harness) {
    let task = approved(&harness, "Move a sofa").await;
    let responder = UserId::new();
    harness
        .service
        .respond(task.id(), responder, "I have a van")
        .await
        .expect("first response");

    let duplicate = harness
        .service
        .respond(task.id(), responder, "Me again")
        .await;
    assert!(matches!(duplicate, Err(TaskLifecycleError::AlreadyResponded(_))));

    let detail = harness
        .service
        .task_detail(task.id(), Some(responder))
        .await
        .expect("detail visible");
    assert!(detail.has_responded);
    assert_eq!(detail.responses.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn responding_to_pending_or_own_task_fails(harness: Harness) {
    let pending = harness
        .service
        .create_task(harness.author, request("Not yet"))
        .await
        .expect("task created");
    let result = harness
        .service
        .respond(pending.id(), UserId::new(), "Hello")
        .await;
    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::TaskNotApproved(_)))
    ));

    let task = approved(&harness, "Mine").await;
    let own = harness.service.respond(task.id(), harness.author, "Hi").await;
    assert!(matches!(
        own,
        Err(TaskLifecycleError::Domain(TaskDomainError::OwnTask(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accepting_rejects_every_other_response(harness: Harness) {
    let task = approved(&harness, "Assemble a wardrobe").await;
    let chosen_by = UserId::new();
    let chosen = harness
        .service
        .respond(task.id(), chosen_by, "Two hours")
        .await
        .expect("response");
    let other = harness
        .service
        .respond(task.id(), UserId::new(), "Three hours")
        .await
        .expect("response");

    let started = harness
        .service
        .accept_response(task.id(), chosen.id(), harness.author)
        .await
        .expect("acceptance succeeds");
    assert_eq!(started.status(), TaskStatus::InProgress);
    assert_eq!(started.executor_id(), Some(chosen_by));

    let responses = harness
        .repository
        .find_by_task(task.id())
        .await
        .expect("responses load");
    let status_of = |id| {
        responses
            .iter()
            .find(|response| response.id() == id)
            .map(|response| response.status())
    };
    assert_eq!(status_of(chosen.id()), Some(ResponseStatus::Accepted));
    assert_eq!(status_of(other.id()), Some(ResponseStatus::Rejected));

    let late = harness
        .service
        .withdraw_response(task.id(), other.id(), other.responder_id())
        .await;
    assert!(matches!(
        late,
        Err(TaskLifecycleError::Domain(TaskDomainError::TaskNotOpen(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accepting_a_response_of_another_task_fails(harness: Harness) {
    let task = approved(&harness, "First").await;
    let elsewhere = approved(&harness, "Second").await;
    let foreign = harness
        .service
        .respond(elsewhere.id(), UserId::new(), "Offer")
        .await
        .expect("response");

    let result = harness
        .service
        .accept_response(task.id(), foreign.id(), harness.author)
        .await;
    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::ResponseTaskMismatch { .. }
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn withdraw_and_edit_act_on_pending_responses(harness: Harness) {
    let task = approved(&harness, "Clean windows").await;
    let responder = UserId::new();
    let response = harness
        .service
        .respond(task.id(), responder, "Tomorrow")
        .await
        .expect("response");

    let edited = harness
        .service
        .edit_response(task.id(), response.id(), responder, "Today")
        .await
        .expect("edit succeeds");
    assert_eq!(edited.message().as_str(), "Today");

    let stranger = harness
        .service
        .withdraw_response(task.id(), response.id(), UserId::new())
        .await;
    assert!(matches!(
        stranger,
        Err(TaskLifecycleError::Domain(TaskDomainError::NotResponder(_)))
    ));

    harness
        .service
        .withdraw_response(task.id(), response.id(), responder)
        .await
        .expect("withdraw succeeds");
    let remaining = harness
        .service
        .responses_by(responder)
        .await
        .expect("lookup succeeds");
    assert!(remaining.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_lifecycle_ends_closed(harness: Harness) {
    let task = approved(&harness, "Paint a fence").await;
    let worker = UserId::new();
    let response = harness
        .service
        .respond(task.id(), worker, "Ready")
        .await
        .expect("response");

    let early = harness.service.close_task(task.id(), harness.author).await;
    assert!(matches!(
        early,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InvalidStatusTransition { .. }
        ))
    ));

    harness
        .service
        .accept_response(task.id(), response.id(), harness.author)
        .await
        .expect("accepted");
    let closed = harness
        .service
        .close_task(task.id(), harness.author)
        .await
        .expect("closed");
    assert_eq!(closed.status(), TaskStatus::Closed);

    let detail = harness
        .service
        .task_detail(task.id(), Some(worker))
        .await
        .expect("executor sees task");
    assert_eq!(detail.task.executor_id(), Some(worker));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_records_are_reported(harness: Harness) {
    let task = approved(&harness, "Exists").await;
    let missing_task = harness
        .service
        .close_task(crate::task::domain::TaskId::new(), harness.author)
        .await;
    assert!(matches!(missing_task, Err(TaskLifecycleError::TaskNotFound(_))));

    let missing_response = harness
        .service
        .accept_response(
            task.id(),
            crate::task::domain::ResponseId::new(),
            harness.author,
        )
        .await;
    assert!(matches!(
        missing_response,
        Err(TaskLifecycleError::ResponseNotFound(_))
    ));
}

async fn stored(harness: &Harness, task: &Task) -> Task {
    harness
        .repository
        .find_by_id(task.id())
        .await
        .expect("task loads")
        .expect("task exists")
}

async fn accepted_count(harness: &Harness, task: &Task) -> usize {
    harness
        .repository
        .find_by_task(task.id())
        .await
        .expect("responses load")
        .iter()
        .filter(|response| response.status() == ResponseStatus::Accepted)
        .count()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn acceptance_from_a_stale_read_is_refused(harness: Harness) {
    let task = approved(&harness, "Tile the bathroom").await;
    let first = harness
        .service
        .respond(task.id(), UserId::new(), "Tomorrow")
        .await
        .expect("response");
    let second = harness
        .service
        .respond(task.id(), UserId::new(), "Today")
        .await
        .expect("response");
    let snapshot = stored(&harness, &task).await;
    let revision = TaskRevision::of(&snapshot);

    let clock = &*harness.clock;
    let mut winner_task = snapshot.clone();
    let mut winner = first;
    winner_task
        .accept(harness.author, &winner, clock)
        .expect("accept allowed");
    winner.accept(clock).expect("response pending");
    let mut loser_task = snapshot;
    let mut loser = second;
    loser_task
        .accept(harness.author, &loser, clock)
        .expect("accept allowed");
    loser.accept(clock).expect("response pending");

    harness
        .repository
        .record_acceptance(&winner_task, &winner, revision)
        .await
        .expect("first acceptance stored");
    let lost = harness
        .repository
        .record_acceptance(&loser_task, &loser, revision)
        .await;

    assert!(matches!(lost, Err(TaskRepositoryError::Conflict(id)) if id == task.id()));
    assert_eq!(accepted_count(&harness, &task).await, 1);
    assert_eq!(
        stored(&harness, &task).await.executor_id(),
        Some(winner.responder_id())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_acceptances_start_work_once(harness: Harness) {
    let task = approved(&harness, "Hang the curtains").await;
    let first = harness
        .service
        .respond(task.id(), UserId::new(), "Morning")
        .await
        .expect("response");
    let second = harness
        .service
        .respond(task.id(), UserId::new(), "Evening")
        .await
        .expect("response");

    let (a, b) = tokio::join!(
        harness
            .service
            .accept_response(task.id(), first.id(), harness.author),
        harness
            .service
            .accept_response(task.id(), second.id(), harness.author),
    );

    assert_eq!(usize::from(a.is_ok()) + usize::from(b.is_ok()), 1);
    assert_eq!(accepted_count(&harness, &task).await, 1);
    assert_eq!(stored(&harness, &task).await.status(), TaskStatus::InProgress);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_from_a_stale_read_does_not_overwrite_acceptance(harness: Harness) {
    let task = approved(&harness, "Fix the gate").await;
    let response = harness
        .service
        .respond(task.id(), UserId::new(), "Can do")
        .await
        .expect("response");
    let snapshot = stored(&harness, &task).await;
    let revision = TaskRevision::of(&snapshot);

    harness
        .service
        .accept_response(task.id(), response.id(), harness.author)
        .await
        .expect("acceptance succeeds");
    let snapshot_category = snapshot.category_id();
    let mut stale_edit = snapshot;
    stale_edit
        .edit(
            harness.author,
            TaskContent {
                title: TaskTitle::new("Fix the gate and fence").expect("valid title"),
                description: TaskDescription::new("Full description").expect("valid body"),
                category_id: snapshot_category,
                location: TaskLocation::Remote,
            },
            &*harness.clock,
        )
        .expect("edit allowed on the stale copy");
    let lost = harness.repository.update(&stale_edit, revision).await;

    assert!(matches!(lost, Err(TaskRepositoryError::Conflict(_))));
    let current = stored(&harness, &task).await;
    assert_eq!(current.title().as_str(), "Fix the gate");
    assert_eq!(current.status(), TaskStatus::InProgress);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn acceptance_after_a_concurrent_edit_is_refused(harness: Harness) {
    let task = approved(&harness, "Paint a fence").await;
    let response = harness
        .service
        .respond(task.id(), UserId::new(), "Weekend")
        .await
        .expect("response");
    let mut stale = stored(&harness, &task).await;
    let revision = TaskRevision::of(&stale);

    harness
        .service
        .edit_task(harness.author, task.id(), request("Paint a long fence"))
        .await
        .expect("edit succeeds");
    let mut accepted = response;
    stale
        .accept(harness.author, &accepted, &*harness.clock)
        .expect("accept allowed on the stale copy");
    accepted.accept(&*harness.clock).expect("response pending");
    let lost = harness
        .repository
        .record_acceptance(&stale, &accepted, revision)
        .await;

    assert!(matches!(lost, Err(TaskRepositoryError::Conflict(_))));
    let current = stored(&harness, &task).await;
    assert_eq!(current.title().as_str(), "Paint a long fence");
    assert_eq!(current.status(), TaskStatus::Open);
    assert_eq!(accepted_count(&harness, &task).await, 0);
}
