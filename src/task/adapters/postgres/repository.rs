//! `PostgreSQL` repository implementation for tasks and responses.

use super::{
    models::{ResponseRow, TaskRow},
    schema::{task_responses, tasks},
};
use crate::account::domain::UserId;
use crate::catalog::domain::{CategoryId, CityId};
use crate::pagination::{Page, PageRequest};
use crate::persistence::{PgPool, from_sql_count, run_blocking, to_sql_count, violates};
use crate::task::{
    domain::{
        Moderation, ModerationComment, ModerationStatus, PersistedResponseData,
        PersistedTaskData, Response, ResponseId, ResponseMessage, ResponseStatus, Task,
        TaskContent, TaskDescription, TaskId, TaskLocation, TaskStatus, TaskTitle,
    },
    ports::{
        AdminTaskFilter, ResponseRepository, TaskRepository, TaskRepositoryError,
        TaskRepositoryResult, TaskRevision,
    },
};
use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed store implementing both task ports.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_page(
        &self,
        scope: TaskScope,
        page: PageRequest,
    ) -> TaskRepositoryResult<Page<Task>> {
        run_blocking(&self.pool, move |connection| {
            let total = scoped(scope)
                .count()
                .get_result::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            let rows = scoped(scope)
                .order((tasks::created_at.desc(), tasks::id.asc()))
                .limit(i64::from(page.size()))
                .offset(to_sql_count(page.offset()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            let items = rows
                .into_iter()
                .map(row_to_task)
                .collect::<TaskRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, page, from_sql_count(total)))
        })
        .await
    }

    async fn load_responses(&self, scope: ResponseScope) -> TaskRepositoryResult<Vec<Response>> {
        run_blocking(&self.pool, move |connection| {
            let query = task_responses::table.into_boxed::<Pg>();
            let rows = match scope {
                ResponseScope::Task(id) => query.filter(task_responses::task_id.eq(id)),
                ResponseScope::Responder(id) => query.filter(task_responses::responder_id.eq(id)),
            }
            .order((task_responses::created_at.desc(), task_responses::id.asc()))
            .select(ResponseRow::as_select())
            .load::<ResponseRow>(connection)
            .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_response).collect()
        })
        .await
    }
}

#[derive(Debug, Clone, Copy)]
enum TaskScope {
    OpenApproved,
    Author(uuid::Uuid),
    Admin(AdminTaskFilter),
}

#[derive(Debug, Clone, Copy)]
enum ResponseScope {
    Task(uuid::Uuid),
    Responder(uuid::Uuid),
}

fn scoped(scope: TaskScope) -> tasks::BoxedQuery<'static, Pg> {
    let query = tasks::table.into_boxed::<Pg>();
    match scope {
        TaskScope::OpenApproved => query
            .filter(tasks::status.eq(TaskStatus::Open.as_str()))
            .filter(tasks::moderation_status.eq(ModerationStatus::Approved.as_str())),
        TaskScope::Author(author) => query.filter(tasks::author_id.eq(author)),
        TaskScope::Admin(filter) => {
            let mut admin = query;
            if let Some(moderation) = filter.moderation {
                admin = admin.filter(tasks::moderation_status.eq(moderation.as_str()));
            }
            if let Some(status) = filter.status {
                admin = admin.filter(tasks::status.eq(status.as_str()));
            }
            admin
        }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let row = to_task_row(task);
        let task_id = task.id();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task, expected: TaskRevision) -> TaskRepositoryResult<()> {
        let row = to_task_row(task);
        let task_id = task.id();
        run_blocking(&self.pool, move |connection| {
            update_task(connection, &row, task_id, expected)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        run_blocking(&self.pool, move |connection| {
            tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?
                .map(row_to_task)
                .transpose()
        })
        .await
    }

    async fn list_open_approved(&self, page: PageRequest) -> TaskRepositoryResult<Page<Task>> {
        self.load_page(TaskScope::OpenApproved, page).await
    }

    async fn list_by_author(
        &self,
        author: UserId,
        page: PageRequest,
    ) -> TaskRepositoryResult<Page<Task>> {
        self.load_page(TaskScope::Author(author.into_inner()), page)
            .await
    }

    async fn list(
        &self,
        filter: AdminTaskFilter,
        page: PageRequest,
    ) -> TaskRepositoryResult<Page<Task>> {
        self.load_page(TaskScope::Admin(filter), page).await
    }
}

#[async_trait]
impl ResponseRepository for PostgresTaskRepository {
    async fn store_response(&self, response: &Response) -> TaskRepositoryResult<()> {
        let row = to_response_row(response);
        let task_id = response.task_id();
        let responder = response.responder_id();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(task_responses::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if violates(info.as_ref(), "task_responses_task_id_responder_id_key") =>
                    {
                        TaskRepositoryError::DuplicateResponse { task_id, responder }
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_response(&self, response: &Response) -> TaskRepositoryResult<()> {
        let row = to_response_row(response);
        let response_id = response.id();
        run_blocking(&self.pool, move |connection| {
            update_response_row(connection, &row, response_id)
        })
        .await
    }

    async fn delete_response(&self, id: ResponseId) -> TaskRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::delete(task_responses::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::ResponseNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_response(&self, id: ResponseId) -> TaskRepositoryResult<Option<Response>> {
        run_blocking(&self.pool, move |connection| {
            task_responses::table
                .find(id.into_inner())
                .select(ResponseRow::as_select())
                .first::<ResponseRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?
                .map(row_to_response)
                .transpose()
        })
        .await
    }

    async fn find_by_task(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<Response>> {
        self.load_responses(ResponseScope::Task(task_id.into_inner()))
            .await
    }

    async fn find_by_task_and_responder(
        &self,
        task_id: TaskId,
        responder: UserId,
    ) -> TaskRepositoryResult<Option<Response>> {
        run_blocking(&self.pool, move |connection| {
            task_responses::table
                .filter(task_responses::task_id.eq(task_id.into_inner()))
                .filter(task_responses::responder_id.eq(responder.into_inner()))
                .select(ResponseRow::as_select())
                .first::<ResponseRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?
                .map(row_to_response)
                .transpose()
        })
        .await
    }

    async fn list_by_responder(&self, responder: UserId) -> TaskRepositoryResult<Vec<Response>> {
        self.load_responses(ResponseScope::Responder(responder.into_inner()))
            .await
    }

    async fn record_acceptance(
        &self,
        task: &Task,
        response: &Response,
        expected: TaskRevision,
    ) -> TaskRepositoryResult<()> {
        let task_row = to_task_row(task);
        let response_row = to_response_row(response);
        let task_id = task.id();
        let response_id = response.id();
        run_blocking(&self.pool, move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                update_task(tx, &task_row, task_id, expected)?;
                accept_pending_response(tx, &response_row, task_id, response_id)?;
                diesel::update(
                    task_responses::table
                        .filter(task_responses::task_id.eq(task_row.id))
                        .filter(task_responses::id.ne(response_row.id))
                        .filter(task_responses::status.eq(ResponseStatus::Pending.as_str())),
                )
                .set((
                    task_responses::status.eq(ResponseStatus::Rejected.as_str()),
                    task_responses::updated_at.eq(task_row.updated_at),
                ))
                .execute(tx)
                .map_err(TaskRepositoryError::persistence)?;
                Ok(())
            })
        })
        .await
    }
}

/// Writes `row` only while the stored task is still at `expected`.
fn update_task(
    connection: &mut PgConnection,
    row: &TaskRow,
    task_id: TaskId,
    expected: TaskRevision,
) -> TaskRepositoryResult<()> {
    let affected = diesel::update(
        tasks::table
            .find(row.id)
            .filter(tasks::status.eq(expected.status().as_str()))
            .filter(tasks::updated_at.eq(expected.updated_at())),
    )
    .set(row)
    .execute(connection)
    .map_err(TaskRepositoryError::persistence)?;
    if affected > 0 {
        return Ok(());
    }
    let present = diesel::select(exists(tasks::table.find(row.id)))
        .get_result::<bool>(connection)
        .map_err(TaskRepositoryError::persistence)?;
    if present {
        Err(TaskRepositoryError::Conflict(task_id))
    } else {
        Err(TaskRepositoryError::NotFound(task_id))
    }
}

fn accept_pending_response(
    connection: &mut PgConnection,
    row: &ResponseRow,
    task_id: TaskId,
    response_id: ResponseId,
) -> TaskRepositoryResult<()> {
    let affected = diesel::update(
        task_responses::table
            .find(row.id)
            .filter(task_responses::status.eq(ResponseStatus::Pending.as_str())),
    )
    .set(row)
    .execute(connection)
    .map_err(TaskRepositoryError::persistence)?;
    if affected > 0 {
        return Ok(());
    }
    let present = diesel::select(exists(task_responses::table.find(row.id)))
        .get_result::<bool>(connection)
        .map_err(TaskRepositoryError::persistence)?;
    if present {
        Err(TaskRepositoryError::Conflict(task_id))
    } else {
        Err(TaskRepositoryError::ResponseNotFound(response_id))
    }
}

fn update_response_row(
    connection: &mut PgConnection,
    row: &ResponseRow,
    response_id: ResponseId,
) -> TaskRepositoryResult<()> {
    let affected = diesel::update(task_responses::table.find(row.id))
        .set(row)
        .execute(connection)
        .map_err(TaskRepositoryError::persistence)?;
    if affected == 0 {
        return Err(TaskRepositoryError::ResponseNotFound(response_id));
    }
    Ok(())
}

fn to_task_row(task: &Task) -> TaskRow {
    let moderation = task.moderation();
    TaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().as_str().to_owned(),
        author_id: task.author_id().into_inner(),
        category_id: task.category_id().into_inner(),
        location_type: task.location().location_type().to_owned(),
        city_id: task.location().city_id().map(CityId::into_inner),
        status: task.status().as_str().to_owned(),
        moderation_status: moderation.status.as_str().to_owned(),
        moderation_comment: moderation
            .comment
            .as_ref()
            .map(|comment| comment.as_str().to_owned()),
        moderated_by: moderation.moderated_by.map(UserId::into_inner),
        moderated_at: moderation.moderated_at,
        accepted_response_id: task.accepted_response().map(ResponseId::into_inner),
        executor_id: task.executor_id().map(UserId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_response_row(response: &Response) -> ResponseRow {
    ResponseRow {
        id: response.id().into_inner(),
        task_id: response.task_id().into_inner(),
        responder_id: response.responder_id().into_inner(),
        message: response.message().as_str().to_owned(),
        status: response.status().as_str().to_owned(),
        created_at: response.created_at(),
        updated_at: response.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let location = TaskLocation::from_parts(&row.location_type, row.city_id.map(CityId::from_uuid))
        .map_err(TaskRepositoryError::persistence)?;
    let content = TaskContent {
        title: TaskTitle::new(row.title).map_err(TaskRepositoryError::persistence)?,
        description: TaskDescription::new(row.description)
            .map_err(TaskRepositoryError::persistence)?,
        category_id: CategoryId::from_uuid(row.category_id),
        location,
    };
    let status = TaskStatus::try_from(row.status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let moderation = Moderation {
        status: ModerationStatus::try_from(row.moderation_status.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        comment: ModerationComment::optional(row.moderation_comment.as_deref()),
        moderated_by: row.moderated_by.map(UserId::from_uuid),
        moderated_at: row.moderated_at,
    };
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        content,
        author_id: UserId::from_uuid(row.author_id),
        status,
        moderation,
        accepted_response: row.accepted_response_id.map(ResponseId::from_uuid),
        executor_id: row.executor_id.map(UserId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn row_to_response(row: ResponseRow) -> TaskRepositoryResult<Response> {
    Ok(Response::from_persisted(PersistedResponseData {
        id: ResponseId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        responder_id: UserId::from_uuid(row.responder_id),
        message: ResponseMessage::new(row.message).map_err(TaskRepositoryError::persistence)?,
        status: ResponseStatus::try_from(row.status.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
