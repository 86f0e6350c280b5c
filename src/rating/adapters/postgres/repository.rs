//! `PostgreSQL` repository implementation for ratings.

use super::schema::ratings;
use crate::account::domain::UserId;
use crate::persistence::{PgPool, from_sql_count, run_blocking, violates};
use crate::rating::{
    domain::{PersistedRatingData, Rating, RatingComment, RatingId, Score},
    ports::{RatingRepository, RatingRepositoryError, RatingRepositoryResult, RatingTotals},
};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{count_star, sum};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Query and insert row for ratings.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = ratings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct RatingRow {
    id: uuid::Uuid,
    task_id: uuid::Uuid,
    rater_id: uuid::Uuid,
    rated_id: uuid::Uuid,
    score: i16,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

/// `PostgreSQL`-backed rating repository.
#[derive(Debug, Clone)]
pub struct PostgresRatingRepository {
    pool: PgPool,
}

impl PostgresRatingRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RatingRepository for PostgresRatingRepository {
    async fn store(&self, rating: &Rating) -> RatingRepositoryResult<()> {
        let row = to_row(rating);
        let rating_id = rating.id();
        let task_id = rating.task_id();
        let rater = rating.rater_id();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(ratings::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if violates(info.as_ref(), "ratings_task_id_rater_id_key") =>
                    {
                        RatingRepositoryError::DuplicateRating { task_id, rater }
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        RatingRepositoryError::DuplicateId(rating_id)
                    }
                    _ => RatingRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_task(&self, task_id: TaskId) -> RatingRepositoryResult<Vec<Rating>> {
        run_blocking(&self.pool, move |connection| {
            let rows = ratings::table
                .filter(ratings::task_id.eq(task_id.into_inner()))
                .order((ratings::created_at.desc(), ratings::id.asc()))
                .select(RatingRow::as_select())
                .load::<RatingRow>(connection)
                .map_err(RatingRepositoryError::persistence)?;
            rows.into_iter().map(row_to_rating).collect()
        })
        .await
    }

    async fn find_by_task_and_rater(
        &self,
        task_id: TaskId,
        rater: UserId,
    ) -> RatingRepositoryResult<Option<Rating>> {
        run_blocking(&self.pool, move |connection| {
            ratings::table
                .filter(ratings::task_id.eq(task_id.into_inner()))
                .filter(ratings::rater_id.eq(rater.into_inner()))
                .select(RatingRow::as_select())
                .first::<RatingRow>(connection)
                .optional()
                .map_err(RatingRepositoryError::persistence)?
                .map(row_to_rating)
                .transpose()
        })
        .await
    }

    async fn list_received(
        &self,
        rated: UserId,
        limit: u32,
    ) -> RatingRepositoryResult<Vec<Rating>> {
        run_blocking(&self.pool, move |connection| {
            let rows = ratings::table
                .filter(ratings::rated_id.eq(rated.into_inner()))
                .order((ratings::created_at.desc(), ratings::id.asc()))
                .limit(i64::from(limit))
                .select(RatingRow::as_select())
                .load::<RatingRow>(connection)
                .map_err(RatingRepositoryError::persistence)?;
            rows.into_iter().map(row_to_rating).collect()
        })
        .await
    }

    async fn totals_for(&self, rated: UserId) -> RatingRepositoryResult<RatingTotals> {
        run_blocking(&self.pool, move |connection| {
            let (total, count) = ratings::table
                .filter(ratings::rated_id.eq(rated.into_inner()))
                .select((sum(ratings::score), count_star()))
                .get_result::<(Option<i64>, i64)>(connection)
                .map_err(RatingRepositoryError::persistence)?;
            Ok(RatingTotals {
                sum: from_sql_count(total.unwrap_or_default()),
                count: from_sql_count(count),
            })
        })
        .await
    }
}

fn to_row(rating: &Rating) -> RatingRow {
    RatingRow {
        id: rating.id().into_inner(),
        task_id: rating.task_id().into_inner(),
        rater_id: rating.rater_id().into_inner(),
        rated_id: rating.rated_id().into_inner(),
        score: i16::from(rating.score().value()),
        comment: rating.comment().map(|comment| comment.as_str().to_owned()),
        created_at: rating.created_at(),
    }
}

fn row_to_rating(row: RatingRow) -> RatingRepositoryResult<Rating> {
    Ok(Rating::from_persisted(PersistedRatingData {
        id: RatingId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        rater_id: UserId::from_uuid(row.rater_id),
        rated_id: UserId::from_uuid(row.rated_id),
        score: Score::new(i64::from(row.score)).map_err(RatingRepositoryError::persistence)?,
        comment: RatingComment::optional(row.comment.as_deref())
            .map_err(RatingRepositoryError::persistence)?,
        created_at: row.created_at,
    }))
}
