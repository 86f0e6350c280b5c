//! `PostgreSQL` repository implementation for account storage.

use super::{
    models::{UserChangeset, UserRow, WarningRow},
    schema::{user_warnings, users},
};
use crate::account::{
    domain::{
        Ban, BanKind, BanStatus, EmailAddress, Gender, PasswordHash, PersistedUserData,
        RatingAverage, RatingSummary, Role, User, UserId, UserProfile, Username, Warning,
        WarningId,
    },
    ports::{UserFilter, UserRepository, UserRepositoryError, UserRepositoryResult},
};
use crate::pagination::{Page, PageRequest};
use crate::persistence::{
    PgPool, contains_pattern, from_sql_count, run_blocking, to_sql_count, violates,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let row = to_row(user);
        let user_id = user.id();
        let username = user.username().clone();
        let email = user.email().clone();

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(users::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if violates(info.as_ref(), "users_username_key") =>
                    {
                        UserRepositoryError::DuplicateUsername(username.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if violates(info.as_ref(), "users_email_key") =>
                    {
                        UserRepositoryError::DuplicateEmail(email.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        UserRepositoryError::DuplicateUser(user_id)
                    }
                    _ => UserRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let changes = UserChangeset::from(to_row(user));
        let warning_rows = to_warning_rows(user);
        let user_id = user.id();
        let id = user_id.into_inner();

        run_blocking(&self.pool, move |connection| {
            connection.transaction::<_, UserRepositoryError, _>(|tx| {
                let affected = diesel::update(users::table.find(id))
                    .set(&changes)
                    .execute(tx)
                    .map_err(UserRepositoryError::persistence)?;
                if affected == 0 {
                    return Err(UserRepositoryError::NotFound(user_id));
                }

                diesel::delete(user_warnings::table.filter(user_warnings::user_id.eq(id)))
                    .execute(tx)
                    .map_err(UserRepositoryError::persistence)?;
                if !warning_rows.is_empty() {
                    diesel::insert_into(user_warnings::table)
                        .values(&warning_rows)
                        .execute(tx)
                        .map_err(UserRepositoryError::persistence)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> UserRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(users::table.find(id.into_inner()))
                .set((users::last_login_at.eq(Some(at)), users::updated_at.eq(at)))
                .execute(connection)
                .map_err(UserRepositoryError::persistence)?;
            if affected == 0 {
                return Err(UserRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn store_rating_summary(
        &self,
        id: UserId,
        summary: RatingSummary,
        at: DateTime<Utc>,
    ) -> UserRepositoryResult<()> {
        let total = i32::try_from(summary.total()).unwrap_or(i32::MAX);
        let average = summary
            .average()
            .and_then(|value| i16::try_from(value.tenths()).ok());
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(
                users::table
                    .find(id.into_inner())
                    .filter(users::rating_total.le(total)),
            )
            .set((
                users::rating_average.eq(average),
                users::rating_total.eq(total),
                users::updated_at.eq(at),
            ))
            .execute(connection)
            .map_err(UserRepositoryError::persistence)?;
            if affected > 0 {
                return Ok(());
            }
            let present = diesel::select(exists(users::table.find(id.into_inner())))
                .get_result::<bool>(connection)
                .map_err(UserRepositoryError::persistence)?;
            if present {
                Ok(())
            } else {
                Err(UserRepositoryError::NotFound(id))
            }
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        run_blocking(&self.pool, move |connection| {
            let row = users::table
                .find(id.into_inner())
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            hydrate_one(connection, row)
        })
        .await
    }

    async fn find_by_username(&self, username: &Username) -> UserRepositoryResult<Option<User>> {
        let value = username.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let row = users::table
                .filter(users::username.eq(value))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            hydrate_one(connection, row)
        })
        .await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>> {
        let value = email.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let row = users::table
                .filter(users::email.eq(value))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            hydrate_one(connection, row)
        })
        .await
    }

    async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> UserRepositoryResult<Page<User>> {
        let lookup = filter.clone();
        run_blocking(&self.pool, move |connection| {
            let total = filtered(&lookup)
                .count()
                .get_result::<i64>(connection)
                .map_err(UserRepositoryError::persistence)?;
            let rows = filtered(&lookup)
                .order((users::created_at.desc(), users::username.asc()))
                .limit(i64::from(page.size()))
                .offset(to_sql_count(page.offset()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            let items = hydrate_many(connection, rows)?;
            Ok(Page::new(items, page, from_sql_count(total)))
        })
        .await
    }
}

fn filtered(filter: &UserFilter) -> users::BoxedQuery<'static, Pg> {
    let mut query = users::table.into_boxed::<Pg>();
    if let Some(status) = filter.ban_status {
        query = query.filter(users::ban_status.eq(status.as_str()));
    }
    if let Some(term) = filter.search.as_deref() {
        let pattern = contains_pattern(term);
        query = query.filter(
            users::username
                .ilike(pattern.clone())
                .or(users::email.ilike(pattern.clone()))
                .or(users::first_name.assume_not_null().ilike(pattern.clone()))
                .or(users::last_name.assume_not_null().ilike(pattern)),
        );
    }
    query
}

fn hydrate_one(
    connection: &mut PgConnection,
    row: Option<UserRow>,
) -> UserRepositoryResult<Option<User>> {
    let Some(user_row) = row else {
        return Ok(None);
    };
    let warnings = user_warnings::table
        .filter(user_warnings::user_id.eq(user_row.id))
        .order(user_warnings::issued_at.asc())
        .select(WarningRow::as_select())
        .load::<WarningRow>(connection)
        .map_err(UserRepositoryError::persistence)?;
    row_to_user(user_row, warnings).map(Some)
}

fn hydrate_many(
    connection: &mut PgConnection,
    rows: Vec<UserRow>,
) -> UserRepositoryResult<Vec<User>> {
    let ids: Vec<uuid::Uuid> = rows.iter().map(|row| row.id).collect();
    let warning_rows = user_warnings::table
        .filter(user_warnings::user_id.eq_any(ids))
        .order(user_warnings::issued_at.asc())
        .select(WarningRow::as_select())
        .load::<WarningRow>(connection)
        .map_err(UserRepositoryError::persistence)?;

    let mut by_user: HashMap<uuid::Uuid, Vec<WarningRow>> = HashMap::new();
    for warning in warning_rows {
        by_user.entry(warning.user_id).or_default().push(warning);
    }

    rows.into_iter()
        .map(|row| {
            let warnings = by_user.remove(&row.id).unwrap_or_default();
            row_to_user(row, warnings)
        })
        .collect()
}

fn to_row(user: &User) -> UserRow {
    let profile = user.profile();
    let rating = user.rating();
    let ban = user.ban();
    UserRow {
        id: user.id().into_inner(),
        username: user.username().as_str().to_owned(),
        email: user.email().as_str().to_owned(),
        password_hash: user.password_hash().as_str().to_owned(),
        role: user.role().as_str().to_owned(),
        first_name: profile.first_name().map(str::to_owned),
        last_name: profile.last_name().map(str::to_owned),
        bio: profile.bio().map(str::to_owned),
        phone: profile.phone().map(str::to_owned),
        avatar: profile.avatar().map(str::to_owned),
        date_of_birth: profile.date_of_birth(),
        gender: profile.gender().map(|gender| gender.as_str().to_owned()),
        rating_average: rating
            .average()
            .and_then(|average| i16::try_from(average.tenths()).ok()),
        rating_total: i32::try_from(rating.total()).unwrap_or(i32::MAX),
        ban_status: user.ban_status().as_str().to_owned(),
        ban_until: ban.and_then(Ban::until),
        ban_reason: ban.map(|record| record.reason().to_owned()),
        banned_by: ban.map(|record| record.banned_by().into_inner()),
        banned_at: ban.map(Ban::banned_at),
        created_at: user.created_at(),
        updated_at: user.updated_at(),
        last_login_at: user.last_login_at(),
    }
}

fn to_warning_rows(user: &User) -> Vec<WarningRow> {
    user.warnings()
        .iter()
        .map(|warning| WarningRow {
            id: warning.id().into_inner(),
            user_id: user.id().into_inner(),
            reason: warning.reason().to_owned(),
            issued_by: warning.issued_by().into_inner(),
            issued_at: warning.issued_at(),
        })
        .collect()
}

fn corrupt(message: String) -> UserRepositoryError {
    UserRepositoryError::persistence(std::io::Error::other(message))
}

fn row_to_ban(row: &UserRow) -> UserRepositoryResult<Option<Ban>> {
    let status =
        BanStatus::try_from(row.ban_status.as_str()).map_err(UserRepositoryError::persistence)?;
    let kind = match status {
        BanStatus::None => return Ok(None),
        BanStatus::Permanent => BanKind::Permanent,
        BanStatus::Temporary => BanKind::Temporary {
            until: row
                .ban_until
                .ok_or_else(|| corrupt(format!("user {} has a temporary ban without expiry", row.id)))?,
        },
    };
    let banned_by = row
        .banned_by
        .ok_or_else(|| corrupt(format!("user {} has a ban without issuer", row.id)))?;
    let banned_at = row
        .banned_at
        .ok_or_else(|| corrupt(format!("user {} has a ban without timestamp", row.id)))?;
    Ok(Some(Ban::from_persisted(
        kind,
        row.ban_reason.clone().unwrap_or_default(),
        UserId::from_uuid(banned_by),
        banned_at,
    )))
}

fn row_to_user(row: UserRow, warnings: Vec<WarningRow>) -> UserRepositoryResult<User> {
    let ban = row_to_ban(&row)?;
    let gender = row
        .gender
        .as_deref()
        .map(Gender::try_from)
        .transpose()
        .map_err(UserRepositoryError::persistence)?;
    let profile = UserProfile::new()
        .with_first_name(row.first_name)
        .and_then(|profile| profile.with_last_name(row.last_name))
        .and_then(|profile| profile.with_bio(row.bio))
        .map_err(UserRepositoryError::persistence)?
        .with_phone(row.phone)
        .with_avatar(row.avatar)
        .with_date_of_birth(row.date_of_birth)
        .with_gender(gender);
    let average = row
        .rating_average
        .and_then(|tenths| u16::try_from(tenths).ok())
        .map(RatingAverage::from_tenths);
    let rating = RatingSummary::from_persisted(
        average,
        u32::try_from(row.rating_total).unwrap_or_default(),
    );

    let data = PersistedUserData {
        id: UserId::from_uuid(row.id),
        username: Username::new(row.username).map_err(UserRepositoryError::persistence)?,
        email: EmailAddress::new(row.email).map_err(UserRepositoryError::persistence)?,
        password_hash: PasswordHash::new(row.password_hash),
        role: Role::try_from(row.role.as_str()).map_err(UserRepositoryError::persistence)?,
        profile,
        rating,
        warnings: warnings
            .into_iter()
            .map(|warning| {
                Warning::from_persisted(
                    WarningId::from_uuid(warning.id),
                    warning.reason,
                    UserId::from_uuid(warning.issued_by),
                    warning.issued_at,
                )
            })
            .collect(),
        ban,
        created_at: row.created_at,
        updated_at: row.updated_at,
        last_login_at: row.last_login_at,
    };
    Ok(User::from_persisted(data))
}
