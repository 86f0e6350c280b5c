//! Diesel row models for account persistence.

use super::schema::{user_warnings, users};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct UserRow {
    /// Account identifier.
    pub id: uuid::Uuid,
    /// Lowercase public handle.
    pub username: String,
    /// Lowercase login email.
    pub email: String,
    /// Encoded password hash.
    pub password_hash: String,
    /// Account role.
    pub role: String,
    /// Optional first name.
    pub first_name: Option<String>,
    /// Optional last name.
    pub last_name: Option<String>,
    /// Optional biography.
    pub bio: Option<String>,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Optional avatar path.
    pub avatar: Option<String>,
    /// Optional date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Optional gender.
    pub gender: Option<String>,
    /// Average score in tenths.
    pub rating_average: Option<i16>,
    /// Number of ratings received.
    pub rating_total: i32,
    /// Stored ban classification.
    pub ban_status: String,
    /// Expiry of a temporary ban.
    pub ban_until: Option<DateTime<Utc>>,
    /// Ban reason.
    pub ban_reason: Option<String>,
    /// Administrator who issued the ban.
    pub banned_by: Option<uuid::Uuid>,
    /// When the ban was issued.
    pub banned_at: Option<DateTime<Utc>>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Last successful login.
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Columns rewritten by whole-record updates.
///
/// Rating totals and the last login time are absent; they have their own
/// narrow updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub struct UserChangeset {
    /// Lowercase public handle.
    pub username: String,
    /// Lowercase login email.
    pub email: String,
    /// Encoded password hash.
    pub password_hash: String,
    /// Account role.
    pub role: String,
    /// Optional first name.
    pub first_name: Option<String>,
    /// Optional last name.
    pub last_name: Option<String>,
    /// Optional biography.
    pub bio: Option<String>,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Optional avatar path.
    pub avatar: Option<String>,
    /// Optional date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Optional gender.
    pub gender: Option<String>,
    /// Stored ban classification.
    pub ban_status: String,
    /// Expiry of a temporary ban.
    pub ban_until: Option<DateTime<Utc>>,
    /// Ban reason.
    pub ban_reason: Option<String>,
    /// Administrator who issued the ban.
    pub banned_by: Option<uuid::Uuid>,
    /// When the ban was issued.
    pub banned_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserChangeset {
    fn from(row: UserRow) -> Self {
        Self {
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role,
            first_name: row.first_name,
            last_name: row.last_name,
            bio: row.bio,
            phone: row.phone,
            avatar: row.avatar,
            date_of_birth: row.date_of_birth,
            gender: row.gender,
            ban_status: row.ban_status,
            ban_until: row.ban_until,
            ban_reason: row.ban_reason,
            banned_by: row.banned_by,
            banned_at: row.banned_at,
            updated_at: row.updated_at,
        }
    }
}

/// Query and insert row for warnings.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = user_warnings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WarningRow {
    /// Warning identifier.
    pub id: uuid::Uuid,
    /// Warned account.
    pub user_id: uuid::Uuid,
    /// Reason text.
    pub reason: String,
    /// Issuing administrator.
    pub issued_by: uuid::Uuid,
    /// Issue timestamp.
    pub issued_at: DateTime<Utc>,
}
