//! User aggregate root and its public projection.

use super::{
    AccountDomainError, Ban, BanDays, BanKind, BanStatus, EmailAddress, PasswordHash,
    RatingSummary, Role, UserId, UserProfile, Username, Warning, WarningId,
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Registered marketplace account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    password_hash: PasswordHash,
    role: Role,
    profile: UserProfile,
    rating: RatingSummary,
    warnings: Vec<Warning>,
    ban: Option<Ban>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted identifier.
    pub id: UserId,
    /// Persisted username.
    pub username: Username,
    /// Persisted email.
    pub email: EmailAddress,
    /// Persisted password hash.
    pub password_hash: PasswordHash,
    /// Persisted role.
    pub role: Role,
    /// Persisted profile fields.
    pub profile: UserProfile,
    /// Persisted rating totals.
    pub rating: RatingSummary,
    /// Persisted warnings, oldest first.
    pub warnings: Vec<Warning>,
    /// Persisted ban, if any.
    pub ban: Option<Ban>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted last login timestamp.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a freshly registered user with the `User` role.
    #[must_use]
    pub fn register(
        username: Username,
        email: EmailAddress,
        password_hash: PasswordHash,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: UserId::new(),
            username,
            email,
            password_hash,
            role: Role::User,
            profile: UserProfile::default(),
            rating: RatingSummary::empty(),
            warnings: Vec::new(),
            ban: None,
            created_at: timestamp,
            updated_at: timestamp,
            last_login_at: None,
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            profile: data.profile,
            rating: data.rating,
            warnings: data.warnings,
            ban: data.ban,
            created_at: data.created_at,
            updated_at: data.updated_at,
            last_login_at: data.last_login_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the login email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the stored password hash.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns `true` for administrators.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns the profile fields.
    #[must_use]
    pub const fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Returns the rating totals.
    #[must_use]
    pub const fn rating(&self) -> RatingSummary {
        self.rating
    }

    /// Returns the warnings, oldest first.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Returns the recorded ban, active or expired.
    #[must_use]
    pub const fn ban(&self) -> Option<&Ban> {
        self.ban.as_ref()
    }

    /// Returns the stored ban classification.
    #[must_use]
    pub fn ban_status(&self) -> BanStatus {
        self.ban.as_ref().map_or(BanStatus::None, Ban::status)
    }

    /// Returns the ban that blocks access at `now`, if any.
    #[must_use]
    pub fn active_ban(&self, now: DateTime<Utc>) -> Option<&Ban> {
        self.ban.as_ref().filter(|ban| ban.is_active_at(now))
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the last successful login.
    #[must_use]
    pub const fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    /// Replaces the profile fields.
    pub fn update_profile(&mut self, profile: UserProfile, clock: &impl Clock) {
        self.profile = profile;
        self.touch(clock);
    }

    /// Changes the role.
    pub fn set_role(&mut self, role: Role, clock: &impl Clock) {
        self.role = role;
        self.touch(clock);
    }

    /// Stamps a successful login.
    pub fn record_login(&mut self, clock: &impl Clock) {
        self.record_login_at(clock.utc());
    }

    /// Stamps a successful login at `at`.
    pub const fn record_login_at(&mut self, at: DateTime<Utc>) {
        self.last_login_at = Some(at);
        self.updated_at = at;
    }

    /// Replaces the rating totals.
    pub fn apply_rating_summary(&mut self, summary: RatingSummary, clock: &impl Clock) {
        self.apply_rating_summary_at(summary, clock.utc());
    }

    /// Replaces the rating totals at `at`.
    pub const fn apply_rating_summary_at(&mut self, summary: RatingSummary, at: DateTime<Utc>) {
        self.rating = summary;
        self.updated_at = at;
    }

    /// Takes the rating totals and last login time from `stored`.
    ///
    /// Whole-record updates use this so they never roll back counters
    /// written since the record was read.
    #[must_use]
    pub const fn with_counters_of(mut self, stored: &Self) -> Self {
        self.rating = stored.rating;
        self.last_login_at = stored.last_login_at;
        self
    }

    /// Appends a warning.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::EmptyReason`] when `reason` is blank.
    pub fn issue_warning(
        &mut self,
        reason: impl Into<String>,
        issued_by: UserId,
        clock: &impl Clock,
    ) -> Result<Warning, AccountDomainError> {
        let warning = Warning::new(reason, issued_by, clock.utc())?;
        self.warnings.push(warning.clone());
        self.touch(clock);
        Ok(warning)
    }

    /// Removes a warning.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::WarningNotFound`] when the user has no
    /// warning with that identifier.
    pub fn remove_warning(
        &mut self,
        warning_id: WarningId,
        clock: &impl Clock,
    ) -> Result<Warning, AccountDomainError> {
        let position = self
            .warnings
            .iter()
            .position(|warning| warning.id() == warning_id)
            .ok_or(AccountDomainError::WarningNotFound(warning_id))?;
        let removed = self.warnings.remove(position);
        self.touch(clock);
        Ok(removed)
    }

    /// Bans the user for `days` from now.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::CannotBanAdmin`] for administrators and
    /// [`AccountDomainError::EmptyReason`] for a blank reason.
    pub fn ban_temporarily(
        &mut self,
        reason: impl Into<String>,
        days: BanDays,
        banned_by: UserId,
        clock: &impl Clock,
    ) -> Result<(), AccountDomainError> {
        let now = clock.utc();
        let until = now
            .checked_add_signed(days.duration())
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.apply_ban(BanKind::Temporary { until }, reason, banned_by, clock)
    }

    /// Bans the user until an administrator lifts the ban.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::CannotBanAdmin`] for administrators and
    /// [`AccountDomainError::EmptyReason`] for a blank reason.
    pub fn ban_permanently(
        &mut self,
        reason: impl Into<String>,
        banned_by: UserId,
        clock: &impl Clock,
    ) -> Result<(), AccountDomainError> {
        self.apply_ban(BanKind::Permanent, reason, banned_by, clock)
    }

    /// Clears every ban field.
    pub fn unban(&mut self, clock: &impl Clock) {
        self.ban = None;
        self.touch(clock);
    }

    /// Returns the publicly visible projection.
    #[must_use]
    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile {
            username: self.username.clone(),
            first_name: self.profile.first_name().map(str::to_owned),
            last_name: self.profile.last_name().map(str::to_owned),
            member_since: self.created_at.date_naive(),
            rating: self.rating,
        }
    }

    fn apply_ban(
        &mut self,
        kind: BanKind,
        reason: impl Into<String>,
        banned_by: UserId,
        clock: &impl Clock,
    ) -> Result<(), AccountDomainError> {
        if self.is_admin() {
            return Err(AccountDomainError::CannotBanAdmin(self.id));
        }
        self.ban = Some(Ban::new(kind, reason, banned_by, clock.utc())?);
        self.touch(clock);
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Fields any visitor may see on a profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfile {
    /// Public handle.
    pub username: Username,
    /// First name, if set.
    pub first_name: Option<String>,
    /// Last name, if set.
    pub last_name: Option<String>,
    /// Registration date.
    pub member_since: NaiveDate,
    /// Rating totals.
    pub rating: RatingSummary,
}

impl PublicProfile {
    /// Returns the first name, falling back to the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .unwrap_or_else(|| self.username.as_str())
    }
}
