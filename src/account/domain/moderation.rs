//! Warnings and bans issued by administrators.

use super::{AccountDomainError, ParseBanStatusError, UserId, WarningId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Moderation warning recorded against a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    id: WarningId,
    reason: String,
    issued_by: UserId,
    issued_at: DateTime<Utc>,
}

impl Warning {
    /// Creates a warning with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::EmptyReason`] when `reason` is blank.
    pub fn new(
        reason: impl Into<String>,
        issued_by: UserId,
        issued_at: DateTime<Utc>,
    ) -> Result<Self, AccountDomainError> {
        Ok(Self {
            id: WarningId::new(),
            reason: required_reason(reason)?,
            issued_by,
            issued_at,
        })
    }

    /// Reconstructs a warning from storage.
    #[must_use]
    pub const fn from_persisted(
        id: WarningId,
        reason: String,
        issued_by: UserId,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            reason,
            issued_by,
            issued_at,
        }
    }

    /// Returns the warning identifier.
    #[must_use]
    pub const fn id(&self) -> WarningId {
        self.id
    }

    /// Returns the reason text.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the issuing administrator.
    #[must_use]
    pub const fn issued_by(&self) -> UserId {
        self.issued_by
    }

    /// Returns when the warning was issued.
    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

/// Stored ban classification, used for filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BanStatus {
    /// No ban recorded.
    #[default]
    None,
    /// Ban with an expiry.
    Temporary,
    /// Ban without expiry.
    Permanent,
}

impl BanStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Temporary => "temporary",
            Self::Permanent => "permanent",
        }
    }
}

impl TryFrom<&str> for BanStatus {
    type Error = ParseBanStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "temporary" => Ok(Self::Temporary),
            "permanent" => Ok(Self::Permanent),
            _ => Err(ParseBanStatusError(value.to_owned())),
        }
    }
}

/// Duration class of a ban.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BanKind {
    /// Ban lifts automatically at `until`.
    Temporary {
        /// Expiry instant.
        until: DateTime<Utc>,
    },
    /// Ban stays until an administrator lifts it.
    Permanent,
}

/// Active or expired ban record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ban {
    kind: BanKind,
    reason: String,
    banned_by: UserId,
    banned_at: DateTime<Utc>,
}

impl Ban {
    /// Creates a ban record.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::EmptyReason`] when `reason` is blank.
    pub fn new(
        kind: BanKind,
        reason: impl Into<String>,
        banned_by: UserId,
        banned_at: DateTime<Utc>,
    ) -> Result<Self, AccountDomainError> {
        Ok(Self {
            kind,
            reason: required_reason(reason)?,
            banned_by,
            banned_at,
        })
    }

    /// Reconstructs a ban from storage.
    #[must_use]
    pub const fn from_persisted(
        kind: BanKind,
        reason: String,
        banned_by: UserId,
        banned_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            reason,
            banned_by,
            banned_at,
        }
    }

    /// Returns the ban kind.
    #[must_use]
    pub const fn kind(&self) -> BanKind {
        self.kind
    }

    /// Returns the stored status class.
    #[must_use]
    pub const fn status(&self) -> BanStatus {
        match self.kind {
            BanKind::Temporary { .. } => BanStatus::Temporary,
            BanKind::Permanent => BanStatus::Permanent,
        }
    }

    /// Returns the expiry of a temporary ban.
    #[must_use]
    pub const fn until(&self) -> Option<DateTime<Utc>> {
        match self.kind {
            BanKind::Temporary { until } => Some(until),
            BanKind::Permanent => None,
        }
    }

    /// Returns the reason text.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the administrator who issued the ban.
    #[must_use]
    pub const fn banned_by(&self) -> UserId {
        self.banned_by
    }

    /// Returns when the ban was issued.
    #[must_use]
    pub const fn banned_at(&self) -> DateTime<Utc> {
        self.banned_at
    }

    /// Returns `true` while the ban blocks access at `now`.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        match self.kind {
            BanKind::Temporary { until } => until > now,
            BanKind::Permanent => true,
        }
    }
}

/// Length of a temporary ban in days, 1 to 365.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BanDays(u16);

impl BanDays {
    const MAX: u16 = 365;

    /// Creates a validated ban length.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::InvalidBanDays`] outside 1..=365.
    pub fn new(days: i64) -> Result<Self, AccountDomainError> {
        u16::try_from(days)
            .ok()
            .filter(|value| (1..=Self::MAX).contains(value))
            .map(Self)
            .ok_or(AccountDomainError::InvalidBanDays(days))
    }

    /// Returns the number of days.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Returns the ban length as a duration.
    #[must_use]
    pub fn duration(self) -> Duration {
        Duration::days(i64::from(self.0))
    }
}

impl Default for BanDays {
    fn default() -> Self {
        Self(7)
    }
}

fn required_reason(reason: impl Into<String>) -> Result<String, AccountDomainError> {
    let raw = reason.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AccountDomainError::EmptyReason);
    }
    Ok(trimmed.to_owned())
}
