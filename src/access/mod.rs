//! Authentication and administrator gates.
//!
//! Callers resolve the session's user id and hand it to [`AccessGuard`],
//! which returns a proof value ([`Member`] or [`AdminActor`]) that the
//! services require. Only the guard can mint an [`AdminActor`].

use crate::account::{
    domain::{Role, UserId},
    ports::{UserRepository, UserRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by the access guard.
#[derive(Debug, Error)]
pub enum AccessError {
    /// No user is signed in.
    #[error("authentication required")]
    Unauthenticated,

    /// The session refers to an account that no longer exists.
    #[error("unknown user {0}")]
    UnknownUser(UserId),

    /// The account is banned. `until` is `None` for permanent bans.
    #[error("account is banned")]
    Banned {
        /// Expiry of a temporary ban.
        until: Option<DateTime<Utc>>,
    },

    /// The account lacks the administrator role.
    #[error("administrator role required")]
    Forbidden,

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

/// Result type for access checks.
pub type AccessResult<T> = Result<T, AccessError>;

/// Proof that a signed-in, unbanned user made the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    user_id: UserId,
    role: Role,
}

impl Member {
    /// Returns the member's identifier.
    #[must_use]
    pub const fn user_id(self) -> UserId {
        self.user_id
    }

    /// Returns the member's role.
    #[must_use]
    pub const fn role(self) -> Role {
        self.role
    }
}

/// Proof that an administrator made the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminActor {
    user_id: UserId,
}

impl AdminActor {
    /// Returns the administrator's identifier.
    #[must_use]
    pub const fn user_id(self) -> UserId {
        self.user_id
    }

    #[cfg(test)]
    pub(crate) const fn for_tests(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// Resolves session user ids into proof values.
#[derive(Clone)]
pub struct AccessGuard<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    users: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> AccessGuard<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a guard over the user repository.
    #[must_use]
    pub const fn new(users: Arc<R>, clock: Arc<C>) -> Self {
        Self { users, clock }
    }

    /// Requires a signed-in user who is not currently banned.
    ///
    /// An expired temporary ban does not block.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Unauthenticated`], [`AccessError::UnknownUser`]
    /// or [`AccessError::Banned`].
    pub async fn require_member(&self, session_user: Option<UserId>) -> AccessResult<Member> {
        let user_id = session_user.ok_or(AccessError::Unauthenticated)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AccessError::UnknownUser(user_id))?;

        if let Some(ban) = user.active_ban(self.clock.utc()) {
            tracing::warn!(user_id = %user_id, "banned user attempted access");
            return Err(AccessError::Banned { until: ban.until() });
        }

        Ok(Member {
            user_id,
            role: user.role(),
        })
    }

    /// Requires a signed-in administrator.
    ///
    /// # Errors
    ///
    /// Returns any [`require_member`](Self::require_member) error, or
    /// [`AccessError::Forbidden`] for non-administrators.
    pub async fn require_admin(&self, session_user: Option<UserId>) -> AccessResult<AdminActor> {
        let member = self.require_member(session_user).await?;
        if member.role != Role::Admin {
            tracing::warn!(user_id = %member.user_id, "non-admin attempted admin access");
            return Err(AccessError::Forbidden);
        }
        Ok(AdminActor {
            user_id: member.user_id,
        })
    }
}

#[cfg(test)]
mod tests;
