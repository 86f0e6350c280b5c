//! Operator-side role changes.

use super::{AccountError, AccountResult};
use crate::account::{
    domain::{Role, User, Username},
    ports::UserRepository,
};
use mockable::Clock;
use std::sync::Arc;

/// Grants and revokes the administrator role by username.
///
/// Used by the operator binary, which runs outside any session, so no
/// [`AdminActor`](crate::access::AdminActor) is required.
#[derive(Clone)]
pub struct RoleService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> RoleService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new role service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Sets the role of the user called `username`.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::UnknownUsername`] when nobody has that name.
    pub async fn set_role(&self, username: &str, role: Role) -> AccountResult<User> {
        let unknown = || AccountError::UnknownUsername(username.to_owned());
        let name = Username::new(username).map_err(|_| unknown())?;
        let mut user = self
            .repository
            .find_by_username(&name)
            .await?
            .ok_or_else(unknown)?;
        user.set_role(role, &*self.clock);
        self.repository.update(&user).await?;
        tracing::info!(user_id = %user.id(), role = role.as_str(), "role changed");
        Ok(user)
    }
}
