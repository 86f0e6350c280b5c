//! Shared world state for task marketplace BDD scenarios.

use std::collections::HashMap;

use crate::test_helpers::Marketplace;
use rstest::fixture;
use taskboard::access::AdminActor;
use taskboard::account::domain::UserId;
use taskboard::task::{
    domain::{Response, Task},
    services::TaskLifecycleError,
};

/// Scenario world for marketplace behaviour tests.
pub struct MarketplaceWorld {
    pub marketplace: Marketplace,
    pub admin: Option<AdminActor>,
    pub members: HashMap<String, UserId>,
    pub task: Option<Task>,
    pub response: Option<Response>,
    pub last_response_result: Option<Result<Response, TaskLifecycleError>>,
}

impl MarketplaceWorld {
    /// Creates a world over an empty marketplace.
    #[must_use]
    pub fn new() -> Self {
        Self {
            marketplace: Marketplace::new(),
            admin: None,
            members: HashMap::new(),
            task: None,
            response: None,
            last_response_result: None,
        }
    }

    /// Looks up a member registered earlier in the scenario.
    pub fn member(&self, username: &str) -> Result<UserId, eyre::Report> {
        self.members
            .get(username)
            .copied()
            .ok_or_else(|| eyre::eyre!("member '{username}' was not registered in this scenario"))
    }

    /// Returns the scenario's moderator.
    pub fn admin(&self) -> Result<AdminActor, eyre::Report> {
        self.admin
            .ok_or_else(|| eyre::eyre!("missing moderator in scenario world"))
    }

    /// Returns the scenario's task.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }
}

impl Default for MarketplaceWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> MarketplaceWorld {
    MarketplaceWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
