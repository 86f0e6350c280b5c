//! Behaviour tests for the task marketplace flow.

mod test_helpers;

#[path = "task_marketplace_steps/mod.rs"]
mod task_marketplace_steps_defs;

use rstest_bdd_macros::scenario;
use task_marketplace_steps_defs::world::{MarketplaceWorld, world};

#[scenario(
    path = "tests/features/task_marketplace.feature",
    name = "An approved task is handed to a responder"
)]
#[tokio::test(flavor = "multi_thread")]
async fn approved_task_is_handed_to_responder(world: MarketplaceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_marketplace.feature",
    name = "A task awaiting moderation refuses responses"
)]
#[tokio::test(flavor = "multi_thread")]
async fn pending_task_refuses_responses(world: MarketplaceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_marketplace.feature",
    name = "Authors cannot respond to their own task"
)]
#[tokio::test(flavor = "multi_thread")]
async fn authors_cannot_respond_to_own_task(world: MarketplaceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_marketplace.feature",
    name = "Participants rate each other once the task is closed"
)]
#[tokio::test(flavor = "multi_thread")]
async fn participants_rate_each_other(world: MarketplaceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_marketplace.feature",
    name = "A banned member is turned away"
)]
#[tokio::test(flavor = "multi_thread")]
async fn banned_member_is_turned_away(world: MarketplaceWorld) {
    let _ = world;
}
