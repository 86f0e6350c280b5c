//! When steps for task marketplace BDD scenarios.

use super::world::{MarketplaceWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskboard::rating::services::RateUserRequest;
use taskboard::task::domain::Response;

#[when(r#""{responder}" responds with "{message}""#)]
fn responds_with(
    world: &mut MarketplaceWorld,
    responder: String,
    message: String,
) -> Result<(), eyre::Report> {
    let responder_id = world.member(&responder)?;
    let task_id = world.task()?.id();
    let result = run_async(
        world
            .marketplace
            .lifecycle
            .respond(task_id, responder_id, &message),
    );
    if let Ok(ref response) = result {
        world.response = Some(response.clone());
    }
    world.last_response_result = Some(result);
    Ok(())
}

#[when(r#""{author}" accepts the response"#)]
fn accepts_response(world: &mut MarketplaceWorld, author: String) -> Result<(), eyre::Report> {
    let author_id = world.member(&author)?;
    let task_id = world.task()?.id();
    let response_id = world
        .response
        .as_ref()
        .map(Response::id)
        .ok_or_else(|| eyre::eyre!("missing response in scenario world"))?;
    let started = run_async(
        world
            .marketplace
            .lifecycle
            .accept_response(task_id, response_id, author_id),
    )
    .wrap_err("accept response")?;
    world.task = Some(started);
    Ok(())
}

#[when(r#""{author}" closes the task"#)]
fn closes_task(world: &mut MarketplaceWorld, author: String) -> Result<(), eyre::Report> {
    let author_id = world.member(&author)?;
    let task_id = world.task()?.id();
    let closed = run_async(world.marketplace.lifecycle.close_task(task_id, author_id))
        .wrap_err("close task")?;
    world.task = Some(closed);
    Ok(())
}

#[when(r#""{rater}" rates "{rated}" with {score:i64}"#)]
fn rates(
    world: &mut MarketplaceWorld,
    rater: String,
    rated: String,
    score: i64,
) -> Result<(), eyre::Report> {
    let rater_id = world.member(&rater)?;
    let rated_id = world.member(&rated)?;
    let task_id = world.task()?.id();
    run_async(world.marketplace.ratings.rate(
        task_id,
        rater_id,
        RateUserRequest::new(rated_id, score),
    ))
    .wrap_err("rate participant")?;
    Ok(())
}

#[when(r#"the moderator bans "{username}" for {days:i64} days"#)]
fn bans_member(
    world: &mut MarketplaceWorld,
    username: String,
    days: i64,
) -> Result<(), eyre::Report> {
    let user_id = world.member(&username)?;
    let admin = world.admin()?;
    run_async(world.marketplace.user_moderation.ban_temporarily(
        &admin,
        user_id,
        "Repeated spam",
        Some(days),
    ))
    .wrap_err("ban member")?;
    Ok(())
}
