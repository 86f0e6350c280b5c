//! Then steps for task marketplace BDD scenarios.

use super::world::{MarketplaceWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use taskboard::access::AccessError;
use taskboard::task::{
    domain::{TaskDomainError, TaskStatus},
    services::TaskLifecycleError,
};

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &MarketplaceWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.task()?;
    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            task.status()
        ));
    }
    Ok(())
}

#[then(r#""{username}" is the executor"#)]
fn is_the_executor(world: &MarketplaceWorld, username: String) -> Result<(), eyre::Report> {
    let user_id = world.member(&username)?;
    let task = world.task()?;
    if task.executor_id() != Some(user_id) {
        return Err(eyre::eyre!(
            "expected {username} to be the executor, found {:?}",
            task.executor_id()
        ));
    }
    Ok(())
}

fn refused_with(
    world: &MarketplaceWorld,
    expected: impl Fn(&TaskDomainError) -> bool,
) -> Result<(), eyre::Report> {
    let result = world
        .last_response_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing response result"))?;
    match result {
        Err(TaskLifecycleError::Domain(err)) if expected(err) => Ok(()),
        other => Err(eyre::eyre!("unexpected response outcome: {other:?}")),
    }
}

#[then("the response is refused because the task is not approved")]
fn refused_not_approved(world: &MarketplaceWorld) -> Result<(), eyre::Report> {
    refused_with(world, |err| {
        matches!(err, TaskDomainError::TaskNotApproved(_))
    })
}

#[then("the response is refused because it is the author's own task")]
fn refused_own_task(world: &MarketplaceWorld) -> Result<(), eyre::Report> {
    refused_with(world, |err| matches!(err, TaskDomainError::OwnTask(_)))
}

#[then(r#""{username}" has {count:u32} rating averaging "{average}""#)]
fn has_rating_summary(
    world: &MarketplaceWorld,
    username: String,
    count: u32,
    average: String,
) -> Result<(), eyre::Report> {
    let received = run_async(world.marketplace.ratings.user_ratings(&username))
        .wrap_err("load received ratings")?;
    let summary = received.summary;
    let shown = summary.average().map(|value| value.to_string());
    if summary.total() != count || shown.as_deref() != Some(average.as_str()) {
        return Err(eyre::eyre!(
            "expected {count} rating(s) averaging {average}, found {} averaging {shown:?}",
            summary.total()
        ));
    }
    Ok(())
}

#[then(r#""{username}" is refused a session"#)]
fn is_refused_a_session(world: &MarketplaceWorld, username: String) -> Result<(), eyre::Report> {
    let user_id = world.member(&username)?;
    let outcome = run_async(world.marketplace.guard.require_member(Some(user_id)));
    if !matches!(outcome, Err(AccessError::Banned { until: Some(_) })) {
        return Err(eyre::eyre!("expected a temporary ban, got {outcome:?}"));
    }
    Ok(())
}
