//! Given steps for task marketplace BDD scenarios.

use super::world::{MarketplaceWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::catalog::domain::CategoryId;
use taskboard::task::services::CreateTaskRequest;

#[given(r#"a moderator "{username}""#)]
fn a_moderator(world: &mut MarketplaceWorld, username: String) -> Result<(), eyre::Report> {
    let admin = run_async(world.marketplace.admin(&username)).wrap_err("promote moderator")?;
    world.members.insert(username, admin.user_id());
    world.admin = Some(admin);
    Ok(())
}

#[given(r#"a member "{username}""#)]
fn a_member(world: &mut MarketplaceWorld, username: String) -> Result<(), eyre::Report> {
    let user = run_async(world.marketplace.register(&username)).wrap_err("register member")?;
    world.members.insert(username, user.id());
    Ok(())
}

#[given(r#""{author}" has posted a task "{title}""#)]
fn has_posted_task(
    world: &mut MarketplaceWorld,
    author: String,
    title: String,
) -> Result<(), eyre::Report> {
    let author_id = world.member(&author)?;
    let request = CreateTaskRequest::new(title, "Details to follow", CategoryId::new());
    let task = run_async(world.marketplace.lifecycle.create_task(author_id, request))
        .wrap_err("post task")?;
    world.task = Some(task);
    Ok(())
}

#[given(r#""{author}" has an approved task "{title}""#)]
fn has_approved_task(
    world: &mut MarketplaceWorld,
    author: String,
    title: String,
) -> Result<(), eyre::Report> {
    let author_id = world.member(&author)?;
    let admin = world.admin()?;
    let task = run_async(world.marketplace.approved_task(&admin, author_id, &title))
        .wrap_err("post and approve task")?;
    world.task = Some(task);
    Ok(())
}

#[given(r#""{executor}" is working on the task"#)]
fn is_working_on_task(world: &mut MarketplaceWorld, executor: String) -> Result<(), eyre::Report> {
    let executor_id = world.member(&executor)?;
    let task = world.task()?.clone();
    let lifecycle = &world.marketplace.lifecycle;
    let response = run_async(lifecycle.respond(task.id(), executor_id, "Ready when you are"))
        .wrap_err("respond to task")?;
    let started = run_async(lifecycle.accept_response(task.id(), response.id(), task.author_id()))
        .wrap_err("accept response")?;
    world.response = Some(response);
    world.task = Some(started);
    Ok(())
}
