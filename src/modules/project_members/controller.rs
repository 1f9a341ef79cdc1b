use hrdesk_core::Envelope;
use hrdesk_router::{HandlerResult, Reply, RequestContext};
use tracing::instrument;
use uuid::Uuid;

use super::model::{MemberProjects, MembershipDto};
use super::service::ProjectMemberService;
use crate::state::AppState;

#[instrument(skip_all)]
pub async fn add_member(ctx: RequestContext, state: AppState) -> HandlerResult {
    let dto: MembershipDto = ctx.json()?;
    let member = ProjectMemberService::add_member(&state.db, dto).await?;
    Reply::created(&Envelope::with_message("Member added successfully", member))
}

#[instrument(skip_all)]
pub async fn remove_member(ctx: RequestContext, state: AppState) -> HandlerResult {
    let dto: MembershipDto = ctx.json()?;
    ProjectMemberService::remove_member(&state.db, dto).await?;
    Reply::json(&Envelope::message("Member removed successfully"))
}

#[instrument(skip_all)]
pub async fn list_members(_: RequestContext, state: AppState) -> HandlerResult {
    let members = ProjectMemberService::all_members(&state.db).await?;
    Reply::json(&Envelope::data(members))
}

#[instrument(skip_all, fields(project_id = ctx.param("project_id")))]
pub async fn project_members(ctx: RequestContext, state: AppState) -> HandlerResult {
    let project_id: Uuid = ctx.param_as("project_id")?;
    let members = ProjectMemberService::members_of(&state.db, project_id).await?;
    Reply::json(&Envelope::data(members))
}

#[instrument(skip_all, fields(user_id = ctx.param("user_id")))]
pub async fn member_projects(ctx: RequestContext, state: AppState) -> HandlerResult {
    let user_id: Uuid = ctx.param_as("user_id")?;
    let projects = ProjectMemberService::projects_of(&state.db, user_id).await?;
    Reply::json(&MemberProjects {
        success: true,
        count: projects.len(),
        data: projects,
    })
}
