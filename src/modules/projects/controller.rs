use hrdesk_core::Envelope;
use hrdesk_router::{HandlerResult, Reply, RequestContext};
use tracing::instrument;
use uuid::Uuid;

use super::model::{CreateProjectDto, SearchQuery, UpdateProjectDto};
use super::service::ProjectService;
use crate::state::AppState;

#[instrument(skip_all)]
pub async fn create_project(ctx: RequestContext, state: AppState) -> HandlerResult {
    let dto: CreateProjectDto = ctx.validated_json()?;
    let project = ProjectService::create_project(&state.db, dto).await?;
    Reply::created(&Envelope::with_message("Project created successfully", project))
}

#[instrument(skip_all)]
pub async fn list_projects(_: RequestContext, state: AppState) -> HandlerResult {
    let projects = ProjectService::get_projects(&state.db).await?;
    Reply::json(&Envelope::data(projects))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn get_project(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    let project = ProjectService::get_project(&state.db, id).await?;
    Reply::json(&Envelope::data(project))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn get_progress(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    let progress = ProjectService::progress(&state.db, id).await?;
    Reply::json(&Envelope::data(progress))
}

#[instrument(skip_all, fields(user_id = ctx.param("user_id")))]
pub async fn list_for_user(ctx: RequestContext, state: AppState) -> HandlerResult {
    let user_id: Uuid = ctx.param_as("user_id")?;
    let projects = ProjectService::projects_for_user(&state.db, user_id).await?;
    Reply::json(&Envelope::data(projects))
}

#[instrument(skip_all, fields(manager_id = ctx.param("manager_id")))]
pub async fn list_for_manager(ctx: RequestContext, state: AppState) -> HandlerResult {
    let manager_id: Uuid = ctx.param_as("manager_id")?;
    let projects = ProjectService::projects_for_manager(&state.db, manager_id).await?;
    Reply::json(&Envelope::data(projects))
}

#[instrument(skip_all)]
pub async fn search(ctx: RequestContext, state: AppState) -> HandlerResult {
    let query: SearchQuery = ctx.query()?;
    let projects = ProjectService::search_projects(&state.db, &query.name).await?;
    Reply::json(&Envelope::data(projects))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn update_project(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    let dto: UpdateProjectDto = ctx.validated_json()?;
    let project = ProjectService::update_project(&state.db, id, dto).await?;
    Reply::json(&Envelope::with_message("Project updated successfully", project))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn delete_project(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    ProjectService::delete_project(&state.db, id).await?;
    Reply::json(&Envelope::message("Project deleted successfully"))
}
