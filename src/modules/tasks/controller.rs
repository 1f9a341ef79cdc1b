use hrdesk_core::Envelope;
use hrdesk_router::{HandlerResult, Reply, RequestContext};
use tracing::instrument;
use uuid::Uuid;

use super::model::{ChangeAssigneeDto, CreateTaskDto, UpdatePriorityDto, UpdateStatusDto};
use super::service::TaskService;
use crate::state::AppState;

#[instrument(skip_all)]
pub async fn create_task(ctx: RequestContext, state: AppState) -> HandlerResult {
    let dto: CreateTaskDto = ctx.validated_json()?;
    let task = TaskService::create_task(&state.db, dto).await?;
    Reply::created(&Envelope::with_message("Task created successfully", task))
}

#[instrument(skip_all)]
pub async fn list_tasks(_: RequestContext, state: AppState) -> HandlerResult {
    let tasks = TaskService::get_tasks(&state.db).await?;
    Reply::json(&Envelope::data(tasks))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn get_task(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    let task = TaskService::get_task(&state.db, id).await?;
    Reply::json(&Envelope::data(task))
}

#[instrument(skip_all, fields(project_id = ctx.param("project_id")))]
pub async fn list_for_project(ctx: RequestContext, state: AppState) -> HandlerResult {
    let project_id: Uuid = ctx.param_as("project_id")?;
    let tasks = TaskService::tasks_for_project(&state.db, project_id).await?;
    Reply::json(&Envelope::data(tasks))
}

#[instrument(skip_all, fields(user_id = ctx.param("user_id")))]
pub async fn list_for_user(ctx: RequestContext, state: AppState) -> HandlerResult {
    let user_id: Uuid = ctx.param_as("user_id")?;
    let tasks = TaskService::tasks_for_user(&state.db, user_id).await?;
    Reply::json(&Envelope::data(tasks))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn update_status(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    let dto: UpdateStatusDto = ctx.json()?;
    let task = TaskService::update_status(&state.db, id, dto.status).await?;
    Reply::json(&Envelope::with_message("Task status updated", task))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn update_priority(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    let dto: UpdatePriorityDto = ctx.json()?;
    let task = TaskService::update_priority(&state.db, id, dto.priority).await?;
    Reply::json(&Envelope::with_message("Task priority updated", task))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn change_assignee(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    let dto: ChangeAssigneeDto = ctx.json()?;
    let task = TaskService::change_assignee(&state.db, id, dto.new_user_id).await?;
    Reply::json(&Envelope::with_message("Task assignee updated", task))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn delete_task(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    TaskService::delete_task(&state.db, id).await?;
    Reply::json(&Envelope::message("Task deleted successfully"))
}
