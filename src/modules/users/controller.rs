use hrdesk_core::Envelope;
use hrdesk_router::{HandlerResult, Reply, RequestContext};
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    ChangePasswordDto, CreateUserDto, STATUS_ACTIVE, STATUS_INACTIVE, UpdateUserDto,
};
use super::service::UserService;
use crate::metrics::track_user_created;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[instrument(skip_all)]
pub async fn list_users(_: RequestContext, state: AppState) -> HandlerResult {
    let users = UserService::get_users(&state.db).await?;
    Reply::json(&Envelope::data(users))
}

#[instrument(skip_all)]
pub async fn list_blocked_users(_: RequestContext, state: AppState) -> HandlerResult {
    let users = UserService::get_blocked_users(&state.db).await?;
    Reply::json(&Envelope::data(users))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn get_user(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    let user = UserService::get_user(&state.db, id).await?;
    Reply::json(&Envelope::data(user))
}

#[instrument(skip_all)]
pub async fn get_me(ctx: RequestContext, state: AppState) -> HandlerResult {
    let auth = AuthUser::from_context(&ctx)?;
    let user = UserService::get_user(&state.db, auth.user_id()?).await?;
    Reply::json(&Envelope::data(user))
}

#[instrument(skip_all)]
pub async fn change_password(ctx: RequestContext, state: AppState) -> HandlerResult {
    let auth = AuthUser::from_context(&ctx)?;
    let dto: ChangePasswordDto = ctx.validated_json()?;
    UserService::change_password(&state.db, auth.user_id()?, dto).await?;
    Reply::json(&Envelope::message("Password updated successfully"))
}

#[instrument(skip_all)]
pub async fn register_user(ctx: RequestContext, state: AppState) -> HandlerResult {
    let dto: CreateUserDto = ctx.validated_json()?;
    let user = UserService::create_user(&state.db, dto).await?;
    track_user_created(&user.role);
    Reply::created(&Envelope::with_message("User created successfully", user))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn update_user(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    let dto: UpdateUserDto = ctx.validated_json()?;
    let user = UserService::update_user(&state.db, id, dto).await?;
    Reply::json(&Envelope::with_message("User updated successfully", user))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn delete_user(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    UserService::delete_user(&state.db, id).await?;
    Reply::json(&Envelope::message("User deleted successfully"))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn block_user(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    UserService::set_status(&state.db, id, STATUS_INACTIVE).await?;
    Reply::json(&Envelope::message("User blocked successfully"))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn unblock_user(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    UserService::set_status(&state.db, id, STATUS_ACTIVE).await?;
    Reply::json(&Envelope::message("User unblocked successfully"))
}
