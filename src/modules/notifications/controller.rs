use hrdesk_core::Envelope;
use hrdesk_router::{HandlerResult, Reply, RequestContext};
use tracing::instrument;
use uuid::Uuid;

use super::service::NotificationService;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[instrument(skip_all)]
pub async fn list_notifications(ctx: RequestContext, state: AppState) -> HandlerResult {
    let auth = AuthUser::from_context(&ctx)?;
    let notifications = NotificationService::for_user(&state.db, auth.user_id()?).await?;
    Reply::json(&Envelope::data(notifications))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn mark_read(ctx: RequestContext, state: AppState) -> HandlerResult {
    let auth = AuthUser::from_context(&ctx)?;
    let id: Uuid = ctx.param_as("id")?;
    let notification = NotificationService::mark_read(&state.db, id, auth.user_id()?).await?;
    Reply::json(&Envelope::with_message(
        "Notification marked as read",
        notification,
    ))
}
