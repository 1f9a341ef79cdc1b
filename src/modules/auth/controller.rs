use hrdesk_router::{HandlerResult, Reply, RequestContext};
use tracing::instrument;

use super::model::LoginRequest;
use super::service::AuthService;
use crate::state::AppState;

#[instrument(skip_all)]
pub async fn login_user(ctx: RequestContext, state: AppState) -> HandlerResult {
    let dto: LoginRequest = ctx.validated_json()?;
    let response = AuthService::login_user(&state.db, dto, &state.jwt_config).await?;
    Reply::json(&response)
}
