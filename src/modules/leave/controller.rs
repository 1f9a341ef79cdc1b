use hrdesk_core::Envelope;
use hrdesk_router::{HandlerResult, Reply, RequestContext};
use tracing::instrument;

use super::model::{CreateLeaveRequestDto, InitializeBalanceDto, ProcessLeaveDto};
use super::service::LeaveService;
use crate::metrics::track_leave_processed;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[instrument(skip_all)]
pub async fn request_leave(ctx: RequestContext, state: AppState) -> HandlerResult {
    let auth = AuthUser::from_context(&ctx)?;
    let dto: CreateLeaveRequestDto = ctx.validated_json()?;
    let request = LeaveService::request_leave(&state.db, auth.user_id()?, dto).await?;
    Reply::created(&Envelope::with_message(
        "Leave request created successfully",
        request,
    ))
}

#[instrument(skip_all)]
pub async fn process_request(ctx: RequestContext, state: AppState) -> HandlerResult {
    let dto: ProcessLeaveDto = ctx.json()?;
    let request = LeaveService::process_request(&state.db, dto).await?;
    track_leave_processed(&request.status);
    Reply::json(&Envelope::with_message(
        "Leave request processed successfully",
        request,
    ))
}

#[instrument(skip_all)]
pub async fn get_balance(ctx: RequestContext, state: AppState) -> HandlerResult {
    let auth = AuthUser::from_context(&ctx)?;
    let balance = LeaveService::get_balance(&state.db, auth.user_id()?).await?;
    Reply::json(&Envelope::data(balance.total_days))
}

#[instrument(skip_all)]
pub async fn initialize_balance(ctx: RequestContext, state: AppState) -> HandlerResult {
    let dto: InitializeBalanceDto = ctx.validated_json()?;
    let balance = LeaveService::initialize_balance(&state.db, dto).await?;
    Reply::json(&Envelope::with_message(
        "Leave balance initialised successfully",
        balance,
    ))
}

#[instrument(skip_all)]
pub async fn list_requests(_: RequestContext, state: AppState) -> HandlerResult {
    let requests = LeaveService::all_requests(&state.db).await?;
    Reply::json(&Envelope::data(requests))
}

#[instrument(skip_all)]
pub async fn my_requests(ctx: RequestContext, state: AppState) -> HandlerResult {
    let auth = AuthUser::from_context(&ctx)?;
    let requests = LeaveService::requests_for_user(&state.db, auth.user_id()?).await?;
    Reply::json(&Envelope::data(requests))
}
