use hrdesk_core::Envelope;
use hrdesk_router::{HandlerResult, Reply, RequestContext};
use tracing::instrument;

use super::model::{CheckInDto, CheckOutDto, HistoryQuery};
use super::service::AttendanceService;
use crate::metrics::track_check_in;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[instrument(skip_all)]
pub async fn check_in(ctx: RequestContext, state: AppState) -> HandlerResult {
    let auth = AuthUser::from_context(&ctx)?;
    let dto: CheckInDto = ctx.json()?;
    let record = AttendanceService::check_in(&state.db, auth.user_id()?, dto).await?;
    track_check_in(&record.status);
    Reply::json(&Envelope::with_message("Checked in successfully", record))
}

#[instrument(skip_all)]
pub async fn check_out(ctx: RequestContext, state: AppState) -> HandlerResult {
    let auth = AuthUser::from_context(&ctx)?;
    let dto: CheckOutDto = if ctx.body.is_empty() {
        CheckOutDto::default()
    } else {
        ctx.json()?
    };
    let result = AttendanceService::check_out(&state.db, auth.user_id()?, dto).await?;
    Reply::json(&Envelope::with_message("Checked out successfully", result))
}

#[instrument(skip_all)]
pub async fn current_user_status(ctx: RequestContext, state: AppState) -> HandlerResult {
    let auth = AuthUser::from_context(&ctx)?;
    let status = AttendanceService::current_status(&state.db, auth.user_id()?).await?;
    Reply::json(&Envelope::data(status))
}

#[instrument(skip_all)]
pub async fn history(ctx: RequestContext, state: AppState) -> HandlerResult {
    let auth = AuthUser::from_context(&ctx)?;
    let filter: HistoryQuery = ctx.query()?;
    let entries = AttendanceService::history(&state.db, auth.user_id()?, filter).await?;
    Reply::json(&Envelope::data(entries))
}

#[instrument(skip_all)]
pub async fn today(_: RequestContext, state: AppState) -> HandlerResult {
    let entries = AttendanceService::for_day(&state.db, AttendanceService::today()).await?;
    Reply::json(&Envelope::data(entries))
}
