use hrdesk_core::Envelope;
use hrdesk_router::{HandlerResult, Reply, RequestContext};
use tracing::instrument;
use uuid::Uuid;

use super::model::{CreatePayrollDto, UpdatePayrollDto};
use super::renderer::HtmlPayslipRenderer;
use super::service::PayrollService;
use crate::state::AppState;

#[instrument(skip_all)]
pub async fn create_payroll(ctx: RequestContext, state: AppState) -> HandlerResult {
    let dto: CreatePayrollDto = ctx.validated_json()?;
    let payroll = PayrollService::create_payroll(&state.db, dto).await?;
    Reply::created(&Envelope::with_message("Payroll created successfully", payroll))
}

#[instrument(skip_all)]
pub async fn list_payrolls(_: RequestContext, state: AppState) -> HandlerResult {
    let payrolls = PayrollService::get_payrolls(&state.db).await?;
    Reply::json(&Envelope::data(payrolls))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn get_payroll(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    let payroll = PayrollService::get_payroll(&state.db, id).await?;
    Reply::json(&Envelope::data(payroll))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn update_payroll(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    let dto: UpdatePayrollDto = ctx.validated_json()?;
    let payroll = PayrollService::update_payroll(&state.db, id, dto).await?;
    Reply::json(&Envelope::with_message("Payroll updated successfully", payroll))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn delete_payroll(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    PayrollService::delete_payroll(&state.db, id).await?;
    Reply::json(&Envelope::message("Payroll deleted successfully"))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn export_payslip(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    let export = PayrollService::export_payslip(&state.db, id, &HtmlPayslipRenderer).await?;
    Reply::json(&export)
}
