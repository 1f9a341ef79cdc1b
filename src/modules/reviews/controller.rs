use hrdesk_core::Envelope;
use hrdesk_router::{HandlerResult, Reply, RequestContext};
use tracing::instrument;
use uuid::Uuid;

use super::model::{CreateReviewDto, StatsPeriod, UpdateReviewDto};
use super::service::ReviewService;
use crate::state::AppState;

#[instrument(skip_all)]
pub async fn create_review(ctx: RequestContext, state: AppState) -> HandlerResult {
    let dto: CreateReviewDto = ctx.validated_json()?;
    let review = ReviewService::create_review(&state.db, dto).await?;
    Reply::created(&Envelope::with_message(
        "Performance review created successfully",
        review,
    ))
}

#[instrument(skip_all)]
pub async fn list_reviews(_: RequestContext, state: AppState) -> HandlerResult {
    let reviews = ReviewService::get_reviews(&state.db).await?;
    Reply::json(&Envelope::data(reviews))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn get_review(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    let review = ReviewService::get_review(&state.db, id).await?;
    Reply::json(&Envelope::data(review))
}

#[instrument(skip_all, fields(user_id = ctx.param("user_id")))]
pub async fn list_for_user(ctx: RequestContext, state: AppState) -> HandlerResult {
    let user_id: Uuid = ctx.param_as("user_id")?;
    let reviews = ReviewService::reviews_for_user(&state.db, user_id).await?;
    Reply::json(&Envelope::data(reviews))
}

#[instrument(skip_all, fields(reviewer_id = ctx.param("reviewer_id")))]
pub async fn list_by_reviewer(ctx: RequestContext, state: AppState) -> HandlerResult {
    let reviewer_id: Uuid = ctx.param_as("reviewer_id")?;
    let reviews = ReviewService::reviews_by_reviewer(&state.db, reviewer_id).await?;
    Reply::json(&Envelope::data(reviews))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn update_review(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    let dto: UpdateReviewDto = ctx.validated_json()?;
    let review = ReviewService::update_review(&state.db, id, dto).await?;
    Reply::json(&Envelope::with_message(
        "Performance review updated successfully",
        review,
    ))
}

#[instrument(skip_all, fields(id = ctx.param("id")))]
pub async fn delete_review(ctx: RequestContext, state: AppState) -> HandlerResult {
    let id: Uuid = ctx.param_as("id")?;
    ReviewService::delete_review(&state.db, id).await?;
    Reply::json(&Envelope::message("Performance review deleted successfully"))
}

#[instrument(skip_all)]
pub async fn monthly_stats(ctx: RequestContext, state: AppState) -> HandlerResult {
    let period = StatsPeriod::monthly(ctx.param_as("year")?, ctx.param_as("month")?)?;
    let stats = ReviewService::stats(&state.db, period).await?;
    Reply::json(&Envelope::data(stats))
}

#[instrument(skip_all)]
pub async fn quarterly_stats(ctx: RequestContext, state: AppState) -> HandlerResult {
    let period = StatsPeriod::quarterly(ctx.param_as("year")?, ctx.param_as("quarter")?)?;
    let stats = ReviewService::stats(&state.db, period).await?;
    Reply::json(&Envelope::data(stats))
}

#[instrument(skip_all)]
pub async fn yearly_stats(ctx: RequestContext, state: AppState) -> HandlerResult {
    let period = StatsPeriod::yearly(ctx.param_as("year")?);
    let stats = ReviewService::stats(&state.db, period).await?;
    Reply::json(&Envelope::data(stats))
}
