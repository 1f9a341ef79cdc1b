use anyhow::Context;
use hrdesk_core::AppError;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    CreateReviewDto, PerformanceReview, ReviewStats, StatsPeriod, UpdateReviewDto,
};

const REVIEW_COLUMNS: &str =
    "id, user_id, review_period, score, reviewer_id, comments, created_at";

fn review_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Performance review not found"))
}

pub struct ReviewService;

impl ReviewService {
    #[instrument(skip(db, dto), fields(user_id = %dto.user_id, reviewer_id = %dto.reviewer_id))]
    pub async fn create_review(
        db: &PgPool,
        dto: CreateReviewDto,
    ) -> Result<PerformanceReview, AppError> {
        let query = format!(
            "INSERT INTO performance_reviews (user_id, review_period, score, reviewer_id, comments) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {REVIEW_COLUMNS}"
        );
        sqlx::query_as::<_, PerformanceReview>(&query)
            .bind(dto.user_id)
            .bind(&dto.review_period)
            .bind(dto.score)
            .bind(dto.reviewer_id)
            .bind(&dto.comments)
            .fetch_one(db)
            .await
            .context("Failed to create performance review")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_reviews(db: &PgPool) -> Result<Vec<PerformanceReview>, AppError> {
        let query =
            format!("SELECT {REVIEW_COLUMNS} FROM performance_reviews ORDER BY created_at DESC");
        sqlx::query_as::<_, PerformanceReview>(&query)
            .fetch_all(db)
            .await
            .context("Failed to fetch performance reviews")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_review(db: &PgPool, id: Uuid) -> Result<PerformanceReview, AppError> {
        let query = format!("SELECT {REVIEW_COLUMNS} FROM performance_reviews WHERE id = $1");
        sqlx::query_as::<_, PerformanceReview>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch performance review")
            .map_err(AppError::database)?
            .ok_or_else(review_not_found)
    }

    #[instrument(skip(db))]
    pub async fn reviews_for_user(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<PerformanceReview>, AppError> {
        let query = format!(
            "SELECT {REVIEW_COLUMNS} FROM performance_reviews \
             WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, PerformanceReview>(&query)
            .bind(user_id)
            .fetch_all(db)
            .await
            .context("Failed to fetch performance reviews")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn reviews_by_reviewer(
        db: &PgPool,
        reviewer_id: Uuid,
    ) -> Result<Vec<PerformanceReview>, AppError> {
        let query = format!(
            "SELECT {REVIEW_COLUMNS} FROM performance_reviews \
             WHERE reviewer_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, PerformanceReview>(&query)
            .bind(reviewer_id)
            .fetch_all(db)
            .await
            .context("Failed to fetch performance reviews")
            .map_err(AppError::database)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_review(
        db: &PgPool,
        id: Uuid,
        dto: UpdateReviewDto,
    ) -> Result<PerformanceReview, AppError> {
        let query = format!(
            "UPDATE performance_reviews SET \
             score = COALESCE($2, score), \
             review_period = COALESCE($3, review_period), \
             comments = COALESCE($4, comments) \
             WHERE id = $1 RETURNING {REVIEW_COLUMNS}"
        );
        sqlx::query_as::<_, PerformanceReview>(&query)
            .bind(id)
            .bind(dto.score)
            .bind(&dto.review_period)
            .bind(&dto.comments)
            .fetch_optional(db)
            .await
            .context("Failed to update performance review")
            .map_err(AppError::database)?
            .ok_or_else(review_not_found)
    }

    #[instrument(skip(db))]
    pub async fn delete_review(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM performance_reviews WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete performance review")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(review_not_found());
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn stats(db: &PgPool, period: StatsPeriod) -> Result<ReviewStats, AppError> {
        let (start, end) = period.time_range()?;
        sqlx::query_as::<_, ReviewStats>(
            "SELECT COUNT(*) AS total_reviews, \
                    AVG(score)::float8 AS average_score, \
                    MIN(score) AS min_score, \
                    MAX(score) AS max_score \
             FROM performance_reviews \
             WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(db)
        .await
        .context("Failed to compute review stats")
        .map_err(AppError::database)
    }
}
