use anyhow::Context;
use hrdesk_core::AppError;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    CreateLeaveRequestDto, DEFAULT_LEAVE_DAYS, InitializeBalanceDto, LeaveBalance, LeaveDecision,
    LeaveRequest, LeaveRequestWithUser, PENDING, ProcessLeaveDto, leave_days,
};

const REQUEST_COLUMNS: &str = "id, user_id, leave_type, start_date, end_date, reason, \
    custom_reason, status, reject_reason, created_at";
const JOINED_COLUMNS: &str = "r.id, r.user_id, r.leave_type, r.start_date, r.end_date, r.reason, \
    r.custom_reason, r.status, r.reject_reason, r.created_at, \
    u.full_name, u.email, u.department, u.position";

fn insufficient_balance() -> AppError {
    AppError::bad_request(anyhow::anyhow!("Insufficient leave balance"))
}

pub struct LeaveService;

impl LeaveService {
    /// Balance of the user, created with the default allowance on first use.
    #[instrument(skip(db))]
    pub async fn get_balance(db: &PgPool, user_id: Uuid) -> Result<LeaveBalance, AppError> {
        sqlx::query(
            "INSERT INTO leave_balance (user_id, total_days) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(DEFAULT_LEAVE_DAYS)
        .execute(db)
        .await
        .context("Failed to initialise leave balance")
        .map_err(AppError::database)?;

        sqlx::query_as::<_, LeaveBalance>(
            "SELECT user_id, total_days FROM leave_balance WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(db)
        .await
        .context("Failed to fetch leave balance")
        .map_err(AppError::database)
    }

    #[instrument(skip(db, dto))]
    pub async fn request_leave(
        db: &PgPool,
        user_id: Uuid,
        dto: CreateLeaveRequestDto,
    ) -> Result<LeaveRequest, AppError> {
        let days = leave_days(dto.start_date, dto.end_date)?;
        let balance = Self::get_balance(db, user_id).await?;

        if i64::from(balance.total_days) < days {
            return Err(insufficient_balance());
        }

        let query = format!(
            "INSERT INTO leave_requests \
             (user_id, leave_type, start_date, end_date, reason, custom_reason, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {REQUEST_COLUMNS}"
        );

        sqlx::query_as::<_, LeaveRequest>(&query)
            .bind(user_id)
            .bind(&dto.leave_type)
            .bind(dto.start_date)
            .bind(dto.end_date)
            .bind(&dto.reason)
            .bind(&dto.custom_reason)
            .bind(PENDING)
            .fetch_one(db)
            .await
            .context("Failed to create leave request")
            .map_err(AppError::database)
    }

    /// Approves or rejects a pending request.
    ///
    /// Approval re-checks and deducts the balance in the same transaction as
    /// the status change.
    #[instrument(skip(db, dto), fields(request_id = %dto.request_id, decision = dto.status.as_str()))]
    pub async fn process_request(
        db: &PgPool,
        dto: ProcessLeaveDto,
    ) -> Result<LeaveRequest, AppError> {
        dto.validate_reason()?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let query = format!("SELECT {REQUEST_COLUMNS} FROM leave_requests WHERE id = $1 FOR UPDATE");
        let request = sqlx::query_as::<_, LeaveRequest>(&query)
            .bind(dto.request_id)
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to fetch leave request")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Leave request not found")))?;

        if request.status != PENDING {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Leave request has already been processed"
            )));
        }

        if dto.status == LeaveDecision::Approved {
            let balance: i32 = sqlx::query_scalar(
                "SELECT total_days FROM leave_balance WHERE user_id = $1 FOR UPDATE",
            )
            .bind(request.user_id)
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to fetch leave balance")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Leave balance not found")))?;

            let days = request.days();
            if i64::from(balance) < days {
                return Err(insufficient_balance());
            }

            sqlx::query("UPDATE leave_balance SET total_days = total_days - $2 WHERE user_id = $1")
                .bind(request.user_id)
                .bind(days as i32)
                .execute(&mut *tx)
                .await
                .context("Failed to deduct leave balance")
                .map_err(AppError::database)?;
        }

        let reject_reason = match dto.status {
            LeaveDecision::Rejected => dto.reject_reason,
            LeaveDecision::Approved => None,
        };

        let query = format!(
            "UPDATE leave_requests SET status = $2, reject_reason = $3 \
             WHERE id = $1 RETURNING {REQUEST_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, LeaveRequest>(&query)
            .bind(request.id)
            .bind(dto.status.as_str())
            .bind(reject_reason)
            .fetch_one(&mut *tx)
            .await
            .context("Failed to update leave request")
            .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit leave decision")
            .map_err(AppError::database)?;

        Ok(updated)
    }

    #[instrument(skip(db, dto), fields(user_id = %dto.user_id))]
    pub async fn initialize_balance(
        db: &PgPool,
        dto: InitializeBalanceDto,
    ) -> Result<LeaveBalance, AppError> {
        sqlx::query_as::<_, LeaveBalance>(
            "INSERT INTO leave_balance (user_id, total_days) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET total_days = EXCLUDED.total_days \
             RETURNING user_id, total_days",
        )
        .bind(dto.user_id)
        .bind(dto.initial_days.unwrap_or(DEFAULT_LEAVE_DAYS))
        .fetch_one(db)
        .await
        .context("Failed to initialise leave balance")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn requests_for_user(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<LeaveRequest>, AppError> {
        let query = format!(
            "SELECT {REQUEST_COLUMNS} FROM leave_requests WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, LeaveRequest>(&query)
            .bind(user_id)
            .fetch_all(db)
            .await
            .context("Failed to fetch leave requests")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn all_requests(db: &PgPool) -> Result<Vec<LeaveRequestWithUser>, AppError> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM leave_requests r \
             LEFT JOIN users u ON r.user_id = u.id \
             ORDER BY r.created_at DESC"
        );
        sqlx::query_as::<_, LeaveRequestWithUser>(&query)
            .fetch_all(db)
            .await
            .context("Failed to fetch leave requests")
            .map_err(AppError::database)
    }
}
