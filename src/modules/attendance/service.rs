use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveDateTime};
use hrdesk_core::AppError;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    Attendance, AttendanceWithUser, CheckInDto, CheckOutDto, CheckOutResult, CurrentStatus,
    HistoryEntry, HistoryQuery, check_in_status, format_duration, merge_checkout_location,
};

const ATTENDANCE_COLUMNS: &str = "id, user_id, status, check_in_time, check_out_time, gps_location";
const JOINED_COLUMNS: &str = "a.id, a.user_id, a.status, a.check_in_time, a.check_out_time, \
    a.gps_location, u.full_name, u.department, u.position";

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub struct AttendanceService;

impl AttendanceService {
    #[instrument(skip(db, dto))]
    pub async fn check_in(
        db: &PgPool,
        user_id: Uuid,
        dto: CheckInDto,
    ) -> Result<Attendance, AppError> {
        let location = dto.gps_location.ok_or_else(|| {
            AppError::bad_request(anyhow::anyhow!("Valid GPS location object is required"))
        })?;

        let checked_in_at = now();
        let status = check_in_status(checked_in_at);

        let query = format!(
            "INSERT INTO attendance (user_id, status, check_in_time, gps_location) \
             VALUES ($1, $2, $3, $4) RETURNING {ATTENDANCE_COLUMNS}"
        );

        let record = sqlx::query_as::<_, Attendance>(&query)
            .bind(user_id)
            .bind(status)
            .bind(checked_in_at)
            .bind(location.to_value())
            .fetch_one(db)
            .await
            .context("Failed to create attendance record")
            .map_err(AppError::database)?;

        tracing::info!(attendance_id = %record.id, status, "Check-in recorded");
        Ok(record)
    }

    /// Closes the most recent open record of the user.
    #[instrument(skip(db, dto))]
    pub async fn check_out(
        db: &PgPool,
        user_id: Uuid,
        dto: CheckOutDto,
    ) -> Result<CheckOutResult, AppError> {
        let query = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance \
             WHERE user_id = $1 AND check_out_time IS NULL \
             ORDER BY check_in_time DESC LIMIT 1"
        );

        let open = sqlx::query_as::<_, Attendance>(&query)
            .bind(user_id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch open attendance record")
            .map_err(AppError::database)?
            .ok_or_else(|| {
                AppError::bad_request(anyhow::anyhow!(
                    "No active check-in found. Please check in first."
                ))
            })?;

        let location = match dto.gps_location {
            Some(checkout) => Some(merge_checkout_location(open.gps_location, checkout)),
            None => open.gps_location,
        };

        let query = format!(
            "UPDATE attendance SET check_out_time = $2, gps_location = $3 \
             WHERE id = $1 RETURNING {ATTENDANCE_COLUMNS}"
        );

        let attendance = sqlx::query_as::<_, Attendance>(&query)
            .bind(open.id)
            .bind(now())
            .bind(location)
            .fetch_one(db)
            .await
            .context("Failed to update attendance record")
            .map_err(AppError::database)?;

        let duration_seconds = attendance
            .check_out_time
            .map(|out| (out - attendance.check_in_time).num_seconds())
            .unwrap_or_default();

        Ok(CheckOutResult {
            duration: format_duration(duration_seconds),
            duration_seconds,
            attendance,
        })
    }

    #[instrument(skip(db))]
    pub async fn current_status(db: &PgPool, user_id: Uuid) -> Result<CurrentStatus, AppError> {
        let today = Local::now().date_naive();
        let query = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance \
             WHERE user_id = $1 AND check_in_time >= $2 AND check_in_time < $2 + INTERVAL '1 day' \
             ORDER BY check_in_time DESC LIMIT 1"
        );

        let latest = sqlx::query_as::<_, Attendance>(&query)
            .bind(user_id)
            .bind(today)
            .fetch_optional(db)
            .await
            .context("Failed to fetch today's attendance")
            .map_err(AppError::database)?;

        Ok(CurrentStatus::from_latest(latest, today))
    }

    #[instrument(skip(db))]
    pub async fn history(
        db: &PgPool,
        user_id: Uuid,
        filter: HistoryQuery,
    ) -> Result<Vec<HistoryEntry>, AppError> {
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date)
            && end < start
        {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "end_date must not be before start_date"
            )));
        }

        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM attendance a \
             LEFT JOIN users u ON a.user_id = u.id \
             WHERE a.user_id = $1 \
               AND ($2::date IS NULL OR a.check_in_time >= $2::date) \
               AND ($3::date IS NULL OR a.check_in_time < $3::date + INTERVAL '1 day') \
               AND ($4::text IS NULL OR a.status = $4) \
             ORDER BY a.check_in_time DESC"
        );

        let rows = sqlx::query_as::<_, AttendanceWithUser>(&query)
            .bind(user_id)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(filter.status)
            .fetch_all(db)
            .await
            .context("Failed to fetch attendance history")
            .map_err(AppError::database)?;

        Ok(rows.into_iter().map(HistoryEntry::from).collect())
    }

    #[instrument(skip(db))]
    pub async fn for_day(db: &PgPool, day: NaiveDate) -> Result<Vec<HistoryEntry>, AppError> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM attendance a \
             LEFT JOIN users u ON a.user_id = u.id \
             WHERE a.check_in_time >= $1 AND a.check_in_time < $1 + INTERVAL '1 day' \
             ORDER BY a.check_in_time"
        );

        let rows = sqlx::query_as::<_, AttendanceWithUser>(&query)
            .bind(day)
            .fetch_all(db)
            .await
            .context("Failed to fetch attendance for day")
            .map_err(AppError::database)?;

        Ok(rows.into_iter().map(HistoryEntry::from).collect())
    }

    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }
}
