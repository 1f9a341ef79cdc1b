use chrono::{DateTime, NaiveDate, Utc};
use hrdesk_core::AppError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_LEAVE_DAYS: i32 = 12;
pub const PENDING: &str = "Pending";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub custom_reason: Option<String>,
    pub status: String,
    pub reject_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LeaveRequest {
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LeaveRequestWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub request: LeaveRequest,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LeaveBalance {
    pub user_id: Uuid,
    pub total_days: i32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeaveRequestDto {
    #[validate(length(min = 1, message = "leaveType is required"))]
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub custom_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveDecision {
    Approved,
    Rejected,
}

impl LeaveDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveDecision::Approved => "Approved",
            LeaveDecision::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessLeaveDto {
    pub request_id: Uuid,
    pub status: LeaveDecision,
    pub reject_reason: Option<String>,
}

impl ProcessLeaveDto {
    /// A rejection must say why.
    pub fn validate_reason(&self) -> Result<(), AppError> {
        let has_reason = self
            .reject_reason
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty());

        if self.status == LeaveDecision::Rejected && !has_reason {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "rejectReason is required when rejecting a request"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InitializeBalanceDto {
    pub user_id: Uuid,
    #[validate(range(min = 0, max = 365, message = "initialDays must be between 0 and 365"))]
    pub initial_days: Option<i32>,
}

/// Inclusive number of days between `start` and `end`.
pub fn leave_days(start: NaiveDate, end: NaiveDate) -> Result<i64, AppError> {
    if end < start {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "endDate must not be before startDate"
        )));
    }
    Ok((end - start).num_days() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_leave_days_is_inclusive() {
        assert_eq!(leave_days(date(6), date(6)).unwrap(), 1);
        assert_eq!(leave_days(date(6), date(10)).unwrap(), 5);
        assert!(leave_days(date(10), date(6)).is_err());
    }

    #[test]
    fn test_rejection_needs_reason() {
        let mut dto = ProcessLeaveDto {
            request_id: Uuid::nil(),
            status: LeaveDecision::Rejected,
            reject_reason: None,
        };
        assert!(dto.validate_reason().is_err());

        dto.reject_reason = Some("  ".into());
        assert!(dto.validate_reason().is_err());

        dto.reject_reason = Some("Project deadline".into());
        assert!(dto.validate_reason().is_ok());

        dto.status = LeaveDecision::Approved;
        dto.reject_reason = None;
        assert!(dto.validate_reason().is_ok());
    }

    #[test]
    fn test_process_dto_accepts_camel_case() {
        let dto: ProcessLeaveDto = serde_json::from_str(
            r#"{"requestId":"00000000-0000-0000-0000-000000000000","status":"Approved"}"#,
        )
        .unwrap();
        assert_eq!(dto.status, LeaveDecision::Approved);

        let bad = serde_json::from_str::<ProcessLeaveDto>(
            r#"{"requestId":"00000000-0000-0000-0000-000000000000","status":"Maybe"}"#,
        );
        assert!(bad.is_err());
    }
}
