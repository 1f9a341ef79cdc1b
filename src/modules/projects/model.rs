use chrono::{DateTime, NaiveDate, Utc};
use hrdesk_core::AppError;
use hrdesk_core::serde::deserialize_optional_uuid;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

pub const TASK_COMPLETED: &str = "completed";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub manager_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectDto {
    #[validate(length(min = 1, max = 255, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub manager_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProjectDto {
    #[validate(length(min = 1, max = 255, message = "name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub manager_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectProgress {
    pub project_id: Uuid,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub progress: i64,
}

impl ProjectProgress {
    pub fn new(project_id: Uuid, total_tasks: i64, completed_tasks: i64) -> Self {
        Self {
            project_id,
            total_tasks,
            completed_tasks,
            progress: progress_percent(completed_tasks, total_tasks),
        }
    }
}

/// Completed share as a whole percentage, rounded half up. No tasks means 0.
pub fn progress_percent(completed: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (completed * 200 + total) / (total * 2)
}

pub fn check_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), AppError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(AppError::bad_request(anyhow::anyhow!(
            "end_date must not be before start_date"
        ))),
        _ => Ok(()),
    }
}

/// `%term%` with LIKE wildcards in the term escaped.
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_without_tasks_is_zero() {
        assert_eq!(progress_percent(0, 0), 0);
    }

    #[test]
    fn test_progress_rounds() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(1, 8), 13);
        assert_eq!(progress_percent(4, 4), 100);
    }

    #[test]
    fn test_check_dates() {
        let a = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let b = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(check_dates(Some(b), Some(a)).is_ok());
        assert!(check_dates(Some(a), None).is_ok());
        assert_eq!(check_dates(Some(a), Some(b)).unwrap_err().status.as_u16(), 400);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("erp"), "%erp%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
