use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use hrdesk_core::AppError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PerformanceReview {
    pub id: Uuid,
    pub user_id: Uuid,
    pub review_period: Option<String>,
    pub score: i32,
    pub reviewer_id: Uuid,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewDto {
    pub user_id: Uuid,
    #[validate(range(min = 0, max = 100, message = "score must be between 0 and 100"))]
    pub score: i32,
    pub reviewer_id: Uuid,
    pub review_period: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateReviewDto {
    #[validate(range(min = 0, max = 100, message = "score must be between 0 and 100"))]
    pub score: Option<i32>,
    pub review_period: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReviewStats {
    pub total_reviews: i64,
    pub average_score: Option<f64>,
    pub min_score: Option<i32>,
    pub max_score: Option<i32>,
}

/// Calendar window a stats query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsPeriod {
    Monthly { year: i32, month: u32 },
    Quarterly { year: i32, quarter: u32 },
    Yearly { year: i32 },
}

fn invalid_year(year: i32) -> AppError {
    AppError::bad_request(anyhow::anyhow!("Invalid year: {}", year))
}

fn first_of(year: i32, month: u32) -> Result<NaiveDate, AppError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| invalid_year(year))
}

impl StatsPeriod {
    pub fn monthly(year: i32, month: u32) -> Result<Self, AppError> {
        if !(1..=12).contains(&month) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Month must be between 1 and 12"
            )));
        }
        Ok(StatsPeriod::Monthly { year, month })
    }

    pub fn quarterly(year: i32, quarter: u32) -> Result<Self, AppError> {
        if !(1..=4).contains(&quarter) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Quarter must be between 1 and 4"
            )));
        }
        Ok(StatsPeriod::Quarterly { year, quarter })
    }

    pub fn yearly(year: i32) -> Self {
        StatsPeriod::Yearly { year }
    }

    /// Half-open date range `[start, end)`.
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate), AppError> {
        let (year, first_month, months) = match *self {
            StatsPeriod::Monthly { year, month } => (year, month, 1),
            StatsPeriod::Quarterly { year, quarter } => (year, (quarter - 1) * 3 + 1, 3),
            StatsPeriod::Yearly { year } => (year, 1, 12),
        };

        let start = first_of(year, first_month)?;
        let next = first_month + months;
        let end = if next > 12 {
            first_of(year.checked_add(1).ok_or_else(|| invalid_year(year))?, next - 12)?
        } else {
            first_of(year, next)?
        };
        Ok((start, end))
    }

    pub fn time_range(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
        let (start, end) = self.date_range()?;
        Ok((
            start.and_time(NaiveTime::MIN).and_utc(),
            end.and_time(NaiveTime::MIN).and_utc(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        assert!(StatsPeriod::monthly(2025, 0).is_err());
        assert!(StatsPeriod::monthly(2025, 13).is_err());
        let range = StatsPeriod::monthly(2025, 12).unwrap().date_range().unwrap();
        assert_eq!(range, (date(2025, 12, 1), date(2026, 1, 1)));
    }

    #[test]
    fn test_quarter_bounds() {
        let err = StatsPeriod::quarterly(2025, 5).unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
        let range = StatsPeriod::quarterly(2025, 2).unwrap().date_range().unwrap();
        assert_eq!(range, (date(2025, 4, 1), date(2025, 7, 1)));
        let range = StatsPeriod::quarterly(2025, 4).unwrap().date_range().unwrap();
        assert_eq!(range, (date(2025, 10, 1), date(2026, 1, 1)));
    }

    #[test]
    fn test_year_range() {
        let range = StatsPeriod::yearly(2024).date_range().unwrap();
        assert_eq!(range, (date(2024, 1, 1), date(2025, 1, 1)));
    }

    #[test]
    fn test_missing_reviewer_is_rejected() {
        let result = serde_json::from_value::<CreateReviewDto>(serde_json::json!({
            "user_id": "00000000-0000-0000-0000-000000000001",
            "score": 80
        }));
        assert!(result.is_err());
    }
}
