use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use sqlx::FromRow;
use uuid::Uuid;

pub const ON_TIME: &str = "On time";
pub const LATE: &str = "Late";
pub const NOT_CHECKED_IN: &str = "Not Checked In";

/// Check-ins strictly after this time of day are late.
pub fn cutoff() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
}

impl GpsLocation {
    pub fn to_value(self) -> Value {
        let mut value = json!({
            "latitude": self.latitude,
            "longitude": self.longitude,
        });
        if let Some(accuracy) = self.accuracy {
            value["accuracy"] = json!(accuracy);
        }
        value
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Attendance {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub check_in_time: NaiveDateTime,
    pub check_out_time: Option<NaiveDateTime>,
    pub gps_location: Option<Value>,
}

#[derive(Debug, Clone, FromRow)]
pub struct AttendanceWithUser {
    #[sqlx(flatten)]
    pub attendance: Attendance,
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckInDto {
    pub gps_location: Option<GpsLocation>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckOutDto {
    pub gps_location: Option<GpsLocation>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckOutResult {
    #[serde(flatten)]
    pub attendance: Attendance,
    pub duration: String,
    pub duration_seconds: i64,
}

#[derive(Debug, Serialize)]
pub struct CurrentStatus {
    pub is_checked_in: bool,
    pub is_checked_out: bool,
    pub status: String,
    pub message: String,
    pub attendance_data: Option<Attendance>,
    pub today_date: NaiveDate,
}

impl CurrentStatus {
    pub fn from_latest(latest: Option<Attendance>, today: NaiveDate) -> Self {
        match latest {
            None => Self {
                is_checked_in: false,
                is_checked_out: false,
                status: NOT_CHECKED_IN.to_string(),
                message: "You haven't checked in today".to_string(),
                attendance_data: None,
                today_date: today,
            },
            Some(record) => {
                let checked_out = record.check_out_time.is_some();
                Self {
                    is_checked_in: true,
                    is_checked_out: checked_out,
                    status: record.status.clone(),
                    message: if checked_out {
                        "You have completed your check-in/out for today"
                    } else {
                        "You're currently checked in"
                    }
                    .to_string(),
                    attendance_data: Some(record),
                    today_date: today,
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub day_of_week: String,
    pub check_in_time: NaiveDateTime,
    pub check_out_time: Option<NaiveDateTime>,
    pub status: String,
    pub duration: Option<String>,
    pub user_name: String,
    pub department: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_location: Option<Value>,
}

impl From<AttendanceWithUser> for HistoryEntry {
    fn from(row: AttendanceWithUser) -> Self {
        let a = row.attendance;
        let duration = a
            .check_out_time
            .map(|out| format_duration((out - a.check_in_time).num_seconds()));

        Self {
            id: a.id,
            date: a.check_in_time.date(),
            day_of_week: a.check_in_time.format("%A").to_string(),
            check_in_time: a.check_in_time,
            check_out_time: a.check_out_time,
            status: a.status,
            duration,
            user_name: row.full_name.unwrap_or_else(|| "Unknown".to_string()),
            department: row.department.unwrap_or_else(|| "Not assigned".to_string()),
            position: row.position.unwrap_or_else(|| "Not assigned".to_string()),
            gps_location: a.gps_location,
        }
    }
}

pub fn check_in_status(at: NaiveDateTime) -> &'static str {
    if at.time() > cutoff() { LATE } else { ON_TIME }
}

/// `"{hours}h {minutes}m"`, negative spans clamp to zero.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
}

/// Adds the check-out coordinates to the stored check-in location.
pub fn merge_checkout_location(existing: Option<Value>, checkout: GpsLocation) -> Value {
    let mut map = match existing {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    map.insert("checkout_latitude".into(), json!(checkout.latitude));
    map.insert("checkout_longitude".into(), json!(checkout.longitude));
    if let Some(accuracy) = checkout.accuracy {
        map.insert("checkout_accuracy".into(), json!(accuracy));
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_eight_sharp_is_on_time() {
        assert_eq!(check_in_status(at(7, 59, 59)), ON_TIME);
        assert_eq!(check_in_status(at(8, 0, 0)), ON_TIME);
        assert_eq!(check_in_status(at(8, 0, 1)), LATE);
        assert_eq!(check_in_status(at(13, 30, 0)), LATE);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0h 0m");
        assert_eq!(format_duration(8 * 3600 + 15 * 60 + 59), "8h 15m");
        assert_eq!(format_duration(-5), "0h 0m");
    }

    #[test]
    fn test_merge_keeps_check_in_coordinates() {
        let check_in = GpsLocation {
            latitude: 10.0,
            longitude: 106.0,
            accuracy: None,
        };
        let merged = merge_checkout_location(
            Some(check_in.to_value()),
            GpsLocation {
                latitude: 10.5,
                longitude: 106.5,
                accuracy: Some(3.0),
            },
        );
        assert_eq!(merged["latitude"], 10.0);
        assert_eq!(merged["checkout_latitude"], 10.5);
        assert_eq!(merged["checkout_accuracy"], 3.0);
    }

    #[test]
    fn test_current_status_without_record() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let status = CurrentStatus::from_latest(None, today);
        assert!(!status.is_checked_in);
        assert_eq!(status.status, NOT_CHECKED_IN);
    }

    #[test]
    fn test_history_entry_formats_day_and_duration() {
        let row = AttendanceWithUser {
            attendance: Attendance {
                id: Uuid::nil(),
                user_id: Uuid::nil(),
                status: LATE.into(),
                check_in_time: at(8, 30, 0),
                check_out_time: Some(at(17, 45, 0)),
                gps_location: None,
            },
            full_name: None,
            department: Some("HR".into()),
            position: None,
        };
        let entry = HistoryEntry::from(row);
        assert_eq!(entry.day_of_week, "Monday");
        assert_eq!(entry.duration.as_deref(), Some("9h 15m"));
        assert_eq!(entry.user_name, "Unknown");
        assert_eq!(entry.department, "HR");
    }
}
