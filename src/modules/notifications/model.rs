use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Kinds of notification written by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    ProjectMemberAdded,
    ProjectMemberRemoved,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ProjectMemberAdded => "PROJECT_MEMBER_ADDED",
            NotificationKind::ProjectMemberRemoved => "PROJECT_MEMBER_REMOVED",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

pub fn project_link(project_id: Uuid) -> String {
    format!("/projects/{}", project_id)
}
