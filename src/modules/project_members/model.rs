use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProjectMember {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MemberWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub member: ProjectMember,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Body of the add and remove endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MembershipDto {
    pub project_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MemberProjects {
    pub success: bool,
    pub data: Vec<Uuid>,
    pub count: usize,
}

pub fn added_message(project_name: &str) -> String {
    format!("You have been added to project \"{}\"", project_name)
}

pub fn removed_message(project_name: &str) -> String {
    format!("You have been removed from project \"{}\"", project_name)
}
