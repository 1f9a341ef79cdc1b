use chrono::{DateTime, NaiveDate, Utc};
use hrdesk_auth::Role;
use hrdesk_core::AppError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

pub const STATUS_ACTIVE: &str = "Active";
pub const STATUS_INACTIVE: &str = "Inactive";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub full_name: String,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub status: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Result<Role, AppError> {
        self.role.parse()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 255, message = "full_name is required"))]
    pub full_name: String,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub full_name: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "old_password is required"))]
    pub old_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// Parses an optional role name, defaulting to `Employee`.
pub fn role_or_default(role: Option<&str>) -> Result<Role, AppError> {
    role.map(str::parse::<Role>).transpose().map(|r| r.unwrap_or(Role::Employee))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_is_never_serialized() {
        let user = User {
            id: Uuid::nil(),
            email: "a@b.c".into(),
            password: "$2b$12$hash".into(),
            full_name: "A B".into(),
            mobile: None,
            address: None,
            avatar_url: None,
            department: None,
            position: None,
            hire_date: None,
            status: STATUS_ACTIVE.into(),
            role: "Manager".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(user.role().unwrap(), Role::Manager);
    }

    #[test]
    fn test_role_or_default() {
        assert_eq!(role_or_default(None).unwrap(), Role::Employee);
        assert_eq!(role_or_default(Some("accountant")).unwrap(), Role::Accountant);
        assert!(role_or_default(Some("ceo")).is_err());
    }
}
