//! Administrative commands used by the `hrdesk-cli` binary.

use hrdesk_auth::Role;
use hrdesk_core::AppError;
use sqlx::PgPool;
use validator::Validate;

use crate::modules::users::model::{CreateUserDto, User};
use crate::modules::users::service::UserService;

/// Creates an active `Admin` account.
///
/// Refuses an email that is already registered.
pub async fn create_admin(
    db: &PgPool,
    full_name: &str,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let dto = CreateUserDto {
        email: email.trim().to_string(),
        password: password.to_string(),
        full_name: full_name.trim().to_string(),
        mobile: None,
        address: None,
        avatar_url: None,
        department: None,
        position: None,
        hire_date: None,
        role: Some(Role::Admin.as_str().to_string()),
    };

    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    UserService::create_user(db, dto).await
}

/// Applies the embedded migrations.
pub async fn run_migrations(db: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(db).await
}
