use anyhow::Context;
use hrdesk_core::{AppError, hash_password, verify_password};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    ChangePasswordDto, CreateUserDto, STATUS_ACTIVE, STATUS_INACTIVE, UpdateUserDto, User,
    role_or_default,
};

const USER_COLUMNS: &str = "id, email, password, full_name, mobile, address, avatar_url, \
    department, position, hire_date, status, role, created_at, updated_at";

fn user_not_found(id: Uuid) -> AppError {
    AppError::not_found(anyhow::anyhow!("User with id {} not found", id))
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let role = role_or_default(dto.role.as_deref())?;

        if Self::email_taken(db, &dto.email).await? {
            return Err(AppError::conflict(anyhow::anyhow!("Email already exists")));
        }

        let password = hash_password(&dto.password)?;
        let query = format!(
            "INSERT INTO users (email, password, full_name, mobile, address, avatar_url, \
             department, position, hire_date, role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(&dto.email)
            .bind(&password)
            .bind(&dto.full_name)
            .bind(&dto.mobile)
            .bind(&dto.address)
            .bind(&dto.avatar_url)
            .bind(&dto.department)
            .bind(&dto.position)
            .bind(dto.hire_date)
            .bind(role.as_str())
            .fetch_one(db)
            .await
            .context("Failed to insert user")
            .map_err(AppError::database)?;

        Ok(user)
    }

    async fn email_taken(db: &PgPool, email: &str) -> Result<bool, AppError> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND is_deleted = FALSE)",
        )
        .bind(email)
        .fetch_one(db)
        .await
        .context("Failed to check email")
        .map_err(AppError::database)?;

        Ok(taken)
    }

    #[instrument(skip(db))]
    pub async fn get_users(db: &PgPool) -> Result<Vec<User>, AppError> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE is_deleted = FALSE AND status = $1 ORDER BY full_name"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(STATUS_ACTIVE)
            .fetch_all(db)
            .await
            .context("Failed to fetch users")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_blocked_users(db: &PgPool) -> Result<Vec<User>, AppError> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE is_deleted = FALSE AND status = $1 ORDER BY full_name"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(STATUS_INACTIVE)
            .fetch_all(db)
            .await
            .context("Failed to fetch blocked users")
            .map_err(AppError::database)
    }

    /// Active, non-deleted user by id.
    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE id = $1 AND is_deleted = FALSE AND status = $2"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(STATUS_ACTIVE)
            .fetch_optional(db)
            .await
            .context("Failed to fetch user by ID")
            .map_err(AppError::database)?
            .ok_or_else(|| user_not_found(id))
    }

    /// Active, non-deleted user by email; `None` when no such user may log in.
    #[instrument(skip(db))]
    pub async fn find_active_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE email = $1 AND is_deleted = FALSE AND status = $2"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(STATUS_ACTIVE)
            .fetch_optional(db)
            .await
            .context("Failed to fetch user by email")
            .map_err(AppError::database)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_user(db: &PgPool, id: Uuid, dto: UpdateUserDto) -> Result<User, AppError> {
        let role = dto
            .role
            .as_deref()
            .map(str::parse::<hrdesk_auth::Role>)
            .transpose()?;
        let password = dto.password.as_deref().map(hash_password).transpose()?;

        let query = format!(
            "UPDATE users SET \
                email = COALESCE($2, email), \
                password = COALESCE($3, password), \
                full_name = COALESCE($4, full_name), \
                mobile = COALESCE($5, mobile), \
                address = COALESCE($6, address), \
                avatar_url = COALESCE($7, avatar_url), \
                department = COALESCE($8, department), \
                position = COALESCE($9, position), \
                hire_date = COALESCE($10, hire_date), \
                role = COALESCE($11, role), \
                updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&dto.email)
            .bind(&password)
            .bind(&dto.full_name)
            .bind(&dto.mobile)
            .bind(&dto.address)
            .bind(&dto.avatar_url)
            .bind(&dto.department)
            .bind(&dto.position)
            .bind(dto.hire_date)
            .bind(role.map(|r| r.as_str()))
            .fetch_optional(db)
            .await
            .context("Failed to update user")
            .map_err(AppError::database)?
            .ok_or_else(|| user_not_found(id))
    }

    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(db)
        .await
        .context("Failed to delete user")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }
        Ok(())
    }

    /// Sets the account status (`Active` or `Inactive`).
    #[instrument(skip(db))]
    pub async fn set_status(db: &PgPool, id: Uuid, status: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(status)
        .execute(db)
        .await
        .context("Failed to update user status")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }
        Ok(())
    }

    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &PgPool,
        id: Uuid,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        let user = Self::get_user(db, id).await?;

        if !verify_password(&dto.old_password, &user.password)? {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Current password is incorrect"
            )));
        }

        let hash = hash_password(&dto.new_password)?;
        sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(&hash)
            .execute(db)
            .await
            .context("Failed to update password")
            .map_err(AppError::database)?;

        Ok(())
    }
}
