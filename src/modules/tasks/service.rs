use anyhow::Context;
use hrdesk_core::AppError;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{CreateTaskDto, Task, TaskPriority, TaskStatus};
use crate::modules::projects::service::ProjectService;

const TASK_COLUMNS: &str = "id, project_id, user_id, description, status, priority, created_at";

fn task_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Task not found"))
}

pub struct TaskService;

impl TaskService {
    #[instrument(skip(db, dto), fields(project_id = %dto.project_id))]
    pub async fn create_task(db: &PgPool, dto: CreateTaskDto) -> Result<Task, AppError> {
        ProjectService::get_project(db, dto.project_id).await?;

        let query = format!(
            "INSERT INTO tasks (project_id, user_id, description, status, priority) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(dto.project_id)
            .bind(dto.user_id)
            .bind(&dto.description)
            .bind(dto.status.as_str())
            .bind(dto.priority.as_str())
            .fetch_one(db)
            .await
            .context("Failed to create task")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_tasks(db: &PgPool) -> Result<Vec<Task>, AppError> {
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE is_deleted = false ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Task>(&query)
            .fetch_all(db)
            .await
            .context("Failed to fetch tasks")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_task(db: &PgPool, id: Uuid) -> Result<Task, AppError> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND is_deleted = false");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch task")
            .map_err(AppError::database)?
            .ok_or_else(task_not_found)
    }

    #[instrument(skip(db))]
    pub async fn tasks_for_project(db: &PgPool, project_id: Uuid) -> Result<Vec<Task>, AppError> {
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE project_id = $1 AND is_deleted = false ORDER BY created_at"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(db)
            .await
            .context("Failed to fetch project tasks")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn tasks_for_user(db: &PgPool, user_id: Uuid) -> Result<Vec<Task>, AppError> {
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE user_id = $1 AND is_deleted = false ORDER BY created_at"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .fetch_all(db)
            .await
            .context("Failed to fetch user tasks")
            .map_err(AppError::database)
    }

    /// Sets a single column of a live task.
    async fn set_column<T>(db: &PgPool, id: Uuid, column: &str, value: T) -> Result<Task, AppError>
    where
        T: for<'q> sqlx::Encode<'q, sqlx::Postgres> + sqlx::Type<sqlx::Postgres> + Send + 'static,
    {
        let query = format!(
            "UPDATE tasks SET {column} = $2 WHERE id = $1 AND is_deleted = false \
             RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(value)
            .fetch_optional(db)
            .await
            .with_context(|| format!("Failed to update task {column}"))
            .map_err(AppError::database)?
            .ok_or_else(task_not_found)
    }

    #[instrument(skip(db))]
    pub async fn update_status(db: &PgPool, id: Uuid, status: TaskStatus) -> Result<Task, AppError> {
        Self::set_column(db, id, "status", status.as_str()).await
    }

    #[instrument(skip(db))]
    pub async fn update_priority(
        db: &PgPool,
        id: Uuid,
        priority: TaskPriority,
    ) -> Result<Task, AppError> {
        Self::set_column(db, id, "priority", priority.as_str()).await
    }

    #[instrument(skip(db))]
    pub async fn change_assignee(db: &PgPool, id: Uuid, user_id: Uuid) -> Result<Task, AppError> {
        Self::set_column(db, id, "user_id", user_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_task(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE tasks SET is_deleted = true WHERE id = $1 AND is_deleted = false")
                .bind(id)
                .execute(db)
                .await
                .context("Failed to delete task")
                .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(task_not_found());
        }

        Ok(())
    }
}
