use anyhow::Context;
use hrdesk_core::AppError;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    CreateProjectDto, Project, ProjectProgress, TASK_COMPLETED, UpdateProjectDto, check_dates,
    like_pattern,
};

const PROJECT_COLUMNS: &str = "id, name, description, start_date, end_date, manager_id, created_at";

fn project_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Project not found"))
}

pub struct ProjectService;

impl ProjectService {
    #[instrument(skip(db, dto))]
    pub async fn create_project(db: &PgPool, dto: CreateProjectDto) -> Result<Project, AppError> {
        check_dates(dto.start_date, dto.end_date)?;

        let query = format!(
            "INSERT INTO projects (name, description, start_date, end_date, manager_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {PROJECT_COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(dto.start_date)
            .bind(dto.end_date)
            .bind(dto.manager_id)
            .fetch_one(db)
            .await
            .context("Failed to create project")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_projects(db: &PgPool) -> Result<Vec<Project>, AppError> {
        let query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE is_deleted = false ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .fetch_all(db)
            .await
            .context("Failed to fetch projects")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_project(db: &PgPool, id: Uuid) -> Result<Project, AppError> {
        let query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 AND is_deleted = false"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch project")
            .map_err(AppError::database)?
            .ok_or_else(project_not_found)
    }

    /// Projects the user works on, either as a member or through an assigned task.
    #[instrument(skip(db))]
    pub async fn projects_for_user(db: &PgPool, user_id: Uuid) -> Result<Vec<Project>, AppError> {
        let query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p \
             WHERE p.is_deleted = false AND ( \
                 EXISTS (SELECT 1 FROM project_members m WHERE m.project_id = p.id AND m.user_id = $1) \
                 OR EXISTS (SELECT 1 FROM tasks t WHERE t.project_id = p.id AND t.user_id = $1 AND t.is_deleted = false) \
             ) ORDER BY p.created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .fetch_all(db)
            .await
            .context("Failed to fetch projects for user")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn projects_for_manager(
        db: &PgPool,
        manager_id: Uuid,
    ) -> Result<Vec<Project>, AppError> {
        let query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects \
             WHERE manager_id = $1 AND is_deleted = false ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(manager_id)
            .fetch_all(db)
            .await
            .context("Failed to fetch projects for manager")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn search_projects(db: &PgPool, name: &str) -> Result<Vec<Project>, AppError> {
        let query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects \
             WHERE name ILIKE $1 AND is_deleted = false ORDER BY name"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(like_pattern(name.trim()))
            .fetch_all(db)
            .await
            .context("Failed to search projects")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn progress(db: &PgPool, id: Uuid) -> Result<ProjectProgress, AppError> {
        Self::get_project(db, id).await?;

        let (total, completed): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status = $2) \
             FROM tasks WHERE project_id = $1 AND is_deleted = false",
        )
        .bind(id)
        .bind(TASK_COMPLETED)
        .fetch_one(db)
        .await
        .context("Failed to compute project progress")
        .map_err(AppError::database)?;

        Ok(ProjectProgress::new(id, total, completed))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_project(
        db: &PgPool,
        id: Uuid,
        dto: UpdateProjectDto,
    ) -> Result<Project, AppError> {
        let current = Self::get_project(db, id).await?;
        check_dates(
            dto.start_date.or(current.start_date),
            dto.end_date.or(current.end_date),
        )?;

        let query = format!(
            "UPDATE projects SET \
             name = COALESCE($2, name), \
             description = COALESCE($3, description), \
             start_date = COALESCE($4, start_date), \
             end_date = COALESCE($5, end_date), \
             manager_id = COALESCE($6, manager_id) \
             WHERE id = $1 AND is_deleted = false RETURNING {PROJECT_COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(dto.start_date)
            .bind(dto.end_date)
            .bind(dto.manager_id)
            .fetch_optional(db)
            .await
            .context("Failed to update project")
            .map_err(AppError::database)?
            .ok_or_else(project_not_found)
    }

    #[instrument(skip(db))]
    pub async fn delete_project(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE projects SET is_deleted = true WHERE id = $1 AND is_deleted = false")
                .bind(id)
                .execute(db)
                .await
                .context("Failed to delete project")
                .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(project_not_found());
        }

        Ok(())
    }
}
