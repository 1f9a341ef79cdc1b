use anyhow::Context;
use hrdesk_core::AppError;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{MemberWithUser, MembershipDto, ProjectMember, added_message, removed_message};
use crate::modules::notifications::model::{NotificationKind, project_link};
use crate::modules::notifications::service::NotificationService;
use crate::modules::projects::service::ProjectService;

const MEMBER_COLUMNS: &str = "project_id, user_id, joined_at";
const JOINED_COLUMNS: &str = "m.project_id, m.user_id, m.joined_at, u.full_name, u.email";

pub struct ProjectMemberService;

impl ProjectMemberService {
    /// Adds a member and notifies them.
    #[instrument(skip(db), fields(project_id = %dto.project_id, user_id = %dto.user_id))]
    pub async fn add_member(db: &PgPool, dto: MembershipDto) -> Result<ProjectMember, AppError> {
        let project = ProjectService::get_project(db, dto.project_id).await?;

        let query = format!(
            "INSERT INTO project_members (project_id, user_id) VALUES ($1, $2) \
             ON CONFLICT (project_id, user_id) DO NOTHING RETURNING {MEMBER_COLUMNS}"
        );
        let member = sqlx::query_as::<_, ProjectMember>(&query)
            .bind(dto.project_id)
            .bind(dto.user_id)
            .fetch_optional(db)
            .await
            .context("Failed to add project member")
            .map_err(AppError::database)?
            .ok_or_else(|| {
                AppError::conflict(anyhow::anyhow!(
                    "User is already a member of this project"
                ))
            })?;

        NotificationService::notify(
            db,
            dto.user_id,
            NotificationKind::ProjectMemberAdded,
            &added_message(&project.name),
            Some(&project_link(project.id)),
        )
        .await?;

        Ok(member)
    }

    #[instrument(skip(db), fields(project_id = %dto.project_id, user_id = %dto.user_id))]
    pub async fn remove_member(db: &PgPool, dto: MembershipDto) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
                .bind(dto.project_id)
                .bind(dto.user_id)
                .execute(db)
                .await
                .context("Failed to remove project member")
                .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Project member not found"
            )));
        }

        let name: Option<String> =
            sqlx::query_scalar("SELECT name FROM projects WHERE id = $1 AND is_deleted = false")
                .bind(dto.project_id)
                .fetch_optional(db)
                .await
                .context("Failed to fetch project name")
                .map_err(AppError::database)?;

        NotificationService::notify(
            db,
            dto.user_id,
            NotificationKind::ProjectMemberRemoved,
            &removed_message(name.as_deref().unwrap_or("Unknown")),
            Some(&project_link(dto.project_id)),
        )
        .await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn all_members(db: &PgPool) -> Result<Vec<MemberWithUser>, AppError> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM project_members m \
             LEFT JOIN users u ON m.user_id = u.id ORDER BY m.joined_at DESC"
        );
        sqlx::query_as::<_, MemberWithUser>(&query)
            .fetch_all(db)
            .await
            .context("Failed to fetch project members")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn members_of(db: &PgPool, project_id: Uuid) -> Result<Vec<MemberWithUser>, AppError> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM project_members m \
             LEFT JOIN users u ON m.user_id = u.id \
             WHERE m.project_id = $1 ORDER BY m.joined_at"
        );
        sqlx::query_as::<_, MemberWithUser>(&query)
            .bind(project_id)
            .fetch_all(db)
            .await
            .context("Failed to fetch project members")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn projects_of(db: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        sqlx::query_scalar(
            "SELECT m.project_id FROM project_members m \
             JOIN projects p ON p.id = m.project_id \
             WHERE m.user_id = $1 AND p.is_deleted = false ORDER BY m.joined_at",
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch member projects")
        .map_err(AppError::database)
    }
}
