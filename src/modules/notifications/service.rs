use anyhow::Context;
use hrdesk_core::AppError;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{Notification, NotificationKind};

const NOTIFICATION_COLUMNS: &str = "id, user_id, type, message, link, is_read, created_at";

pub struct NotificationService;

impl NotificationService {
    #[instrument(skip(db, message), fields(kind = kind.as_str()))]
    pub async fn notify(
        db: &PgPool,
        user_id: Uuid,
        kind: NotificationKind,
        message: &str,
        link: Option<&str>,
    ) -> Result<Notification, AppError> {
        let query = format!(
            "INSERT INTO notifications (user_id, type, message, link) \
             VALUES ($1, $2, $3, $4) RETURNING {NOTIFICATION_COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(kind.as_str())
            .bind(message)
            .bind(link)
            .fetch_one(db)
            .await
            .context("Failed to create notification")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn for_user(db: &PgPool, user_id: Uuid) -> Result<Vec<Notification>, AppError> {
        let query = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .fetch_all(db)
            .await
            .context("Failed to fetch notifications")
            .map_err(AppError::database)
    }

    /// Marks one of the user's own notifications as read.
    #[instrument(skip(db))]
    pub async fn mark_read(db: &PgPool, id: Uuid, user_id: Uuid) -> Result<Notification, AppError> {
        let query = format!(
            "UPDATE notifications SET is_read = true \
             WHERE id = $1 AND user_id = $2 RETURNING {NOTIFICATION_COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(db)
            .await
            .context("Failed to mark notification as read")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Notification not found")))
    }
}
