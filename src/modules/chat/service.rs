use anyhow::Context;
use hrdesk_core::AppError;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::ChatMessage;

const CHAT_COLUMNS: &str = "id, sender_id, receiver_id, message, created_at";

pub struct ChatService;

impl ChatService {
    #[instrument(skip(db, message))]
    pub async fn save_message(
        db: &PgPool,
        sender_id: Uuid,
        receiver_id: Uuid,
        message: &str,
    ) -> Result<ChatMessage, AppError> {
        let text = message.trim();
        if text.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "message must not be empty"
            )));
        }

        let query = format!(
            "INSERT INTO chats (sender_id, receiver_id, message) VALUES ($1, $2, $3) \
             RETURNING {CHAT_COLUMNS}"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(sender_id)
            .bind(receiver_id)
            .bind(text)
            .fetch_one(db)
            .await
            .context("Failed to save chat message")
            .map_err(AppError::database)
    }

    /// Messages exchanged between two users in either direction, oldest first.
    #[instrument(skip(db))]
    pub async fn conversation(
        db: &PgPool,
        user1_id: Uuid,
        user2_id: Uuid,
    ) -> Result<Vec<ChatMessage>, AppError> {
        let query = format!(
            "SELECT {CHAT_COLUMNS} FROM chats \
             WHERE (sender_id = $1 AND receiver_id = $2) \
                OR (sender_id = $2 AND receiver_id = $1) \
             ORDER BY created_at"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(user1_id)
            .bind(user2_id)
            .fetch_all(db)
            .await
            .context("Failed to fetch chat messages")
            .map_err(AppError::database)
    }
}
