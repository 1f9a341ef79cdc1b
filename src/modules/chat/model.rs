use chrono::{DateTime, Utc};
use hrdesk_core::serde::deserialize_optional_uuid;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageDto {
    pub receiver_id: Uuid,
    #[validate(length(min = 1, max = 4000, message = "message must not be empty"))]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    pub user1_id: Uuid,
    pub user2_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinUser {
    pub id: Uuid,
}

/// Frames a chat socket accepts.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IncomingFrame {
    Join {
        user: JoinUser,
    },
    Message {
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        sender_id: Option<Uuid>,
        receiver_id: Uuid,
        message: String,
    },
}

impl IncomingFrame {
    pub fn parse(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| format!("Invalid frame: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join() {
        let frame = IncomingFrame::parse(
            r#"{"type":"join","user":{"id":"00000000-0000-0000-0000-000000000007"}}"#,
        )
        .unwrap();
        assert!(matches!(frame, IncomingFrame::Join { user } if user.id.as_u128() == 7));
    }

    #[test]
    fn test_parse_message_without_sender() {
        let frame = IncomingFrame::parse(
            r#"{"type":"message","receiver_id":"00000000-0000-0000-0000-000000000002","message":"hi"}"#,
        )
        .unwrap();
        match frame {
            IncomingFrame::Message {
                sender_id, message, ..
            } => {
                assert!(sender_id.is_none());
                assert_eq!(message, "hi");
            }
            other => panic!("unexpected frame: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_type_and_garbage() {
        assert!(IncomingFrame::parse(r#"{"type":"typing"}"#).is_err());
        assert!(IncomingFrame::parse("not json").is_err());
    }
}
