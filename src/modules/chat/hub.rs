//! In-process fan-out of chat messages to connected sockets.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::model::ChatMessage;

const CAPACITY: usize = 256;

/// A message on its way to every connected peer.
#[derive(Debug, Clone)]
pub struct ChatEvent {
    /// Connection that produced the message; `None` for REST sends.
    pub origin: Option<Uuid>,
    pub frame: OutgoingFrame,
}

/// Frames the server writes to chat sockets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutgoingFrame {
    Message {
        sender_id: Uuid,
        receiver_id: Uuid,
        message: String,
        created_at: String,
    },
    Joined {
        user_id: Uuid,
    },
    Error {
        message: String,
    },
}

impl From<&ChatMessage> for OutgoingFrame {
    fn from(msg: &ChatMessage) -> Self {
        OutgoingFrame::Message {
            sender_id: msg.sender_id,
            receiver_id: msg.receiver_id,
            message: msg.message.clone(),
            created_at: msg.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatHub {
    tx: broadcast::Sender<ChatEvent>,
}

impl Default for ChatHub {
    fn default() -> Self {
        let (tx, _) = broadcast::channel(CAPACITY);
        Self { tx }
    }
}

impl ChatHub {
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.tx.subscribe()
    }

    /// Sends to every subscriber. Returns how many received it.
    pub fn publish(&self, origin: Option<Uuid>, frame: OutgoingFrame) -> usize {
        self.tx.send(ChatEvent { origin, frame }).unwrap_or(0)
    }

    pub fn connections(&self) -> usize {
        self.tx.receiver_count()
    }
}
