//! WebSocket chat server, served on its own port.

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
    routing::get,
};
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use super::hub::OutgoingFrame;
use super::model::IncomingFrame;
use super::service::ChatService;
use crate::metrics::track_chat_message;
use crate::state::AppState;

pub fn chat_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(upgrade))
        .route("/ws", get(upgrade))
        .with_state(state)
}

async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn send_frame(
    sink: &mut SplitSink<WebSocket, Message>,
    frame: &OutgoingFrame,
) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(frame) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode chat frame");
            return Ok(());
        }
    };
    sink.send(Message::Text(text.into())).await
}

fn error_frame(message: impl Into<String>) -> OutgoingFrame {
    OutgoingFrame::Error {
        message: message.into(),
    }
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4();
    let (mut sink, mut stream) = socket.split();
    let mut events = state.chat.subscribe();
    let mut user_id: Option<Uuid> = None;

    tracing::info!(%connection_id, connections = state.chat.connections(), "Chat connection opened");

    loop {
        tokio::select! {
            incoming = stream.next() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        tracing::warn!(%connection_id, error = %e, "Chat socket error");
                        break;
                    }
                };

                let reply = match IncomingFrame::parse(text.as_str()) {
                    Err(message) => Some(error_frame(message)),
                    Ok(IncomingFrame::Join { user }) => {
                        user_id = Some(user.id);
                        tracing::info!(%connection_id, user_id = %user.id, "User joined chat");
                        Some(OutgoingFrame::Joined { user_id: user.id })
                    }
                    Ok(IncomingFrame::Message { sender_id, receiver_id, message }) => {
                        match sender_id.or(user_id) {
                            None => Some(error_frame("Join the chat before sending messages")),
                            Some(sender) => {
                                match ChatService::save_message(&state.db, sender, receiver_id, &message).await {
                                    Ok(saved) => {
                                        state.chat.publish(Some(connection_id), OutgoingFrame::from(&saved));
                                        track_chat_message("ws");
                                        None
                                    }
                                    Err(e) => Some(error_frame(e.public_message())),
                                }
                            }
                        }
                    }
                };

                if let Some(frame) = reply
                    && send_frame(&mut sink, &frame).await.is_err()
                {
                    break;
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) if event.origin == Some(connection_id) => {}
                    Ok(event) => {
                        if send_frame(&mut sink, &event.frame).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(%connection_id, skipped, "Chat receiver lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::info!(%connection_id, "Chat connection closed");
}
