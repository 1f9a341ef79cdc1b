use hrdesk_core::Envelope;
use hrdesk_router::{HandlerResult, Reply, RequestContext};
use tracing::instrument;

use super::hub::OutgoingFrame;
use super::model::{ConversationQuery, SendMessageDto};
use super::service::ChatService;
use crate::metrics::track_chat_message;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[instrument(skip_all)]
pub async fn send_message(ctx: RequestContext, state: AppState) -> HandlerResult {
    let auth = AuthUser::from_context(&ctx)?;
    let dto: SendMessageDto = ctx.validated_json()?;

    let saved =
        ChatService::save_message(&state.db, auth.user_id()?, dto.receiver_id, &dto.message)
            .await?;
    state.chat.publish(None, OutgoingFrame::from(&saved));
    track_chat_message("rest");

    Reply::created(&Envelope::with_message("Message sent successfully", saved))
}

#[instrument(skip_all)]
pub async fn get_messages(ctx: RequestContext, state: AppState) -> HandlerResult {
    let query: ConversationQuery = ctx.query()?;
    let messages = ChatService::conversation(&state.db, query.user1_id, query.user2_id).await?;
    Reply::json(&Envelope::data(messages))
}
