use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::Utc;
use tracing::debug;

use serene_types::api::SendChatRequest;
use serene_types::models::{ChatMessage, NewChatMessage};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::responder;

pub async fn get_messages(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let user_id = current.user.id;
    let messages = state.run_store(move |store| store.list_chat_messages(user_id)).await?;
    Ok(Json(messages))
}

/// Store the user's message, then the scripted reply, and return the reply.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<SendChatRequest>, JsonRejection>,
) -> Result<Json<ChatMessage>, ApiError> {
    let Json(req) = payload.map_err(|e| {
        debug!("Rejected chat body: {}", e);
        ApiError::validation("Invalid message format")
    })?;

    let reply = responder::respond(&req.message);
    debug!("Chat reply for user {} tagged {}", current.user.id, reply.sentiment.as_str());

    let now = Utc::now();
    let user_id = current.user.id;
    let incoming = NewChatMessage::from_user(user_id, req.message, now);
    let outgoing = NewChatMessage::from_ai(
        user_id,
        reply.text,
        reply.sentiment,
        reply.suggestions(),
        now,
    );

    let ai_message = state
        .run_store(move |store| {
            store.append_chat_message(incoming)?;
            store.append_chat_message(outgoing)
        })
        .await?;

    Ok(Json(ai_message))
}
