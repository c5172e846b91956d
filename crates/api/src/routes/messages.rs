//! Conversation and message route handlers.
//!
//! Conversations are two-party; every endpoint checks participation before
//! touching messages. Sending a message drops a `message` notification for
//! each other participant.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use akubata_core::{ConversationId, NotificationType, UserId};

use crate::db::conversations::ConversationRepository;
use crate::db::notifications::{NewNotification, NotificationRepository};
use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, RequireAuth};
use crate::models::message::{Conversation, ConversationSummary, Message};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateConversationRequest {
    /// The other participant.
    pub participant_id: UserId,
}

#[derive(Serialize)]
pub struct ConversationResponse {
    pub message: String,
    pub conversation: Conversation,
    /// False when an existing conversation for the pair was reused.
    pub created: bool,
}

/// POST /api/conversations
pub async fn create_conversation(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateConversationRequest>,
) -> Result<Json<ConversationResponse>> {
    if request.participant_id == user.id {
        return Err(AppError::BadRequest(
            "cannot start a conversation with yourself".to_owned(),
        ));
    }

    let (conversation, created) = ConversationRepository::new(state.pool())
        .find_or_create(user.id, request.participant_id)
        .await?;

    if created {
        tracing::info!(conversation_id = %conversation.id, "Conversation created");
    }

    Ok(Json(ConversationResponse {
        message: if created {
            "Conversation created".to_owned()
        } else {
            "Existing conversation returned".to_owned()
        },
        conversation,
        created,
    }))
}

/// GET /api/conversations
pub async fn inbox(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<ConversationSummary>>> {
    let summaries = ConversationRepository::new(state.pool())
        .inbox(user.id)
        .await?;
    Ok(Json(summaries))
}

/// GET /api/conversations/{id}/messages
///
/// Fetching marks the caller's received messages in the conversation read.
pub async fn list_messages(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ConversationId>,
) -> Result<Json<Vec<Message>>> {
    let conversations = ConversationRepository::new(state.pool());
    ensure_participant(&conversations, id, &user).await?;

    let messages = conversations.messages(id, user.id).await?;
    conversations.mark_read(id, user.id).await?;

    Ok(Json(messages))
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// POST /api/conversations/{id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ConversationId>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<Message>> {
    let content = request.content.trim();
    if content.is_empty() {
        return Err(AppError::BadRequest("message content is required".to_owned()));
    }

    let conversations = ConversationRepository::new(state.pool());
    ensure_participant(&conversations, id, &user).await?;

    let message = conversations.send_message(id, user.id, content).await?;

    // One notification per other participant.
    let notifications = NotificationRepository::new(state.pool());
    let sender_name = user.email.clone();
    for participant in conversations.other_participants(id, user.id).await? {
        notifications
            .create(NewNotification {
                recipient_id: participant.user_id,
                notification_type: NotificationType::Message,
                content: &format!("New message from {sender_name}"),
                related_conversation_id: Some(id),
                related_message_id: Some(message.id),
            })
            .await?;
    }

    Ok(Json(message))
}

/// PUT /api/conversations/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ConversationId>,
) -> Result<Json<Value>> {
    let conversations = ConversationRepository::new(state.pool());
    ensure_participant(&conversations, id, &user).await?;

    conversations.mark_read(id, user.id).await?;

    Ok(Json(json!({ "message": "Messages marked read" })))
}

async fn ensure_participant(
    conversations: &ConversationRepository<'_>,
    id: ConversationId,
    user: &CurrentUser,
) -> Result<()> {
    if conversations.is_participant(id, user.id).await? {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "you are not a participant in this conversation".to_owned(),
        ))
    }
}
