//! Notification route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use akubata_core::{ConversationId, MessageId, NotificationId, NotificationType, UserId};

use crate::db::notifications::{NewNotification, NotificationRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Notification;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateNotificationRequest {
    pub recipient_id: UserId,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub content: String,
    pub related_conversation_id: Option<ConversationId>,
    pub related_message_id: Option<MessageId>,
}

/// POST /api/notifications
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<Json<Notification>> {
    if request.content.trim().is_empty() {
        return Err(AppError::BadRequest("content is required".to_owned()));
    }

    let notification = NotificationRepository::new(state.pool())
        .create(NewNotification {
            recipient_id: request.recipient_id,
            notification_type: request.notification_type,
            content: &request.content,
            related_conversation_id: request.related_conversation_id,
            related_message_id: request.related_message_id,
        })
        .await?;

    Ok(Json(notification))
}

#[derive(Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
}

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<NotificationListResponse>> {
    let repository = NotificationRepository::new(state.pool());

    let notifications = repository.list(user.id).await?;
    let unread_count = repository.unread_count(user.id).await?;

    Ok(Json(NotificationListResponse {
        notifications,
        unread_count,
    }))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<NotificationId>,
) -> Result<Json<Notification>> {
    let notification = NotificationRepository::new(state.pool())
        .mark_read(user.id, id)
        .await?;

    Ok(Json(notification))
}

/// DELETE /api/notifications/{id}
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<NotificationId>,
) -> Result<Json<Value>> {
    let deleted = NotificationRepository::new(state.pool())
        .delete(user.id, id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound("Notification not found".to_owned()));
    }

    Ok(Json(json!({ "message": "Notification deleted" })))
}

/// PUT /api/notifications/read/all
pub async fn mark_all_read(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let updated = NotificationRepository::new(state.pool())
        .mark_all_read(user.id)
        .await?;

    Ok(Json(json!({
        "message": "All notifications marked read",
        "updated": updated,
    })))
}
