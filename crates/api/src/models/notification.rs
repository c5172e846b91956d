//! Notification domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use akubata_core::{ConversationId, MessageId, NotificationId, NotificationType, UserId};

/// An in-app notification for a user.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub content: String,
    pub is_read: bool,
    /// Conversation that triggered this notification, if any.
    pub related_conversation_id: Option<ConversationId>,
    /// Message that triggered this notification, if any.
    pub related_message_id: Option<MessageId>,
    pub created_at: DateTime<Utc>,
}
