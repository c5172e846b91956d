//! Conversation and message domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use akubata_core::{ConversationId, MessageId, UserId};

/// A two-party conversation.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub created_at: DateTime<Utc>,
    /// Bumped whenever a message is sent, for recency sorting.
    pub updated_at: DateTime<Utc>,
}

/// A message within a conversation.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub content: String,
    pub is_read: bool,
    /// Set per-request for the authenticated viewer.
    pub is_own_message: bool,
    pub created_at: DateTime<Utc>,
}

/// A participant in a conversation listing.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantSummary {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
}

/// A conversation as shown in the inbox: the other participants, the latest
/// message, and the viewer's unread count.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub conversation_id: ConversationId,
    pub participants: Vec<ParticipantSummary>,
    pub participants_name: String,
    pub latest_message: Option<Message>,
    pub unread_count: i64,
}
