//! Conversation and message repository.
//!
//! Conversations are two-party. Looking up the pair before creating runs in
//! a transaction so two users opening a chat with each other at the same
//! time still end up sharing one conversation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use akubata_core::{ConversationId, MessageId, UserId};

use super::RepositoryError;
use crate::models::message::{Conversation, ConversationSummary, Message, ParticipantSummary};

#[derive(sqlx::FromRow)]
struct ConversationRow {
    id: ConversationId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ConversationRow> for Conversation {
    fn from(row: ConversationRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: MessageId,
    conversation_id: ConversationId,
    sender_id: UserId,
    content: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl MessageRow {
    fn into_message(self, viewer: UserId) -> Message {
        Message {
            id: self.id,
            conversation_id: self.conversation_id,
            sender_id: self.sender_id,
            content: self.content,
            is_read: self.is_read,
            is_own_message: self.sender_id == viewer,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ParticipantRow {
    user_id: UserId,
    first_name: String,
    last_name: String,
}

impl From<ParticipantRow> for ParticipantSummary {
    fn from(row: ParticipantRow) -> Self {
        Self {
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

/// Repository for conversation and message database operations.
pub struct ConversationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ConversationRepository<'a> {
    /// Create a new conversation repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find the conversation between two users, creating it if none exists.
    ///
    /// # Returns
    ///
    /// The conversation and whether it was newly created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn find_or_create(
        &self,
        user_a: UserId,
        user_b: UserId,
    ) -> Result<(Conversation, bool), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, ConversationRow>(
            "SELECT c.id, c.created_at, c.updated_at FROM conversations c \
             WHERE EXISTS (SELECT 1 FROM conversation_participants \
                           WHERE conversation_id = c.id AND user_id = $1) \
               AND EXISTS (SELECT 1 FROM conversation_participants \
                           WHERE conversation_id = c.id AND user_id = $2)",
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(row) = existing {
            tx.commit().await?;
            return Ok((row.into(), false));
        }

        let row = sqlx::query_as::<_, ConversationRow>(
            "INSERT INTO conversations DEFAULT VALUES RETURNING id, created_at, updated_at",
        )
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO conversation_participants (conversation_id, user_id) \
             VALUES ($1, $2), ($1, $3)",
        )
        .bind(row.id)
        .bind(user_a)
        .bind(user_b)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((row.into(), true))
    }

    /// Whether a user participates in a conversation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn is_participant(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let row: Option<(i32,)> = sqlx::query_as(
            "SELECT 1 FROM conversation_participants \
             WHERE conversation_id = $1 AND user_id = $2",
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// List a conversation's participants other than the viewer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn other_participants(
        &self,
        conversation_id: ConversationId,
        viewer: UserId,
    ) -> Result<Vec<ParticipantSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, ParticipantRow>(
            "SELECT u.id AS user_id, u.first_name, u.last_name \
             FROM conversation_participants cp \
             JOIN users u ON u.id = cp.user_id \
             WHERE cp.conversation_id = $1 AND cp.user_id <> $2 \
             ORDER BY u.first_name, u.last_name",
        )
        .bind(conversation_id)
        .bind(viewer)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ParticipantSummary::from).collect())
    }

    /// List the viewer's inbox: each conversation with the other
    /// participants, latest message, and unread count, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn inbox(&self, viewer: UserId) -> Result<Vec<ConversationSummary>, RepositoryError> {
        let conversations = sqlx::query_as::<_, ConversationRow>(
            "SELECT c.id, c.created_at, c.updated_at \
             FROM conversations c \
             JOIN conversation_participants cp ON cp.conversation_id = c.id \
             WHERE cp.user_id = $1 \
             ORDER BY c.updated_at DESC",
        )
        .bind(viewer)
        .fetch_all(self.pool)
        .await?;

        let mut summaries = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let participants = self.other_participants(conversation.id, viewer).await?;

            let latest = sqlx::query_as::<_, MessageRow>(
                "SELECT id, conversation_id, sender_id, content, is_read, created_at \
                 FROM messages WHERE conversation_id = $1 \
                 ORDER BY created_at DESC LIMIT 1",
            )
            .bind(conversation.id)
            .fetch_optional(self.pool)
            .await?;

            let (unread_count,): (i64,) = sqlx::query_as(
                "SELECT COUNT(*) FROM messages \
                 WHERE conversation_id = $1 AND sender_id <> $2 AND NOT is_read",
            )
            .bind(conversation.id)
            .bind(viewer)
            .fetch_one(self.pool)
            .await?;

            let participants_name = participants
                .iter()
                .map(|p| format!("{} {}", p.first_name, p.last_name))
                .collect::<Vec<_>>()
                .join(", ");

            summaries.push(ConversationSummary {
                conversation_id: conversation.id,
                participants,
                participants_name,
                latest_message: latest.map(|m| m.into_message(viewer)),
                unread_count,
            });
        }

        Ok(summaries)
    }

    /// List a conversation's messages for the viewer, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn messages(
        &self,
        conversation_id: ConversationId,
        viewer: UserId,
    ) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            "SELECT id, conversation_id, sender_id, content, is_read, created_at \
             FROM messages WHERE conversation_id = $1 \
             ORDER BY created_at ASC",
        )
        .bind(conversation_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|m| m.into_message(viewer)).collect())
    }

    /// Mark every message the viewer received in a conversation as read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_read(
        &self,
        conversation_id: ConversationId,
        viewer: UserId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE messages SET is_read = TRUE \
             WHERE conversation_id = $1 AND sender_id <> $2 AND NOT is_read",
        )
        .bind(conversation_id)
        .bind(viewer)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Append a message to a conversation and bump its recency.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn send_message(
        &self,
        conversation_id: ConversationId,
        sender: UserId,
        content: &str,
    ) -> Result<Message, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, MessageRow>(
            "INSERT INTO messages (conversation_id, sender_id, content) \
             VALUES ($1, $2, $3) \
             RETURNING id, conversation_id, sender_id, content, is_read, created_at",
        )
        .bind(conversation_id)
        .bind(sender)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into_message(sender))
    }
}
