//! Notification repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use akubata_core::{ConversationId, MessageId, NotificationId, NotificationType, UserId};

use super::RepositoryError;
use crate::models::Notification;

const NOTIFICATION_COLUMNS: &str = "id, recipient_id, notification_type, content, is_read, \
     related_conversation_id, related_message_id, created_at";

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: NotificationId,
    recipient_id: UserId,
    notification_type: NotificationType,
    content: String,
    is_read: bool,
    related_conversation_id: Option<ConversationId>,
    related_message_id: Option<MessageId>,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            recipient_id: row.recipient_id,
            notification_type: row.notification_type,
            content: row.content,
            is_read: row.is_read,
            related_conversation_id: row.related_conversation_id,
            related_message_id: row.related_message_id,
            created_at: row.created_at,
        }
    }
}

/// Fields for inserting a notification.
pub struct NewNotification<'a> {
    pub recipient_id: UserId,
    pub notification_type: NotificationType,
    pub content: &'a str,
    pub related_conversation_id: Option<ConversationId>,
    pub related_message_id: Option<MessageId>,
}

/// Repository for notification database operations.
pub struct NotificationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NotificationRepository<'a> {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a notification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        notification: NewNotification<'_>,
    ) -> Result<Notification, RepositoryError> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "INSERT INTO notifications \
             (recipient_id, notification_type, content, \
              related_conversation_id, related_message_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(notification.recipient_id)
        .bind(notification.notification_type)
        .bind(notification.content)
        .bind(notification.related_conversation_id)
        .bind(notification.related_message_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List a user's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, recipient: UserId) -> Result<Vec<Notification>, RepositoryError> {
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE recipient_id = $1 ORDER BY created_at DESC"
        ))
        .bind(recipient)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Notification::from).collect())
    }

    /// Count a user's unread notifications.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unread_count(&self, recipient: UserId) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND NOT is_read",
        )
        .bind(recipient)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Mark one notification read, scoped to its recipient.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if it doesn't exist or belongs to
    /// someone else. Returns `RepositoryError::Database` for other errors.
    pub async fn mark_read(
        &self,
        recipient: UserId,
        id: NotificationId,
    ) -> Result<Notification, RepositoryError> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "UPDATE notifications SET is_read = TRUE \
             WHERE id = $1 AND recipient_id = $2 \
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(id)
        .bind(recipient)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Mark all of a user's notifications read.
    ///
    /// # Returns
    ///
    /// The number of notifications updated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_all_read(&self, recipient: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE recipient_id = $1 AND NOT is_read",
        )
        .bind(recipient)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete a notification, scoped to its recipient.
    ///
    /// # Returns
    ///
    /// Returns `true` if the notification was deleted, `false` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        recipient: UserId,
        id: NotificationId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND recipient_id = $2")
            .bind(id)
            .bind(recipient)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
