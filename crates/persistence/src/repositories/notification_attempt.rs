//! Notification attempt repository.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::notification::{NotificationChannel, TemplateKind};

use crate::entities::NotificationAttemptEntity;

/// Repository for notification attempt rows.
pub struct NotificationAttemptRepository {
    pool: PgPool,
}

impl NotificationAttemptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new attempt in `pending` state.
    pub async fn create(
        &self,
        customer_id: Uuid,
        channel: NotificationChannel,
        recipient: &str,
        template: TemplateKind,
        payload: &serde_json::Value,
        tracking_id: Option<Uuid>,
    ) -> Result<NotificationAttemptEntity, sqlx::Error> {
        sqlx::query_as::<_, NotificationAttemptEntity>(
            r#"
            INSERT INTO notification_attempts
                (customer_id, channel, recipient, template, payload, status, tracking_id)
            VALUES ($1, $2, $3, $4, $5, 'pending', $6)
            RETURNING id, attempt_id, customer_id, channel, recipient, template, payload,
                      status, tracking_id, last_error, created_at, sent_at
            "#,
        )
        .bind(customer_id)
        .bind(channel)
        .bind(recipient)
        .bind(template)
        .bind(payload)
        .bind(tracking_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Mark the attempt sent. Sent attempts are immutable from here on.
    pub async fn mark_sent(&self, attempt_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE notification_attempts
            SET status = 'sent', sent_at = NOW(), last_error = NULL
            WHERE attempt_id = $1 AND status <> 'sent'
            "#,
        )
        .bind(attempt_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Mark the attempt as waiting in the retry queue.
    pub async fn mark_awaiting_retry(
        &self,
        attempt_id: Uuid,
        error: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE notification_attempts
            SET status = 'awaiting_retry', last_error = $2
            WHERE attempt_id = $1
            "#,
        )
        .bind(attempt_id)
        .bind(error)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Mark the attempt terminally failed.
    pub async fn mark_failed(&self, attempt_id: Uuid, error: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE notification_attempts
            SET status = 'failed', last_error = $2
            WHERE attempt_id = $1
            "#,
        )
        .bind(attempt_id)
        .bind(error)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Find an attempt by its public id.
    pub async fn find_by_attempt_id(
        &self,
        attempt_id: Uuid,
    ) -> Result<Option<NotificationAttemptEntity>, sqlx::Error> {
        sqlx::query_as::<_, NotificationAttemptEntity>(
            r#"
            SELECT id, attempt_id, customer_id, channel, recipient, template, payload,
                   status, tracking_id, last_error, created_at, sent_at
            FROM notification_attempts
            WHERE attempt_id = $1
            "#,
        )
        .bind(attempt_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Terminally failed attempts for the admin surface, newest first.
    pub async fn list_failed(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationAttemptEntity>, sqlx::Error> {
        sqlx::query_as::<_, NotificationAttemptEntity>(
            r#"
            SELECT id, attempt_id, customer_id, channel, recipient, template, payload,
                   status, tracking_id, last_error, created_at, sent_at
            FROM notification_attempts
            WHERE status = 'failed'
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Total count of terminally failed attempts.
    pub async fn count_failed(&self) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            r#"SELECT COUNT(*) FROM notification_attempts WHERE status = 'failed'"#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0)
    }
}
