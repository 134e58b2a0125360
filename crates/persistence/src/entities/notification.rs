//! Notification attempt and retry queue entity definitions.
//!
//! Maps to the notification_attempts and notification_retries tables.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::notification::{AttemptStatus, NotificationChannel, TemplateKind};
use domain::models::{NotificationAttempt, RetryQueueEntry};

/// Database entity for the notification_attempts table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationAttemptEntity {
    pub id: i64,
    pub attempt_id: Uuid,
    pub customer_id: Uuid,
    pub channel: NotificationChannel,
    pub recipient: String,
    pub template: TemplateKind,
    pub payload: serde_json::Value,
    pub status: AttemptStatus,
    pub tracking_id: Option<Uuid>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

impl From<NotificationAttemptEntity> for NotificationAttempt {
    fn from(e: NotificationAttemptEntity) -> Self {
        Self {
            id: e.id,
            attempt_id: e.attempt_id,
            customer_id: e.customer_id,
            channel: e.channel,
            recipient: e.recipient,
            template: e.template,
            payload: e.payload,
            status: e.status,
            tracking_id: e.tracking_id,
            created_at: e.created_at,
            sent_at: e.sent_at,
        }
    }
}

/// Database entity for the notification_retries table.
///
/// Rows here are always live queue entries; terminal entries are deleted.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationRetryEntity {
    pub id: i64,
    pub attempt_id: Uuid,
    pub retry_count: i32,
    pub next_retry_at: DateTime<Utc>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRetryEntity> for RetryQueueEntry {
    fn from(e: NotificationRetryEntity) -> Self {
        Self {
            id: e.id,
            attempt_id: e.attempt_id,
            retry_count: e.retry_count,
            next_retry_at: e.next_retry_at,
            last_error: e.last_error,
            created_at: e.created_at,
        }
    }
}
