//! Retry queue repository.
//!
//! Holds transiently failed notification attempts awaiting re-dispatch.
//! Entries are deleted, never flagged, once terminal: either a retry
//! succeeded or the retry budget is exhausted.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::retry::{backoff_delay, MAX_RETRIES};

use crate::entities::NotificationRetryEntity;

/// Result of recording a failed retry.
#[derive(Debug)]
pub enum RetryFailureOutcome {
    /// Rescheduled with an incremented count and a new due time.
    Rescheduled(NotificationRetryEntity),
    /// The retry budget is exhausted; the entry was removed.
    Exhausted,
    /// No queue entry exists for this attempt.
    NotQueued,
}

/// Repository for retry queue operations.
pub struct RetryQueueRepository {
    pool: PgPool,
}

impl RetryQueueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new queue entry for a transiently failed attempt.
    ///
    /// The first retry is due one backoff step from now (`retry_count = 0`).
    pub async fn enqueue(
        &self,
        attempt_id: Uuid,
        error: &str,
    ) -> Result<NotificationRetryEntity, sqlx::Error> {
        let next_retry_at = Utc::now() + backoff_delay(0);
        sqlx::query_as::<_, NotificationRetryEntity>(
            r#"
            INSERT INTO notification_retries (attempt_id, retry_count, next_retry_at, last_error)
            VALUES ($1, 0, $2, $3)
            RETURNING id, attempt_id, retry_count, next_retry_at, last_error, created_at
            "#,
        )
        .bind(attempt_id)
        .bind(next_retry_at)
        .bind(error)
        .fetch_one(&self.pool)
        .await
    }

    /// Entries due for retry at `now`, oldest due first, ties broken by
    /// insertion order.
    pub async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<NotificationRetryEntity>, sqlx::Error> {
        sqlx::query_as::<_, NotificationRetryEntity>(
            r#"
            SELECT id, attempt_id, retry_count, next_retry_at, last_error, created_at
            FROM notification_retries
            WHERE next_retry_at <= $1
            ORDER BY next_retry_at ASC, id ASC
            LIMIT $2
            "#,
        )
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Remove the entry after a successful retry. Returns false when no
    /// entry existed.
    pub async fn record_success(&self, attempt_id: Uuid) -> Result<bool, sqlx::Error> {
        self.remove(attempt_id).await
    }

    /// Remove an entry unconditionally (success, or a failure that turned
    /// out permanent mid-retry). Returns false when no entry existed.
    pub async fn remove(&self, attempt_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM notification_retries
            WHERE attempt_id = $1
            "#,
        )
        .bind(attempt_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Record a failed retry: bump the count and reschedule, or remove the
    /// entry once the count reaches the retry budget.
    pub async fn record_failure(
        &self,
        attempt_id: Uuid,
        error: &str,
    ) -> Result<RetryFailureOutcome, sqlx::Error> {
        let current: Option<(i32,)> = sqlx::query_as(
            r#"SELECT retry_count FROM notification_retries WHERE attempt_id = $1"#,
        )
        .bind(attempt_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some((retry_count,)) = current else {
            return Ok(RetryFailureOutcome::NotQueued);
        };

        let new_count = retry_count + 1;
        if new_count >= MAX_RETRIES {
            sqlx::query(r#"DELETE FROM notification_retries WHERE attempt_id = $1"#)
                .bind(attempt_id)
                .execute(&self.pool)
                .await?;
            return Ok(RetryFailureOutcome::Exhausted);
        }

        let next_retry_at = Utc::now() + backoff_delay(new_count);
        let entity = sqlx::query_as::<_, NotificationRetryEntity>(
            r#"
            UPDATE notification_retries
            SET retry_count = $2,
                next_retry_at = $3,
                last_error = $4
            WHERE attempt_id = $1
            RETURNING id, attempt_id, retry_count, next_retry_at, last_error, created_at
            "#,
        )
        .bind(attempt_id)
        .bind(new_count)
        .bind(next_retry_at)
        .bind(error)
        .fetch_one(&self.pool)
        .await?;

        Ok(RetryFailureOutcome::Rescheduled(entity))
    }

    /// Number of live queue entries.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM notification_retries"#)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}
