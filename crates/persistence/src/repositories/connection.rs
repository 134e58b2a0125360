//! Provider connection repository.

use sqlx::PgPool;

use domain::models::notification::NotificationChannel;

use crate::entities::ProviderConnectionEntity;

/// Repository for provider connection rows.
pub struct ProviderConnectionRepository {
    pool: PgPool,
}

impl ProviderConnectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the connection for a channel.
    pub async fn find_by_channel(
        &self,
        channel: NotificationChannel,
    ) -> Result<Option<ProviderConnectionEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProviderConnectionEntity>(
            r#"
            SELECT id, channel, state, consecutive_failures, paused_at, created_at, updated_at
            FROM provider_connections
            WHERE channel = $1
            "#,
        )
        .bind(channel)
        .fetch_optional(&self.pool)
        .await
    }

    /// All connections, stable order.
    pub async fn list_all(&self) -> Result<Vec<ProviderConnectionEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProviderConnectionEntity>(
            r#"
            SELECT id, channel, state, consecutive_failures, paused_at, created_at, updated_at
            FROM provider_connections
            ORDER BY channel
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Bump the consecutive-failure counter and return the new value.
    pub async fn increment_consecutive_failures(
        &self,
        channel: NotificationChannel,
    ) -> Result<i32, sqlx::Error> {
        let row: (i32,) = sqlx::query_as(
            r#"
            UPDATE provider_connections
            SET consecutive_failures = consecutive_failures + 1, updated_at = NOW()
            WHERE channel = $1
            RETURNING consecutive_failures
            "#,
        )
        .bind(channel)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    /// Reset the failure counter after a successful send. Guarded to active
    /// connections: a paused connection keeps its streak until an admin
    /// resumes it.
    pub async fn reset_consecutive_failures(
        &self,
        channel: NotificationChannel,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE provider_connections
            SET consecutive_failures = 0, updated_at = NOW()
            WHERE channel = $1 AND state = 'active'
            "#,
        )
        .bind(channel)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Pause the connection. Guarded so a concurrent pause is a no-op.
    pub async fn pause(
        &self,
        channel: NotificationChannel,
    ) -> Result<Option<ProviderConnectionEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProviderConnectionEntity>(
            r#"
            UPDATE provider_connections
            SET state = 'paused', paused_at = NOW(), updated_at = NOW()
            WHERE channel = $1 AND state = 'active'
            RETURNING id, channel, state, consecutive_failures, paused_at, created_at, updated_at
            "#,
        )
        .bind(channel)
        .fetch_optional(&self.pool)
        .await
    }

    /// Administrative resume: back to active with a cleared streak.
    pub async fn resume(
        &self,
        channel: NotificationChannel,
    ) -> Result<Option<ProviderConnectionEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProviderConnectionEntity>(
            r#"
            UPDATE provider_connections
            SET state = 'active', consecutive_failures = 0, paused_at = NULL, updated_at = NOW()
            WHERE channel = $1
            RETURNING id, channel, state, consecutive_failures, paused_at, created_at, updated_at
            "#,
        )
        .bind(channel)
        .fetch_optional(&self.pool)
        .await
    }
}
