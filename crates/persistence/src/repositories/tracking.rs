//! Tracking link repository.
//!
//! Guarded updates (`clicked_at IS NULL`, `booking_id IS NULL`) give the
//! first-write-wins semantics the attribution model requires.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::notification::NotificationChannel;

use crate::entities::TrackingLinkEntity;

/// Repository for conversion tracking links.
pub struct TrackingLinkRepository {
    pool: PgPool,
}

impl TrackingLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a link at send time.
    pub async fn create(
        &self,
        customer_id: Uuid,
        channel: NotificationChannel,
    ) -> Result<TrackingLinkEntity, sqlx::Error> {
        sqlx::query_as::<_, TrackingLinkEntity>(
            r#"
            INSERT INTO tracking_links (customer_id, channel)
            VALUES ($1, $2)
            RETURNING id, tracking_id, customer_id, channel, created_at,
                      clicked_at, booking_id, linked_at
            "#,
        )
        .bind(customer_id)
        .bind(channel)
        .fetch_one(&self.pool)
        .await
    }

    /// Find a link by its public tracking id.
    pub async fn find_by_tracking_id(
        &self,
        tracking_id: Uuid,
    ) -> Result<Option<TrackingLinkEntity>, sqlx::Error> {
        sqlx::query_as::<_, TrackingLinkEntity>(
            r#"
            SELECT id, tracking_id, customer_id, channel, created_at,
                   clicked_at, booking_id, linked_at
            FROM tracking_links
            WHERE tracking_id = $1
            "#,
        )
        .bind(tracking_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Record the first click on a link. Later clicks leave `clicked_at`
    /// untouched; unknown ids touch nothing. Returns the updated row only
    /// when this call recorded the click.
    pub async fn record_click(
        &self,
        tracking_id: Uuid,
        clicked_at: DateTime<Utc>,
    ) -> Result<Option<TrackingLinkEntity>, sqlx::Error> {
        sqlx::query_as::<_, TrackingLinkEntity>(
            r#"
            UPDATE tracking_links
            SET clicked_at = $2
            WHERE tracking_id = $1 AND clicked_at IS NULL
            RETURNING id, tracking_id, customer_id, channel, created_at,
                      clicked_at, booking_id, linked_at
            "#,
        )
        .bind(tracking_id)
        .bind(clicked_at)
        .fetch_optional(&self.pool)
        .await
    }

    /// Attribute a booking to the customer's most recently created unlinked
    /// link inside the window. Older in-window links stay unlinked. Returns
    /// None when nothing was attributable.
    pub async fn link_latest_for_customer(
        &self,
        customer_id: Uuid,
        booking_id: Uuid,
        booking_created_at: DateTime<Utc>,
        window_days: i64,
    ) -> Result<Option<TrackingLinkEntity>, sqlx::Error> {
        let window_start = booking_created_at - Duration::days(window_days);
        sqlx::query_as::<_, TrackingLinkEntity>(
            r#"
            UPDATE tracking_links
            SET booking_id = $2, linked_at = NOW()
            WHERE id = (
                SELECT id FROM tracking_links
                WHERE customer_id = $1
                  AND booking_id IS NULL
                  AND created_at >= $3
                  AND created_at <= $4
                ORDER BY created_at DESC, id DESC
                LIMIT 1
            )
              AND booking_id IS NULL
            RETURNING id, tracking_id, customer_id, channel, created_at,
                      clicked_at, booking_id, linked_at
            "#,
        )
        .bind(customer_id)
        .bind(booking_id)
        .bind(window_start)
        .bind(booking_created_at)
        .fetch_optional(&self.pool)
        .await
    }
}
