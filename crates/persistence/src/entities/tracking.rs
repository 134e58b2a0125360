//! Tracking link entity definition.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::notification::NotificationChannel;
use domain::models::TrackingLink;

/// Database entity for the tracking_links table.
#[derive(Debug, Clone, FromRow)]
pub struct TrackingLinkEntity {
    pub id: i64,
    pub tracking_id: Uuid,
    pub customer_id: Uuid,
    pub channel: NotificationChannel,
    pub created_at: DateTime<Utc>,
    pub clicked_at: Option<DateTime<Utc>>,
    pub booking_id: Option<Uuid>,
    pub linked_at: Option<DateTime<Utc>>,
}

impl From<TrackingLinkEntity> for TrackingLink {
    fn from(e: TrackingLinkEntity) -> Self {
        Self {
            id: e.id,
            tracking_id: e.tracking_id,
            customer_id: e.customer_id,
            channel: e.channel,
            created_at: e.created_at,
            clicked_at: e.clicked_at,
            booking_id: e.booking_id,
            linked_at: e.linked_at,
        }
    }
}
