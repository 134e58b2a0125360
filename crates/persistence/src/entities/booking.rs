//! Booking entity definition.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Booking;

/// Database entity for the bookings table.
#[derive(Debug, Clone, FromRow)]
pub struct BookingEntity {
    pub id: i64,
    pub booking_id: Uuid,
    pub customer_id: Uuid,
    pub service: String,
    pub starts_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BookingEntity> for Booking {
    fn from(e: BookingEntity) -> Self {
        Self {
            id: e.id,
            booking_id: e.booking_id,
            customer_id: e.customer_id,
            service: e.service,
            starts_at: e.starts_at,
            notes: e.notes,
            created_at: e.created_at,
        }
    }
}
