//! Booking repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::BookingEntity;

/// Repository for booking rows.
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new booking.
    pub async fn create(
        &self,
        customer_id: Uuid,
        service: &str,
        starts_at: DateTime<Utc>,
        notes: Option<&str>,
    ) -> Result<BookingEntity, sqlx::Error> {
        sqlx::query_as::<_, BookingEntity>(
            r#"
            INSERT INTO bookings (customer_id, service, starts_at, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, booking_id, customer_id, service, starts_at, notes, created_at
            "#,
        )
        .bind(customer_id)
        .bind(service)
        .bind(starts_at)
        .bind(notes)
        .fetch_one(&self.pool)
        .await
    }

    /// Find a booking by public id.
    pub async fn find_by_booking_id(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<BookingEntity>, sqlx::Error> {
        sqlx::query_as::<_, BookingEntity>(
            r#"
            SELECT id, booking_id, customer_id, service, starts_at, notes, created_at
            FROM bookings
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }
}
