//! Quota counter repository.
//!
//! Counters are keyed by UTC calendar date and incremented with an upsert,
//! so a new date lazily starts a fresh counter at zero and the count can
//! never go negative.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::entities::QuotaCounterEntity;
use crate::metrics::QueryTimer;

/// Repository for daily provider-call counters.
pub struct QuotaCounterRepository {
    pool: PgPool,
}

impl QuotaCounterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Increment the counter for the UTC day of `now`, creating it at 1 if
    /// this is the first call of the day.
    pub async fn record_call(
        &self,
        now: DateTime<Utc>,
    ) -> Result<QuotaCounterEntity, sqlx::Error> {
        let timer = QueryTimer::new("quota_record_call");
        let result = sqlx::query_as::<_, QuotaCounterEntity>(
            r#"
            INSERT INTO quota_counters (day, count)
            VALUES ($1, 1)
            ON CONFLICT (day)
            DO UPDATE SET count = quota_counters.count + 1, updated_at = NOW()
            RETURNING day, count, created_at, updated_at
            "#,
        )
        .bind(now.date_naive())
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Counter for a given UTC day; None means no calls were recorded.
    pub async fn get(&self, day: NaiveDate) -> Result<Option<QuotaCounterEntity>, sqlx::Error> {
        let timer = QueryTimer::new("quota_get");
        let result = sqlx::query_as::<_, QuotaCounterEntity>(
            r#"
            SELECT day, count, created_at, updated_at
            FROM quota_counters
            WHERE day = $1
            "#,
        )
        .bind(day)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
