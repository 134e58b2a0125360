//! Quota counter entity definition.
//!
//! Counters are keyed by UTC calendar date; a new date implicitly starts a
//! fresh counter, so there is no reset job.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database entity for the quota_counters table.
#[derive(Debug, Clone, FromRow)]
pub struct QuotaCounterEntity {
    pub day: NaiveDate,
    pub count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
