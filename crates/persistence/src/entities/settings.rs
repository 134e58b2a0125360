//! Operational settings entity definition.
//!
//! Single-row table; the row is seeded by the initial migration.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::AppSettings;

/// Database entity for the app_settings table.
#[derive(Debug, Clone, FromRow)]
pub struct AppSettingsEntity {
    pub id: i32,
    pub quota_daily_limit: i32,
    pub quota_warning_pct: i16,
    pub quota_high_pct: i16,
    pub quota_critical_pct: i16,
    pub pause_threshold: i32,
    pub conversion_window_days: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<AppSettingsEntity> for AppSettings {
    fn from(e: AppSettingsEntity) -> Self {
        Self {
            quota_daily_limit: e.quota_daily_limit,
            quota_warning_pct: e.quota_warning_pct as u8,
            quota_high_pct: e.quota_high_pct as u8,
            quota_critical_pct: e.quota_critical_pct as u8,
            pause_threshold: e.pause_threshold,
            conversion_window_days: e.conversion_window_days as i64,
        }
    }
}
