//! Operational settings repository.

use sqlx::PgPool;

use domain::models::AppSettings;

use crate::entities::AppSettingsEntity;
use crate::metrics::QueryTimer;

/// Repository for the single-row app_settings table.
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the settings row (seeded by migration).
    pub async fn get(&self) -> Result<AppSettingsEntity, sqlx::Error> {
        let timer = QueryTimer::new("settings_get");
        let result = sqlx::query_as::<_, AppSettingsEntity>(
            r#"
            SELECT id, quota_daily_limit, quota_warning_pct, quota_high_pct,
                   quota_critical_pct, pause_threshold, conversion_window_days, updated_at
            FROM app_settings
            WHERE id = 1
            "#,
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Persist updated settings.
    pub async fn update(&self, settings: &AppSettings) -> Result<AppSettingsEntity, sqlx::Error> {
        let timer = QueryTimer::new("settings_update");
        let result = sqlx::query_as::<_, AppSettingsEntity>(
            r#"
            UPDATE app_settings
            SET quota_daily_limit = $1,
                quota_warning_pct = $2,
                quota_high_pct = $3,
                quota_critical_pct = $4,
                pause_threshold = $5,
                conversion_window_days = $6,
                updated_at = NOW()
            WHERE id = 1
            RETURNING id, quota_daily_limit, quota_warning_pct, quota_high_pct,
                      quota_critical_pct, pause_threshold, conversion_window_days, updated_at
            "#,
        )
        .bind(settings.quota_daily_limit)
        .bind(settings.quota_warning_pct as i16)
        .bind(settings.quota_high_pct as i16)
        .bind(settings.quota_critical_pct as i16)
        .bind(settings.pause_threshold)
        .bind(settings.conversion_window_days as i32)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
