//! Runtime-editable operational settings.
//!
//! Stored as a single row and read through a staleness-bounded cache; a
//! stale read means one request sees slightly outdated values, never a
//! correctness violation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::connection::DEFAULT_PAUSE_THRESHOLD;
use super::tracking::DEFAULT_CONVERSION_WINDOW_DAYS;

/// Default daily provider-call budget.
pub const DEFAULT_QUOTA_DAILY_LIMIT: i32 = 1000;

/// Operational settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AppSettings {
    /// Daily provider-call budget used by the quota tracker.
    pub quota_daily_limit: i32,
    /// Quota warning thresholds as percentages, in ascending order.
    pub quota_warning_pct: u8,
    pub quota_high_pct: u8,
    pub quota_critical_pct: u8,
    /// Consecutive failures that pause a provider connection.
    pub pause_threshold: i32,
    /// Attribution window for conversion tracking, in days.
    pub conversion_window_days: i64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            quota_daily_limit: DEFAULT_QUOTA_DAILY_LIMIT,
            quota_warning_pct: 80,
            quota_high_pct: 90,
            quota_critical_pct: 95,
            pause_threshold: DEFAULT_PAUSE_THRESHOLD,
            conversion_window_days: DEFAULT_CONVERSION_WINDOW_DAYS,
        }
    }
}

impl AppSettings {
    /// Quota thresholds as a (warning, high, critical) tuple.
    pub fn quota_thresholds(&self) -> (u8, u8, u8) {
        (
            self.quota_warning_pct,
            self.quota_high_pct,
            self.quota_critical_pct,
        )
    }
}

/// Request payload for updating settings (partial update).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateSettingsRequest {
    #[validate(range(min = 1, message = "Daily limit must be positive"))]
    pub quota_daily_limit: Option<i32>,

    #[validate(range(min = 1, max = 100, message = "Thresholds are percentages"))]
    pub quota_warning_pct: Option<u8>,

    #[validate(range(min = 1, max = 100, message = "Thresholds are percentages"))]
    pub quota_high_pct: Option<u8>,

    #[validate(range(min = 1, max = 100, message = "Thresholds are percentages"))]
    pub quota_critical_pct: Option<u8>,

    #[validate(range(min = 1, message = "Pause threshold must be positive"))]
    pub pause_threshold: Option<i32>,

    #[validate(range(min = 1, max = 365, message = "Window must be 1-365 days"))]
    pub conversion_window_days: Option<i64>,
}

impl UpdateSettingsRequest {
    /// Apply the partial update on top of the current settings.
    pub fn apply_to(&self, current: &AppSettings) -> AppSettings {
        AppSettings {
            quota_daily_limit: self.quota_daily_limit.unwrap_or(current.quota_daily_limit),
            quota_warning_pct: self.quota_warning_pct.unwrap_or(current.quota_warning_pct),
            quota_high_pct: self.quota_high_pct.unwrap_or(current.quota_high_pct),
            quota_critical_pct: self
                .quota_critical_pct
                .unwrap_or(current.quota_critical_pct),
            pause_threshold: self.pause_threshold.unwrap_or(current.pause_threshold),
            conversion_window_days: self
                .conversion_window_days
                .unwrap_or(current.conversion_window_days),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.quota_daily_limit, 1000);
        assert_eq!(settings.quota_thresholds(), (80, 90, 95));
        assert_eq!(settings.pause_threshold, 10);
        assert_eq!(settings.conversion_window_days, 30);
    }

    #[test]
    fn test_partial_update() {
        let current = AppSettings::default();
        let request = UpdateSettingsRequest {
            quota_daily_limit: Some(2500),
            quota_warning_pct: None,
            quota_high_pct: None,
            quota_critical_pct: None,
            pause_threshold: Some(5),
            conversion_window_days: None,
        };
        let updated = request.apply_to(&current);
        assert_eq!(updated.quota_daily_limit, 2500);
        assert_eq!(updated.pause_threshold, 5);
        // Untouched fields carry over.
        assert_eq!(updated.quota_thresholds(), (80, 90, 95));
        assert_eq!(updated.conversion_window_days, 30);
    }

    #[test]
    fn test_update_validation() {
        let request = UpdateSettingsRequest {
            quota_daily_limit: Some(0),
            quota_warning_pct: None,
            quota_high_pct: None,
            quota_critical_pct: None,
            pause_threshold: None,
            conversion_window_days: None,
        };
        assert!(request.validate().is_err());

        let request = UpdateSettingsRequest {
            quota_daily_limit: None,
            quota_warning_pct: Some(150),
            quota_high_pct: None,
            quota_critical_pct: None,
            pause_threshold: None,
            conversion_window_days: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_settings_round_trip() {
        let settings = AppSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }
}
