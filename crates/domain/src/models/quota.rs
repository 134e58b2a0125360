//! Daily provider-call quota status.

use chrono::NaiveDate;
use serde::Serialize;

/// Severity buckets the admin surface maps onto UI treatment. Quota never
/// blocks sends; severity only drives how loudly the dashboard complains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaSeverity {
    Ok,
    Warning,
    High,
    Critical,
}

/// Snapshot of today's provider-call counter against the configured limit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QuotaStatus {
    pub day: NaiveDate,
    pub count: i32,
    pub limit: i32,
    pub percent: f64,
    pub severity: QuotaSeverity,
}

impl QuotaStatus {
    /// Build a status snapshot from a counter value and the configured
    /// limit/thresholds (warning/high/critical as percentages).
    pub fn compute(day: NaiveDate, count: i32, limit: i32, thresholds: (u8, u8, u8)) -> Self {
        let percent = if limit > 0 {
            (count as f64 / limit as f64) * 100.0
        } else {
            0.0
        };
        let (warning, high, critical) = thresholds;
        let severity = if percent >= critical as f64 {
            QuotaSeverity::Critical
        } else if percent >= high as f64 {
            QuotaSeverity::High
        } else if percent >= warning as f64 {
            QuotaSeverity::Warning
        } else {
            QuotaSeverity::Ok
        };
        Self {
            day,
            count,
            limit,
            percent,
            severity,
        }
    }
}
