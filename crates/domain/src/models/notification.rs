//! Notification domain model and outbound error classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outbound message channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "notification_channel", rename_all = "snake_case")]
pub enum NotificationChannel {
    Email,
    Sms,
}

impl NotificationChannel {
    /// Database/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationChannel::Email => "email",
            NotificationChannel::Sms => "sms",
        }
    }

    /// Parse from the database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "email" => Some(NotificationChannel::Email),
            "sms" => Some(NotificationChannel::Sms),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message template kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "template_kind", rename_all = "snake_case")]
pub enum TemplateKind {
    BookingConfirmation,
    GroomReminder,
}

impl TemplateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::BookingConfirmation => "booking_confirmation",
            TemplateKind::GroomReminder => "groom_reminder",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "booking_confirmation" => Some(TemplateKind::BookingConfirmation),
            "groom_reminder" => Some(TemplateKind::GroomReminder),
            _ => None,
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a notification attempt.
///
/// `Pending` exists only between row creation and the first send result.
/// `Sent` is immutable; `Failed` is terminal and surfaced for manual action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "attempt_status", rename_all = "snake_case")]
pub enum AttemptStatus {
    Pending,
    Sent,
    AwaitingRetry,
    Failed,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::Pending => "pending",
            AttemptStatus::Sent => "sent",
            AttemptStatus::AwaitingRetry => "awaiting_retry",
            AttemptStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single outbound message dispatch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct NotificationAttempt {
    pub id: i64,
    pub attempt_id: Uuid,
    pub customer_id: Uuid,
    pub channel: NotificationChannel,
    pub recipient: String,
    pub template: TemplateKind,
    pub payload: serde_json::Value,
    pub status: AttemptStatus,
    pub tracking_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

/// Classification of a failed send.
///
/// Permanent failures are never retried; transient failures enter the retry
/// queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Transient,
    Permanent,
}

impl ErrorClass {
    /// Classify a provider HTTP status code.
    ///
    /// 429 and 5xx are transient (rate limit / server trouble). The listed
    /// 4xx codes are permanent; so is any other 4xx, since retrying a
    /// client error cannot fix it.
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => ErrorClass::Transient,
            500..=599 => ErrorClass::Transient,
            400 | 401 | 403 | 404 | 409 | 410 | 422 => ErrorClass::Permanent,
            400..=499 => ErrorClass::Permanent,
            _ => ErrorClass::Transient,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorClass::Transient)
    }
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorClass::Transient => f.write_str("transient"),
            ErrorClass::Permanent => f.write_str("permanent"),
        }
    }
}

/// Admin listing entry for a terminally failed notification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FailedNotificationResponse {
    pub attempt_id: Uuid,
    pub customer_id: Uuid,
    pub channel: NotificationChannel,
    pub recipient: String,
    pub template: TemplateKind,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response for the failed-notification admin listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListFailedNotificationsResponse {
    pub notifications: Vec<FailedNotificationResponse>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_round_trip() {
        assert_eq!(
            NotificationChannel::parse("email"),
            Some(NotificationChannel::Email)
        );
        assert_eq!(
            NotificationChannel::parse("sms"),
            Some(NotificationChannel::Sms)
        );
        assert_eq!(NotificationChannel::parse("fax"), None);
        assert_eq!(NotificationChannel::Email.to_string(), "email");
    }

    #[test]
    fn test_template_round_trip() {
        assert_eq!(
            TemplateKind::parse("booking_confirmation"),
            Some(TemplateKind::BookingConfirmation)
        );
        assert_eq!(
            TemplateKind::parse("groom_reminder"),
            Some(TemplateKind::GroomReminder)
        );
        assert_eq!(TemplateKind::parse("unknown"), None);
    }

    #[test]
    fn test_attempt_status_strings() {
        assert_eq!(AttemptStatus::Pending.as_str(), "pending");
        assert_eq!(AttemptStatus::Sent.as_str(), "sent");
        assert_eq!(AttemptStatus::AwaitingRetry.as_str(), "awaiting_retry");
        assert_eq!(AttemptStatus::Failed.as_str(), "failed");
    }

    #[test]
    fn test_permanent_status_codes() {
        for status in [400, 401, 403, 404, 409, 410, 422] {
            assert_eq!(
                ErrorClass::from_status(status),
                ErrorClass::Permanent,
                "status {status} should be permanent"
            );
        }
    }

    #[test]
    fn test_transient_status_codes() {
        assert_eq!(ErrorClass::from_status(429), ErrorClass::Transient);
        for status in [500, 502, 503, 504, 599] {
            assert_eq!(
                ErrorClass::from_status(status),
                ErrorClass::Transient,
                "status {status} should be transient"
            );
        }
    }

    #[test]
    fn test_unlisted_4xx_is_permanent() {
        assert_eq!(ErrorClass::from_status(402), ErrorClass::Permanent);
        assert_eq!(ErrorClass::from_status(418), ErrorClass::Permanent);
    }

    #[test]
    fn test_channel_serialization() {
        let json = serde_json::to_string(&NotificationChannel::Sms).unwrap();
        assert_eq!(json, "\"sms\"");
    }
}
