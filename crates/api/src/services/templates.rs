//! Message content rendering.
//!
//! Rendered content is stored on the attempt row as JSON so retries resend
//! exactly what the original dispatch produced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rendered message content, persisted as the attempt payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: String,
}

impl MessageContent {
    /// Parse content back out of a stored attempt payload.
    pub fn from_payload(payload: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(payload.clone()).ok()
    }

    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("message content serializes")
    }
}

/// Booking confirmation message.
pub fn booking_confirmation(
    customer_name: &str,
    service: &str,
    starts_at: DateTime<Utc>,
) -> MessageContent {
    let when = starts_at.format("%A, %B %-d at %-I:%M %p UTC");
    MessageContent {
        subject: Some(format!("Your {} appointment is booked", service)),
        body: format!(
            "Hi {customer_name}, your {service} appointment is confirmed for {when}. \
             See you and your pup soon!"
        ),
    }
}

/// Groom reminder message with an embedded tracking link.
pub fn groom_reminder(customer_name: &str, click_url: &str) -> MessageContent {
    MessageContent {
        subject: Some("Time for a groom?".to_string()),
        body: format!(
            "Hi {customer_name}, it's been a while since your pup's last groom. \
             Book your next visit here: {click_url}"
        ),
    }
}

/// Click-through URL for a tracking link.
pub fn click_url(base_url: &str, tracking_id: uuid::Uuid) -> String {
    format!("{}/r/{}", base_url.trim_end_matches('/'), tracking_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_booking_confirmation_mentions_service() {
        let starts_at = "2026-06-05T15:30:00Z".parse().unwrap();
        let content = booking_confirmation("Dana", "Full groom", starts_at);
        assert!(content.subject.as_ref().unwrap().contains("Full groom"));
        assert!(content.body.contains("Dana"));
        assert!(content.body.contains("June 5"));
    }

    #[test]
    fn test_groom_reminder_embeds_link() {
        let content = groom_reminder("Sam", "https://book.test/r/abc");
        assert!(content.body.contains("https://book.test/r/abc"));
        assert!(content.body.contains("Sam"));
    }

    #[test]
    fn test_payload_round_trip() {
        let content = groom_reminder("Sam", "https://book.test/r/abc");
        let payload = content.to_payload();
        let parsed = MessageContent::from_payload(&payload).unwrap();
        assert_eq!(parsed.body, content.body);
        assert_eq!(parsed.subject, content.subject);
    }

    #[test]
    fn test_from_payload_rejects_malformed() {
        assert!(MessageContent::from_payload(&serde_json::json!({"nope": true})).is_none());
    }

    #[test]
    fn test_click_url_trims_trailing_slash() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            click_url("https://book.test/", id),
            "https://book.test/r/550e8400-e29b-41d4-a716-446655440000"
        );
        assert_eq!(
            click_url("https://book.test", id),
            "https://book.test/r/550e8400-e29b-41d4-a716-446655440000"
        );
    }
}
