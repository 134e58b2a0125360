//! Customer domain model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::notification::NotificationChannel;

/// A grooming customer (one row per dog owner; breed describes the dog).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Customer {
    pub id: i64,
    pub customer_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub breed: Option<String>,
    pub last_groomed_at: Option<DateTime<Utc>>,
    pub reminders_opt_in: bool,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Preferred reminder channel: sms when a phone number is on file,
    /// otherwise email. None when the customer is unreachable.
    pub fn preferred_channel(&self) -> Option<(NotificationChannel, &str)> {
        if let Some(phone) = self.phone.as_deref() {
            Some((NotificationChannel::Sms, phone))
        } else {
            self.email
                .as_deref()
                .map(|email| (NotificationChannel::Email, email))
        }
    }
}
